//! Opening Balance Repository (one row per business date)

use super::{RepoError, RepoResult};
use crate::billing::money;
use shared::models::OpeningBalance;
use sqlx::SqlitePool;

const OPENING_SELECT: &str =
    "SELECT id, business_date, amount, note, created_at, updated_at FROM opening_balance";

pub async fn find_by_date(pool: &SqlitePool, business_date: &str) -> RepoResult<Option<OpeningBalance>> {
    let balance = sqlx::query_as::<_, OpeningBalance>(&format!(
        "{OPENING_SELECT} WHERE business_date = ?"
    ))
    .bind(business_date)
    .fetch_optional(pool)
    .await?;
    Ok(balance)
}

/// Amount for the date, zero when none was recorded
pub async fn amount_for(pool: &SqlitePool, business_date: &str) -> RepoResult<f64> {
    Ok(find_by_date(pool, business_date)
        .await?
        .map(|b| b.amount)
        .unwrap_or(0.0))
}

/// Create or replace the opening balance of a date
pub async fn upsert(
    pool: &SqlitePool,
    business_date: &str,
    amount: f64,
    note: Option<String>,
) -> RepoResult<OpeningBalance> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO opening_balance (id, business_date, amount, note, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
         ON CONFLICT(business_date) DO UPDATE SET amount = excluded.amount, note = excluded.note, updated_at = excluded.updated_at",
    )
    .bind(shared::util::snowflake_id())
    .bind(business_date)
    .bind(money::round2(amount))
    .bind(&note)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_date(pool, business_date).await?.ok_or_else(|| {
        RepoError::Database(format!("Opening balance for {business_date} missing after upsert"))
    })
}
