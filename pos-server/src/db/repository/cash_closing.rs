//! Cash Closing Repository (cierre de caja)

use super::{RepoError, RepoResult};
use crate::billing::money;
use shared::models::CashClosing;
use sqlx::SqlitePool;

const CLOSING_SELECT: &str = "SELECT id, business_date, expected_cash, counted_cash, variance, note, created_at FROM cash_closing";

pub async fn find_by_date(pool: &SqlitePool, business_date: &str) -> RepoResult<Option<CashClosing>> {
    let closing = sqlx::query_as::<_, CashClosing>(&format!(
        "{CLOSING_SELECT} WHERE business_date = ?"
    ))
    .bind(business_date)
    .fetch_optional(pool)
    .await?;
    Ok(closing)
}

/// Most recent first
pub async fn find_all(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<CashClosing>> {
    let closings = sqlx::query_as::<_, CashClosing>(&format!(
        "{CLOSING_SELECT} ORDER BY business_date DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(closings)
}

/// Record the count for a date; closing the same date again replaces it
pub async fn upsert(
    pool: &SqlitePool,
    business_date: &str,
    expected_cash: f64,
    counted_cash: f64,
    note: Option<String>,
) -> RepoResult<CashClosing> {
    let expected = money::round2(expected_cash);
    let counted = money::round2(counted_cash);
    let variance = money::round2(counted - expected);
    sqlx::query(
        "INSERT INTO cash_closing (id, business_date, expected_cash, counted_cash, variance, note, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         ON CONFLICT(business_date) DO UPDATE SET expected_cash = excluded.expected_cash, counted_cash = excluded.counted_cash, variance = excluded.variance, note = excluded.note, created_at = excluded.created_at",
    )
    .bind(shared::util::snowflake_id())
    .bind(business_date)
    .bind(expected)
    .bind(counted)
    .bind(variance)
    .bind(&note)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;

    find_by_date(pool, business_date).await?.ok_or_else(|| {
        RepoError::Database(format!("Cash closing for {business_date} missing after upsert"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_variance_and_reclose() {
        let pool = test_pool().await;
        let closing = upsert(&pool, "2024-03-01", 3100.0, 3050.5, None).await.unwrap();
        assert_eq!(closing.variance, -49.5);

        let closing = upsert(&pool, "2024-03-01", 3100.0, 3100.0, Some("recontado".into()))
            .await
            .unwrap();
        assert_eq!(closing.variance, 0.0);

        upsert(&pool, "2024-03-02", 500.0, 520.0, None).await.unwrap();
        let all = find_all(&pool, 10).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].business_date, "2024-03-02");
        assert_eq!(all[0].variance, 20.0);
    }
}
