//! Sale Repository

use super::{RepoError, RepoResult, TimeRange, begin_write, client, sequence};
use crate::billing::{DocumentKind, money};
use shared::error::ErrorCode;
use shared::models::{PaymentMethod, Sale, SaleCreate};
use sqlx::{SqliteExecutor, SqlitePool};

const SALE_SELECT: &str = "SELECT id, number, client_id, client_name, items, subtotal, tax, total, is_fiscal, payment_method, is_voided, void_reason, created_at, updated_at FROM sale";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::SaleNotFound, format!("Sale {id} not found"))
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<Sale>>
where
    E: SqliteExecutor<'e>,
{
    let sale = sqlx::query_as::<_, Sale>(&format!("{SALE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(sale)
}

pub async fn get<'e, E>(db: E, id: i64) -> RepoResult<Sale>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_all(pool: &SqlitePool, range: Option<TimeRange>) -> RepoResult<Vec<Sale>> {
    let (start, end) = range
        .map(|r| (Some(r.start), Some(r.end)))
        .unwrap_or((None, None));
    let sales = sqlx::query_as::<_, Sale>(&format!(
        "{SALE_SELECT} WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(sales)
}

/// Counter sale. Credit is not accepted here (use a conduce).
pub async fn create(pool: &SqlitePool, data: SaleCreate) -> RepoResult<Sale> {
    if data.payment_method == PaymentMethod::Credit {
        return Err(RepoError::Rule(
            ErrorCode::PaymentMethodNotAllowed,
            "Sales cannot be paid on credit; issue a conduce instead".into(),
        ));
    }
    let items = money::build_line_items(&data.items)?;
    let totals = money::compute_totals(&items, data.is_fiscal);
    let items_json =
        serde_json::to_string(&items).map_err(|e| RepoError::Database(e.to_string()))?;

    let mut tx = begin_write(pool).await?;
    let client_name = match data.client_id {
        Some(cid) => Some(client::get(&mut *tx, cid).await?.name),
        None => data
            .client_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let number = sequence::next_number(&mut tx, DocumentKind::Sale).await?;
    sqlx::query(
        "INSERT INTO sale (id, number, client_id, client_name, items, subtotal, tax, total, is_fiscal, payment_method, is_voided, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?11)",
    )
    .bind(id)
    .bind(&number)
    .bind(data.client_id)
    .bind(&client_name)
    .bind(items_json)
    .bind(totals.subtotal)
    .bind(totals.tax)
    .bind(totals.total)
    .bind(data.is_fiscal)
    .bind(data.payment_method)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let sale = get(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!(sale = %sale.number, total = sale.total, "Sale recorded");
    Ok(sale)
}

pub async fn void(pool: &SqlitePool, id: i64, reason: Option<String>) -> RepoResult<Sale> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE sale SET is_voided = 1, void_reason = ?1, updated_at = ?2 WHERE id = ?3 AND is_voided = 0",
    )
    .bind(&reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        // Either missing or already voided
        get(pool, id).await?;
        return Err(RepoError::Rule(
            ErrorCode::SaleAlreadyVoided,
            format!("Sale {id} is already voided"),
        ));
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM sale WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}
