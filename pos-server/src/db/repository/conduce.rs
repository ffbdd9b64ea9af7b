//! Conduce Repository
//!
//! Creation and void move the client's balance in the same transaction.

use super::{RepoError, RepoResult, TimeRange, begin_write, client, sequence};
use crate::billing::{DocumentKind, DocumentTotals, credit, money};
use shared::error::ErrorCode;
use shared::models::{Client, Conduce, ConduceCreate, ConduceStatus, LineItem};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const CONDUCE_SELECT: &str = "SELECT id, number, client_id, client_name, items, subtotal, tax, total, status, is_fiscal, void_reason, invoice_id, order_id, created_at, updated_at FROM conduce";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::ConduceNotFound, format!("Conduce {id} not found"))
}

/// List filters (GET /api/conduces)
#[derive(Debug, Clone, Default)]
pub struct ConduceFilter {
    pub range: Option<TimeRange>,
    pub status: Option<ConduceStatus>,
    pub client_id: Option<i64>,
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<Conduce>>
where
    E: SqliteExecutor<'e>,
{
    let conduce = sqlx::query_as::<_, Conduce>(&format!("{CONDUCE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(conduce)
}

pub async fn get<'e, E>(db: E, id: i64) -> RepoResult<Conduce>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_all(pool: &SqlitePool, filter: &ConduceFilter) -> RepoResult<Vec<Conduce>> {
    let (start, end) = filter
        .range
        .map(|r| (Some(r.start), Some(r.end)))
        .unwrap_or((None, None));
    let conduces = sqlx::query_as::<_, Conduce>(&format!(
        "{CONDUCE_SELECT} WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) AND (?3 IS NULL OR status = ?3) AND (?4 IS NULL OR client_id = ?4) ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .bind(filter.status)
    .bind(filter.client_id)
    .fetch_all(pool)
    .await?;
    Ok(conduces)
}

/// Pending conduces of one client, oldest first
pub async fn find_pending_by_client<'e, E>(db: E, client_id: i64) -> RepoResult<Vec<Conduce>>
where
    E: SqliteExecutor<'e>,
{
    let conduces = sqlx::query_as::<_, Conduce>(&format!(
        "{CONDUCE_SELECT} WHERE client_id = ? AND status = 'pending' ORDER BY created_at"
    ))
    .bind(client_id)
    .fetch_all(db)
    .await?;
    Ok(conduces)
}

/// Load a set of conduces by id (settlement)
pub async fn find_by_ids(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<Vec<Conduce>> {
    let mut conduces = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(c) = find_by_id(&mut *conn, *id).await? {
            conduces.push(c);
        }
    }
    Ok(conduces)
}

/// Issue a conduce for a client
pub async fn create(pool: &SqlitePool, data: ConduceCreate) -> RepoResult<Conduce> {
    let items = money::build_line_items(&data.items)?;
    let totals = money::compute_totals(&items, data.is_fiscal);

    let mut tx = begin_write(pool).await?;
    let client = client::get(&mut *tx, data.client_id).await?;
    let conduce = insert(&mut tx, &client, items, totals, data.is_fiscal, None).await?;
    tx.commit().await?;
    Ok(conduce)
}

/// Insert a conduce and charge the client (caller owns the transaction)
///
/// Used directly by order delivery on credit.
pub async fn insert(
    conn: &mut SqliteConnection,
    client: &Client,
    items: Vec<LineItem>,
    totals: DocumentTotals,
    is_fiscal: bool,
    order_id: Option<i64>,
) -> RepoResult<Conduce> {
    credit::check_credit(client, totals.total)?;
    client::charge_credit(&mut *conn, client.id, totals.total).await?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let number = sequence::next_number(&mut *conn, DocumentKind::Conduce).await?;
    let items_json =
        serde_json::to_string(&items).map_err(|e| RepoError::Database(e.to_string()))?;

    sqlx::query(
        "INSERT INTO conduce (id, number, client_id, client_name, items, subtotal, tax, total, status, is_fiscal, order_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending', ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(&number)
    .bind(client.id)
    .bind(&client.name)
    .bind(items_json)
    .bind(totals.subtotal)
    .bind(totals.tax)
    .bind(totals.total)
    .bind(is_fiscal)
    .bind(order_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    tracing::info!(conduce = %number, client_id = client.id, total = totals.total, "Conduce issued");
    get(&mut *conn, id).await
}

/// Void a pending conduce and release its total from the client balance
pub async fn void(pool: &SqlitePool, id: i64, reason: Option<String>) -> RepoResult<Conduce> {
    let mut tx = begin_write(pool).await?;
    let conduce = get(&mut *tx, id).await?;
    credit::ensure_pending(&conduce)?;

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE conduce SET status = 'voided', void_reason = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'pending'",
    )
    .bind(&reason)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Rule(
            ErrorCode::ConduceNotPending,
            format!("Conduce {} is no longer pending", conduce.number),
        ));
    }

    client::release_credit(&mut tx, conduce.client_id, conduce.total).await?;
    let voided = get(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(voided)
}

/// Hard delete (voided conduces only)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let conduce = get(pool, id).await?;
    credit::ensure_deletable(&conduce)?;
    sqlx::query("DELETE FROM conduce WHERE id = ? AND status = 'voided'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark a pending conduce as paid by `invoice_id` (settlement)
pub async fn mark_paid(conn: &mut SqliteConnection, id: i64, invoice_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE conduce SET status = 'paid', invoice_id = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'pending'",
    )
    .bind(invoice_id)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Rule(
            ErrorCode::ConduceNotPending,
            format!("Conduce {id} is no longer pending"),
        ));
    }
    Ok(())
}

/// Put paid conduces of `invoice_id` back to pending (settlement void)
pub async fn revert_paid(conn: &mut SqliteConnection, invoice_id: i64) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE conduce SET status = 'pending', invoice_id = NULL, updated_at = ?1 WHERE invoice_id = ?2 AND status = 'paid'",
    )
    .bind(now)
    .bind(invoice_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}
