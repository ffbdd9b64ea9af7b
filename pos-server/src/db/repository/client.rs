//! Client Repository

use super::{RepoError, RepoResult, begin_write};
use crate::billing::credit;
use shared::error::ErrorCode;
use shared::models::{Client, ClientCreate, ClientUpdate};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const CLIENT_SELECT: &str = "SELECT id, name, phone, rnc, address, credit_enabled, credit_limit, outstanding_balance, credit_days, created_at, updated_at FROM client";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::ClientNotFound, format!("Client {id} not found"))
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<Client>>
where
    E: SqliteExecutor<'e>,
{
    let client = sqlx::query_as::<_, Client>(&format!("{CLIENT_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(client)
}

/// Like [`find_by_id`] but missing clients are an error
pub async fn get<'e, E>(db: E, id: i64) -> RepoResult<Client>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

/// List clients, optionally filtered by name / phone / RNC
pub async fn find_all(pool: &SqlitePool, search: Option<&str>) -> RepoResult<Vec<Client>> {
    let clients = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(q) => {
            let pattern = format!("%{q}%");
            sqlx::query_as::<_, Client>(&format!(
                "{CLIENT_SELECT} WHERE name LIKE ?1 OR phone LIKE ?1 OR rnc LIKE ?1 ORDER BY name"
            ))
            .bind(pattern)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Client>(&format!("{CLIENT_SELECT} ORDER BY name"))
                .fetch_all(pool)
                .await?
        }
    };
    Ok(clients)
}

pub async fn create(pool: &SqlitePool, data: ClientCreate) -> RepoResult<Client> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO client (id, name, phone, rnc, address, credit_enabled, credit_limit, outstanding_balance, credit_days, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.phone)
    .bind(&data.rnc)
    .bind(&data.address)
    .bind(data.credit_enabled)
    .bind(data.credit_limit)
    .bind(data.credit_days)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Update profile and credit terms; `outstanding_balance` is never touched here
pub async fn update(pool: &SqlitePool, id: i64, data: ClientUpdate) -> RepoResult<Client> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE client SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), rnc = COALESCE(?3, rnc), address = COALESCE(?4, address), credit_enabled = COALESCE(?5, credit_enabled), credit_limit = COALESCE(?6, credit_limit), credit_days = COALESCE(?7, credit_days), updated_at = ?8 WHERE id = ?9",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.phone)
    .bind(&data.rnc)
    .bind(&data.address)
    .bind(data.credit_enabled)
    .bind(data.credit_limit)
    .bind(data.credit_days)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    get(pool, id).await
}

/// Hard delete, refused while the client owes money
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = begin_write(pool).await?;
    let client = get(&mut *tx, id).await?;
    let pending: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM conduce WHERE client_id = ? AND status = 'pending'")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    credit::ensure_client_deletable(&client, pending)?;

    sqlx::query("DELETE FROM client WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

// ── Balance movements (transaction only) ────────────────────────────

/// Charge `amount` to the client's balance.
///
/// The guard is part of the UPDATE so two concurrent charges can never
/// jointly exceed the limit.
pub async fn charge_credit(conn: &mut SqliteConnection, id: i64, amount: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE client SET outstanding_balance = ROUND(outstanding_balance + ?1, 2), updated_at = ?2 WHERE id = ?3 AND credit_enabled = 1 AND ROUND(outstanding_balance + ?1, 2) <= credit_limit",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Rule(
            ErrorCode::CreditLimitExceeded,
            format!("Credit limit exceeded for client {id}"),
        ));
    }
    Ok(())
}

/// Release `amount` from the balance, floored at zero
pub async fn release_credit(conn: &mut SqliteConnection, id: i64, amount: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE client SET outstanding_balance = MAX(0, ROUND(outstanding_balance - ?1, 2)), updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Add `amount` back without the limit guard (reverting a settlement)
pub async fn restore_credit(conn: &mut SqliteConnection, id: i64, amount: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE client SET outstanding_balance = ROUND(outstanding_balance + ?1, 2), updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
