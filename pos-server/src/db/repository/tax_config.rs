//! Tax Config Repository (NCF sequences)

use super::{RepoError, RepoResult};
use crate::billing::numbering::format_ncf;
use shared::error::ErrorCode;
use shared::models::{TaxConfig, TaxConfigCreate, TaxConfigUpdate};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const TAX_CONFIG_SELECT: &str = "SELECT id, name, rnc, ncf_prefix, next_sequence, is_active, created_at, updated_at FROM tax_config";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::TaxConfigNotFound, format!("Tax config {id} not found"))
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<TaxConfig>>
where
    E: SqliteExecutor<'e>,
{
    let config = sqlx::query_as::<_, TaxConfig>(&format!("{TAX_CONFIG_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(config)
}

pub async fn get<'e, E>(db: E, id: i64) -> RepoResult<TaxConfig>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(db, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TaxConfig>> {
    let configs = sqlx::query_as::<_, TaxConfig>(&format!("{TAX_CONFIG_SELECT} ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(configs)
}

pub async fn create(pool: &SqlitePool, data: TaxConfigCreate) -> RepoResult<TaxConfig> {
    if data.next_sequence < 1 {
        return Err(RepoError::Validation("next_sequence must be at least 1".into()));
    }
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO tax_config (id, name, rnc, ncf_prefix, next_sequence, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.rnc.trim())
    .bind(data.ncf_prefix.trim().to_uppercase())
    .bind(data.next_sequence)
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await?;
    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: i64, data: TaxConfigUpdate) -> RepoResult<TaxConfig> {
    if data.next_sequence.is_some_and(|n| n < 1) {
        return Err(RepoError::Validation("next_sequence must be at least 1".into()));
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE tax_config SET name = COALESCE(?1, name), rnc = COALESCE(?2, rnc), ncf_prefix = COALESCE(?3, ncf_prefix), next_sequence = COALESCE(?4, next_sequence), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.rnc.as_deref().map(str::trim))
    .bind(data.ncf_prefix.map(|p| p.trim().to_uppercase()))
    .bind(data.next_sequence)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    get(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM tax_config WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Take the next NCF of an active configuration (inside the invoice tx)
pub async fn allocate_ncf(conn: &mut SqliteConnection, id: i64) -> RepoResult<String> {
    let config = get(&mut *conn, id).await?;
    if !config.is_active {
        return Err(RepoError::Rule(
            ErrorCode::TaxConfigInactive,
            format!("Tax config {} is inactive", config.name),
        ));
    }

    let now = shared::util::now_millis();
    let seq: i64 = sqlx::query_scalar(
        "UPDATE tax_config SET next_sequence = next_sequence + 1, updated_at = ?1 WHERE id = ?2 RETURNING next_sequence - 1",
    )
    .bind(now)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(format_ncf(&config.ncf_prefix, seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn b01() -> TaxConfigCreate {
        TaxConfigCreate {
            name: "Crédito fiscal".into(),
            rnc: "101000001".into(),
            ncf_prefix: "b01".into(),
            next_sequence: 7,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_allocate_ncf_advances_sequence() {
        let pool = test_pool().await;
        let config = create(&pool, b01()).await.unwrap();
        assert_eq!(config.ncf_prefix, "B01");

        let mut tx = pool.begin().await.unwrap();
        assert_eq!(allocate_ncf(&mut tx, config.id).await.unwrap(), "B0100000007");
        assert_eq!(allocate_ncf(&mut tx, config.id).await.unwrap(), "B0100000008");
        tx.commit().await.unwrap();

        assert_eq!(get(&pool, config.id).await.unwrap().next_sequence, 9);
    }

    #[tokio::test]
    async fn test_inactive_and_missing() {
        let pool = test_pool().await;
        let config = create(&pool, b01()).await.unwrap();
        update(
            &pool,
            config.id,
            TaxConfigUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let err = allocate_ncf(&mut conn, config.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::TaxConfigInactive, _)));
        let err = allocate_ncf(&mut conn, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ErrorCode::TaxConfigNotFound, _)));
    }

    #[tokio::test]
    async fn test_rejects_zero_sequence() {
        let pool = test_pool().await;
        let mut data = b01();
        data.next_sequence = 0;
        assert!(matches!(
            create(&pool, data).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }
}
