//! Company Config Repository (singleton row id = 1)

use super::RepoResult;
use shared::models::{CompanyConfig, CompanyConfigUpdate};
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> RepoResult<CompanyConfig> {
    let config = sqlx::query_as::<_, CompanyConfig>(
        "SELECT name, address, phone, rnc, logo, updated_at FROM company_config WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(config.unwrap_or_default())
}

/// Partial update; absent fields keep their value
pub async fn update(pool: &SqlitePool, data: CompanyConfigUpdate) -> RepoResult<CompanyConfig> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO company_config (id, name, address, phone, rnc, logo, updated_at) VALUES (1, COALESCE(?1, ''), ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT(id) DO UPDATE SET name = COALESCE(?1, name), address = COALESCE(?2, address), phone = COALESCE(?3, phone), rnc = COALESCE(?4, rnc), logo = COALESCE(?5, logo), updated_at = ?6",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.rnc)
    .bind(&data.logo)
    .bind(now)
    .execute(pool)
    .await?;
    get(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_seeded_then_partial_update() {
        let pool = test_pool().await;
        let config = get(&pool).await.unwrap();
        assert_eq!(config.name, "");

        update(
            &pool,
            CompanyConfigUpdate {
                name: Some(" Colmado La Esquina ".into()),
                rnc: Some("131000002".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let config = update(
            &pool,
            CompanyConfigUpdate {
                phone: Some("809-555-0000".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(config.name, "Colmado La Esquina");
        assert_eq!(config.rnc.as_deref(), Some("131000002"));
        assert_eq!(config.phone.as_deref(), Some("809-555-0000"));
        assert!(config.updated_at > 0);
    }
}
