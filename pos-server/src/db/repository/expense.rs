//! Expense Repository

use super::{RepoError, RepoResult, TimeRange};
use crate::billing::money;
use shared::error::ErrorCode;
use shared::models::{Expense, ExpenseCreate, ExpenseUpdate};
use sqlx::SqlitePool;

const EXPENSE_SELECT: &str =
    "SELECT id, description, amount, category, created_at, updated_at FROM expense";

fn not_found(id: i64) -> RepoError {
    RepoError::not_found(ErrorCode::ExpenseNotFound, format!("Expense {id} not found"))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Expense>> {
    let expense = sqlx::query_as::<_, Expense>(&format!("{EXPENSE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(expense)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Expense> {
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

pub async fn find_all(pool: &SqlitePool, range: Option<TimeRange>) -> RepoResult<Vec<Expense>> {
    let (start, end) = range
        .map(|r| (Some(r.start), Some(r.end)))
        .unwrap_or((None, None));
    let expenses = sqlx::query_as::<_, Expense>(&format!(
        "{EXPENSE_SELECT} WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(expenses)
}

/// `created_at` may be back-dated by the caller
pub async fn create(pool: &SqlitePool, data: ExpenseCreate) -> RepoResult<Expense> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let category = match data.category.trim() {
        "" => "general".to_string(),
        c => c.to_lowercase(),
    };
    sqlx::query(
        "INSERT INTO expense (id, description, amount, category, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.description.trim())
    .bind(money::round2(data.amount))
    .bind(category)
    .bind(data.created_at.unwrap_or(now))
    .bind(now)
    .execute(pool)
    .await?;
    get(pool, id).await
}

pub async fn update(pool: &SqlitePool, id: i64, data: ExpenseUpdate) -> RepoResult<Expense> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE expense SET description = COALESCE(?1, description), amount = COALESCE(?2, amount), category = COALESCE(?3, category), updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.description.as_deref().map(str::trim))
    .bind(data.amount.map(money::round2))
    .bind(data.category.map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty()))
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
    let rows = sqlx::query("DELETE FROM expense WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_crud_and_range() {
        let pool = test_pool().await;
        let old = create(
            &pool,
            ExpenseCreate {
                description: "Gas".into(),
                amount: 250.456,
                category: "Combustible".into(),
                created_at: Some(1_000),
            },
        )
        .await
        .unwrap();
        assert_eq!(old.amount, 250.46);
        assert_eq!(old.category, "combustible");
        assert_eq!(old.created_at, 1_000);

        let recent = create(
            &pool,
            ExpenseCreate {
                description: "Hielo".into(),
                amount: 100.0,
                category: String::new(),
                created_at: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(recent.category, "general");

        let in_range = find_all(&pool, Some(TimeRange::new(0, 2_000))).await.unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].id, old.id);

        let updated = update(
            &pool,
            recent.id,
            ExpenseUpdate {
                amount: Some(120.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.amount, 120.0);
        assert_eq!(updated.description, "Hielo");

        delete(&pool, old.id).await.unwrap();
        assert!(matches!(
            get(&pool, old.id).await.unwrap_err(),
            RepoError::NotFound(ErrorCode::ExpenseNotFound, _)
        ));
    }
}
