//! Document Sequence Repository
//!
//! Atomic counters for VEN / CON / FAC numbers. Always called inside the
//! transaction that inserts the numbered document.

use sqlx::SqliteConnection;

use super::{RepoError, RepoResult};
use crate::billing::numbering::{DocumentKind, format_number};

/// Increment the counter of `kind` and return the formatted number
pub async fn next_number(conn: &mut SqliteConnection, kind: DocumentKind) -> RepoResult<String> {
    let seq: Option<i64> = sqlx::query_scalar(
        "UPDATE document_sequence SET last_value = last_value + 1 WHERE prefix = ? RETURNING last_value",
    )
    .bind(kind.prefix())
    .fetch_optional(&mut *conn)
    .await?;

    let seq = seq.ok_or_else(|| {
        RepoError::Database(format!("Missing document sequence {}", kind.prefix()))
    })?;
    Ok(format_number(kind, seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn test_numbers_are_sequential_per_kind() {
        let pool = test_pool().await;
        let mut tx = pool.begin().await.unwrap();
        assert_eq!(next_number(&mut tx, DocumentKind::Sale).await.unwrap(), "VEN-000001");
        assert_eq!(next_number(&mut tx, DocumentKind::Sale).await.unwrap(), "VEN-000002");
        assert_eq!(next_number(&mut tx, DocumentKind::Invoice).await.unwrap(), "FAC-000001");
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert_eq!(next_number(&mut tx, DocumentKind::Conduce).await.unwrap(), "CON-000001");
        assert_eq!(next_number(&mut tx, DocumentKind::Sale).await.unwrap(), "VEN-000003");
    }

    #[tokio::test]
    async fn test_rolled_back_number_is_reused() {
        let pool = test_pool().await;
        {
            let mut tx = pool.begin().await.unwrap();
            next_number(&mut tx, DocumentKind::Invoice).await.unwrap();
            // dropped without commit
        }
        let mut tx = pool.begin().await.unwrap();
        assert_eq!(next_number(&mut tx, DocumentKind::Invoice).await.unwrap(), "FAC-000001");
    }
}
