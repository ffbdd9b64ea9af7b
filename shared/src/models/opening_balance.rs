//! Opening Balance Model (monto inicial de caja)

use serde::{Deserialize, Serialize};

/// Cash float at day start, one per business date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OpeningBalance {
    pub id: i64,
    /// YYYY-MM-DD
    pub business_date: String,
    pub amount: f64,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningBalanceSet {
    /// YYYY-MM-DD, defaults to today
    #[serde(alias = "fecha")]
    pub business_date: Option<String>,
    pub amount: f64,
    pub note: Option<String>,
}
