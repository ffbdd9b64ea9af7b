//! Cash Closing Model (cierre de caja)

use serde::{Deserialize, Serialize};

/// End-of-day cash count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashClosing {
    pub id: i64,
    /// YYYY-MM-DD
    pub business_date: String,
    pub expected_cash: f64,
    pub counted_cash: f64,
    /// counted_cash - expected_cash
    pub variance: f64,
    pub note: Option<String>,
    pub created_at: i64,
}

/// Close day payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashClosingCreate {
    /// YYYY-MM-DD, defaults to today
    #[serde(alias = "fecha")]
    pub business_date: Option<String>,
    pub counted_cash: f64,
    pub note: Option<String>,
}
