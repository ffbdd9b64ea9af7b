//! Sale Model (ventas de mostrador)

use serde::{Deserialize, Serialize};

use super::{LineItem, LineItemInput, PaymentMethod};

/// Counter sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    /// VEN-000001
    pub number: String,
    pub client_id: Option<i64>,
    /// Snapshot of the client name at sale time
    pub client_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub is_fiscal: bool,
    pub payment_method: PaymentMethod,
    pub is_voided: bool,
    pub void_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub is_fiscal: bool,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}
