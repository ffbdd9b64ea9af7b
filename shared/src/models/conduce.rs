//! Conduce Model (conduces / notas de crédito a clientes)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LineItem, LineItemInput};

/// Conduce state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ConduceStatus {
    #[default]
    Pending,
    Paid,
    Voided,
}

impl ConduceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for ConduceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credit slip issued to a registered client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Conduce {
    pub id: i64,
    /// CON-000001
    pub number: String,
    pub client_id: i64,
    pub client_name: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: ConduceStatus,
    pub is_fiscal: bool,
    pub void_reason: Option<String>,
    /// Settling invoice
    pub invoice_id: Option<i64>,
    /// Delivery order that produced this conduce
    pub order_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create conduce payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConduceCreate {
    pub client_id: i64,
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub is_fiscal: bool,
}
