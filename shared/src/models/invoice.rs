//! Invoice Model (facturas)

use serde::{Deserialize, Serialize};

use super::{LineItem, LineItemInput, PaymentMethod};

/// Invoice, either direct or settling a set of conduces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    /// FAC-000001
    pub number: String,
    pub client_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_rnc: Option<String>,
    /// Originating delivery order
    pub order_id: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub is_fiscal: bool,
    pub requires_rnc: bool,
    /// Fiscal sequence number (B0100000001)
    pub ncf: Option<String>,
    pub tax_config_id: Option<i64>,
    pub payment_method: PaymentMethod,
    pub is_voided: bool,
    pub void_reason: Option<String>,
    /// Settled conduces
    #[cfg_attr(feature = "db", sqlx(json))]
    pub conduce_ids: Vec<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Invoice {
    pub fn is_settlement(&self) -> bool {
        !self.conduce_ids.is_empty()
    }
}

/// Create invoice payload
///
/// A non-empty `conduce_ids` selects settlement mode; `items` is then ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub client_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_rnc: Option<String>,
    pub order_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub is_fiscal: bool,
    #[serde(default)]
    pub requires_rnc: bool,
    pub tax_config_id: Option<i64>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub conduce_ids: Vec<i64>,
}
