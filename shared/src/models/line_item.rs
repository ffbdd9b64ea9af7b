//! Line Item Model

use serde::{Deserialize, Serialize};

/// Document line (stored as JSON inside sales, invoices and conduces)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// quantity * unit_price, rounded to cents
    pub amount: f64,
}

/// Line item as submitted by the frontend; `amount` is always recomputed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit_price: f64,
}

fn default_quantity() -> f64 {
    1.0
}
