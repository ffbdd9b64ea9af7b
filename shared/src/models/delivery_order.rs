//! Delivery Order Model (órdenes de delivery)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PaymentMethod;

/// Delivery lifecycle: received → preparing → en_route → delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Received,
    Preparing,
    EnRoute,
    Delivered,
}

impl OrderStatus {
    /// Position along the lifecycle
    pub fn rank(&self) -> u8 {
        match self {
            Self::Received => 0,
            Self::Preparing => 1,
            Self::EnRoute => 2,
            Self::Delivered => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Preparing => "preparing",
            Self::EnRoute => "en_route",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliveryOrder {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    /// Registered client (required for credit orders)
    pub client_id: Option<i64>,
    pub description: Option<String>,
    pub amount: f64,
    pub delivery_fee: f64,
    /// amount + delivery_fee
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub is_voided: bool,
    pub void_reason: Option<String>,
    /// Conduce generated on credit delivery
    pub conduce_id: Option<i64>,
    pub delivered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOrderCreate {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub client_id: Option<i64>,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// PUT /api/ordenes/{id}/estado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// PUT /api/ordenes/{id}/metodoPago
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaymentUpdate {
    pub payment_method: PaymentMethod,
}
