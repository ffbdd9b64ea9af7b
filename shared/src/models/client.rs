//! Client Model (clientes con cuenta de crédito)

use serde::{Deserialize, Serialize};

use super::Conduce;

/// Registered client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    /// Dominican taxpayer id
    pub rnc: Option<String>,
    pub address: Option<String>,
    pub credit_enabled: bool,
    pub credit_limit: f64,
    /// Only moved by conduce create/void and invoice settlement/void
    pub outstanding_balance: f64,
    /// Payment terms in days
    pub credit_days: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Client {
    /// Remaining credit, never negative
    pub fn available_credit(&self) -> f64 {
        (self.credit_limit - self.outstanding_balance).max(0.0)
    }
}

/// Create client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub phone: Option<String>,
    pub rnc: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub credit_enabled: bool,
    #[serde(default)]
    pub credit_limit: f64,
    #[serde(default)]
    pub credit_days: i32,
}

/// Update client payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub rnc: Option<String>,
    pub address: Option<String>,
    pub credit_enabled: Option<bool>,
    pub credit_limit: Option<f64>,
    pub credit_days: Option<i32>,
}

/// Client credit account view (GET /api/clientes/{id}/cuenta)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAccount {
    pub client: Client,
    pub available_credit: f64,
    pub pending_conduces: Vec<Conduce>,
}
