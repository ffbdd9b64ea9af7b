//! Tax Config Model (configuración RNC / secuencias NCF)

use serde::{Deserialize, Serialize};

/// RNC profile with its NCF sequence counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TaxConfig {
    pub id: i64,
    pub name: String,
    pub rnc: String,
    /// e.g. B01 (crédito fiscal), B02 (consumo)
    pub ncf_prefix: String,
    pub next_sequence: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create tax profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfigCreate {
    pub name: String,
    pub rnc: String,
    pub ncf_prefix: String,
    #[serde(default = "default_next_sequence")]
    pub next_sequence: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Update tax profile payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxConfigUpdate {
    pub name: Option<String>,
    pub rnc: Option<String>,
    pub ncf_prefix: Option<String>,
    pub next_sequence: Option<i64>,
    pub is_active: Option<bool>,
}

fn default_next_sequence() -> i64 {
    1
}

fn default_true() -> bool {
    true
}
