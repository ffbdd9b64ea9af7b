//! Company Config Model (configuración de empresa, singleton)

use serde::{Deserialize, Serialize};

/// Company details printed on documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CompanyConfig {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rnc: Option<String>,
    /// Logo as URL or data URI
    pub logo: Option<String>,
    pub updated_at: i64,
}

/// Update company config payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyConfigUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rnc: Option<String>,
    pub logo: Option<String>,
}
