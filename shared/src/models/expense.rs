//! Expense Model (gastos)

use serde::{Deserialize, Serialize};

/// Cash expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create expense payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub description: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    /// Backdate the expense (Unix millis); defaults to now
    pub created_at: Option<i64>,
}

/// Update expense payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
}

fn default_category() -> String {
    "general".to_string()
}
