//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Client errors
/// - 2xxx: Delivery order errors
/// - 3xxx: Sale errors
/// - 4xxx: Invoice errors
/// - 5xxx: Conduce errors
/// - 6xxx: Cash register errors
/// - 7xxx: Configuration errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Client,
    Order,
    Sale,
    Invoice,
    Conduce,
    Cash,
    Config,
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Client,
            2000..3000 => Self::Order,
            3000..4000 => Self::Sale,
            4000..5000 => Self::Invoice,
            5000..6000 => Self::Conduce,
            6000..7000 => Self::Cash,
            7000..8000 => Self::Config,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Client => "client",
            Self::Order => "order",
            Self::Sale => "sale",
            Self::Invoice => "invoice",
            Self::Conduce => "conduce",
            Self::Cash => "cash",
            Self::Config => "config",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
