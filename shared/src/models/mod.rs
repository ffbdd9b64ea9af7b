//! Data models
//!
//! Shared between pos-server and the frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod cash_closing;
pub mod client;
pub mod company_config;
pub mod conduce;
pub mod delivery_order;
pub mod expense;
pub mod invoice;
pub mod line_item;
pub mod opening_balance;
pub mod payment;
pub mod reconciliation;
pub mod sale;
pub mod tax_config;

// Re-exports
pub use cash_closing::*;
pub use client::*;
pub use company_config::*;
pub use conduce::*;
pub use delivery_order::*;
pub use expense::*;
pub use invoice::*;
pub use line_item::*;
pub use opening_balance::*;
pub use payment::*;
pub use reconciliation::*;
pub use sale::*;
pub use tax_config::*;
