//! Unified error system for the back office
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON body of an error response
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Client / credit errors
//! - 2xxx: Delivery order errors
//! - 3xxx: Sale errors
//! - 4xxx: Invoice errors
//! - 5xxx: Conduce errors
//! - 6xxx: Cash register errors
//! - 7xxx: Configuration errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ConduceNotFound);
//!
//! let err = AppError::with_message(ErrorCode::CreditLimitExceeded, "Límite de crédito excedido");
//!
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "name");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed.code());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
