//! Shared types for the POS back office
//!
//! Domain models, error codes, notification messages and small utilities
//! used by pos-server and mirrored by the frontend.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use message::{Notification, NotificationType};
