//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Names: client, customer, company, tax profile
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, void reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, RNC, NCF prefix, category
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Logo URL or data URI
pub const MAX_LOGO_LEN: usize = 512 * 1024;

/// Maximum line items per document
pub const MAX_ITEMS: usize = 500;

/// Largest accepted monetary value or quantity
pub const MAX_AMOUNT: f64 = 100_000_000.0;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        ));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Money ───────────────────────────────────────────────────────────

/// Amount must be finite, non-negative and below [`MAX_AMOUNT`].
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be a finite number"),
        ));
    }
    if value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be non-negative, got {value}"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"),
        ));
    }
    Ok(())
}

/// Like [`validate_amount`] but zero is rejected too.
pub fn validate_positive_amount(value: f64, field: &str) -> Result<(), AppError> {
    validate_amount(value, field)?;
    if value <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be greater than zero"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Juan", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_required_text(&long, "name", MAX_NAME_LEN)
                .unwrap_err()
                .code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "phone", MAX_SHORT_TEXT_LEN).is_ok());
        let long = Some("9".repeat(MAX_SHORT_TEXT_LEN + 1));
        assert!(validate_optional_text(&long, "phone", MAX_SHORT_TEXT_LEN).is_err());
    }

    #[test]
    fn test_amounts() {
        assert!(validate_amount(0.0, "amount").is_ok());
        assert_eq!(
            validate_amount(-1.0, "amount").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert_eq!(
            validate_amount(f64::NAN, "amount").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert_eq!(
            validate_amount(MAX_AMOUNT * 2.0, "amount").unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(validate_positive_amount(0.0, "amount").is_err());
        assert!(validate_positive_amount(0.01, "amount").is_ok());
    }
}
