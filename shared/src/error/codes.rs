//! Unified error codes for the POS back office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Client / credit account errors
//! - 2xxx: Delivery order errors
//! - 3xxx: Counter sale errors
//! - 4xxx: Invoice errors
//! - 5xxx: Conduce (credit slip) errors
//! - 6xxx: Cash register errors (expenses, opening balance, amounts)
//! - 7xxx: Configuration errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the frontend can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (dates, numbers)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Client ====================
    /// Client not found
    ClientNotFound = 1001,
    /// Client still owes money or has pending conduces
    ClientHasBalance = 1002,
    /// Client is not enabled for credit
    CreditNotEnabled = 1003,
    /// Credit limit would be exceeded
    CreditLimitExceeded = 1004,

    // ==================== 2xxx: Delivery order ====================
    /// Order not found
    OrderNotFound = 2001,
    /// Order is delivered and can no longer change
    OrderAlreadyDelivered = 2002,
    /// Order has been voided
    OrderAlreadyVoided = 2003,
    /// Status change is not a forward move
    OrderInvalidTransition = 2004,
    /// Credit payment needs a registered client
    OrderCreditRequiresClient = 2005,

    // ==================== 3xxx: Sale ====================
    /// Sale not found
    SaleNotFound = 3001,
    /// Sale has already been voided
    SaleAlreadyVoided = 3002,
    /// Payment method not accepted for this document
    PaymentMethodNotAllowed = 3003,

    // ==================== 4xxx: Invoice ====================
    /// Invoice not found
    InvoiceNotFound = 4001,
    /// Invoice has already been voided
    InvoiceAlreadyVoided = 4002,
    /// Invoice requires an RNC but none is known
    InvoiceRncRequired = 4003,
    /// Settlement invoice must be voided before deletion
    InvoiceSettlementActive = 4004,
    /// Conduces in one settlement belong to different clients
    InvoiceMixedClients = 4005,
    /// Invoice needs a client or customer name
    InvoiceCustomerRequired = 4006,

    // ==================== 5xxx: Conduce ====================
    /// Conduce not found
    ConduceNotFound = 5001,
    /// Conduce is not pending
    ConduceNotPending = 5002,
    /// Only voided conduces can be deleted
    ConduceNotVoided = 5003,

    // ==================== 6xxx: Cash register ====================
    /// Expense not found
    ExpenseNotFound = 6001,
    /// No opening balance for the requested date
    OpeningBalanceNotFound = 6002,
    /// Amount is negative, zero where not allowed, or not finite
    InvalidAmount = 6003,
    /// Document has no line items
    DocumentEmpty = 6004,

    // ==================== 7xxx: Configuration ====================
    /// Tax profile not found
    TaxConfigNotFound = 7001,
    /// Tax profile is inactive
    TaxConfigInactive = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Client
            ErrorCode::ClientNotFound => "Client not found",
            ErrorCode::ClientHasBalance => "Client has an outstanding balance",
            ErrorCode::CreditNotEnabled => "Client is not enabled for credit",
            ErrorCode::CreditLimitExceeded => "Credit limit exceeded",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyDelivered => "Order has already been delivered",
            ErrorCode::OrderAlreadyVoided => "Order has already been voided",
            ErrorCode::OrderInvalidTransition => "Invalid order status transition",
            ErrorCode::OrderCreditRequiresClient => "Credit orders require a credit client",

            // Sale
            ErrorCode::SaleNotFound => "Sale not found",
            ErrorCode::SaleAlreadyVoided => "Sale has already been voided",
            ErrorCode::PaymentMethodNotAllowed => "Payment method not allowed",

            // Invoice
            ErrorCode::InvoiceNotFound => "Invoice not found",
            ErrorCode::InvoiceAlreadyVoided => "Invoice has already been voided",
            ErrorCode::InvoiceRncRequired => "Invoice requires an RNC",
            ErrorCode::InvoiceSettlementActive => "Settlement invoice must be voided first",
            ErrorCode::InvoiceMixedClients => "Conduces belong to different clients",
            ErrorCode::InvoiceCustomerRequired => "Invoice requires a client or customer name",

            // Conduce
            ErrorCode::ConduceNotFound => "Conduce not found",
            ErrorCode::ConduceNotPending => "Conduce is not pending",
            ErrorCode::ConduceNotVoided => "Only voided conduces can be deleted",

            // Cash register
            ErrorCode::ExpenseNotFound => "Expense not found",
            ErrorCode::OpeningBalanceNotFound => "Opening balance not found",
            ErrorCode::InvalidAmount => "Invalid amount",
            ErrorCode::DocumentEmpty => "Document has no items",

            // Configuration
            ErrorCode::TaxConfigNotFound => "Tax profile not found",
            ErrorCode::TaxConfigInactive => "Tax profile is inactive",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Client
            1001 => Ok(ErrorCode::ClientNotFound),
            1002 => Ok(ErrorCode::ClientHasBalance),
            1003 => Ok(ErrorCode::CreditNotEnabled),
            1004 => Ok(ErrorCode::CreditLimitExceeded),

            // Order
            2001 => Ok(ErrorCode::OrderNotFound),
            2002 => Ok(ErrorCode::OrderAlreadyDelivered),
            2003 => Ok(ErrorCode::OrderAlreadyVoided),
            2004 => Ok(ErrorCode::OrderInvalidTransition),
            2005 => Ok(ErrorCode::OrderCreditRequiresClient),

            // Sale
            3001 => Ok(ErrorCode::SaleNotFound),
            3002 => Ok(ErrorCode::SaleAlreadyVoided),
            3003 => Ok(ErrorCode::PaymentMethodNotAllowed),

            // Invoice
            4001 => Ok(ErrorCode::InvoiceNotFound),
            4002 => Ok(ErrorCode::InvoiceAlreadyVoided),
            4003 => Ok(ErrorCode::InvoiceRncRequired),
            4004 => Ok(ErrorCode::InvoiceSettlementActive),
            4005 => Ok(ErrorCode::InvoiceMixedClients),
            4006 => Ok(ErrorCode::InvoiceCustomerRequired),

            // Conduce
            5001 => Ok(ErrorCode::ConduceNotFound),
            5002 => Ok(ErrorCode::ConduceNotPending),
            5003 => Ok(ErrorCode::ConduceNotVoided),

            // Cash register
            6001 => Ok(ErrorCode::ExpenseNotFound),
            6002 => Ok(ErrorCode::OpeningBalanceNotFound),
            6003 => Ok(ErrorCode::InvalidAmount),
            6004 => Ok(ErrorCode::DocumentEmpty),

            // Configuration
            7001 => Ok(ErrorCode::TaxConfigNotFound),
            7002 => Ok(ErrorCode::TaxConfigInactive),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
