//! Unified error codes for the Lotus booking core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 5xxx: Cart/voucher errors
//! - 7xxx: Table and hold errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Unified error code enum
///
/// Codes are represented as u16 values for efficient serialization and
/// cross-language compatibility with the console frontend.
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
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order status does not allow the requested change
    OrderStatusConflict = 4002,

    // ==================== 5xxx: Cart / Voucher ====================
    /// Cart contains items that are no longer purchasable
    CartStale = 5001,
    /// Cart is empty where at least one line is required
    CartEmpty = 5002,
    /// Voucher not eligible for the current order
    VoucherNotEligible = 5003,

    // ==================== 7xxx: Table / Hold ====================
    /// Table not found
    TableNotFound = 7001,
    /// Action not permitted from the table's current status
    InvalidTransition = 7002,
    /// Hold acquisition lost to another user
    HoldRejected = 7003,
    /// Hold has already expired
    HoldExpired = 7004,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Local storage error
    StorageError = 9002,
}

impl ErrorCode {
    /// Numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderStatusConflict => "Order status conflict",
            ErrorCode::CartStale => "Cart contains unavailable items",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::VoucherNotEligible => "Voucher not eligible",
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::InvalidTransition => "Invalid table transition",
            ErrorCode::HoldRejected => "Table hold rejected",
            ErrorCode::HoldExpired => "Table hold expired",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Local storage error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderStatusConflict),
            5001 => Ok(ErrorCode::CartStale),
            5002 => Ok(ErrorCode::CartEmpty),
            5003 => Ok(ErrorCode::VoucherNotEligible),
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::InvalidTransition),
            7003 => Ok(ErrorCode::HoldRejected),
            7004 => Ok(ErrorCode::HoldExpired),
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            _ => Err(format!("Unknown error code: {}", value)),
        }
    }
}

/// Application error with structured error code and details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level context)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an invalid transition error naming the attempted action
    /// and the table's current status
    pub fn invalid_transition(action: impl Into<String>, status: impl Into<String>) -> Self {
        let action = action.into();
        let status = status.into();
        Self::with_message(
            ErrorCode::InvalidTransition,
            format!("Action {} not permitted from status {}", action, status),
        )
        .with_detail("action", action)
        .with_detail("status", status)
    }

    /// Create a hold contention rejection
    pub fn hold_rejected(table_id: impl Into<String>) -> Self {
        let t = table_id.into();
        Self::with_message(
            ErrorCode::HoldRejected,
            format!("Table {} is held by another guest", t),
        )
        .with_detail("table_id", t)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
