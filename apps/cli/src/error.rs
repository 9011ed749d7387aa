//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shelfbook                              │
//! │                                                                         │
//! │  shelfbook delete --at 9                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<Output, ApiError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── StoreError::QuotaExceeded ─────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Domain Error? ─── CoreError::IndexOutOfRange ─── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  text:  error[INDEX_OUT_OF_RANGE]: Position 9 is out of range ...       │
//! │  json:  {"code": "INDEX_OUT_OF_RANGE", "message": "..."}                │
//! │  exit status from ErrorCode::exit_code                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shelfbook_core::CoreError;
use shelfbook_store::{LedgerError, StoreError};
use std::fmt;

use crate::config::ConfigError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// What `--json` prints when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 5d0c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id
    NotFound,

    /// Product form rejected
    ValidationError,

    /// Malformed standalone input (tax calculator)
    InvalidInput,

    /// Stale or invalid store-order position
    IndexOutOfRange,

    /// Storage read/write failed (including quota)
    StorageError,

    /// Configuration file or environment is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// The wire name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::IndexOutOfRange => "INDEX_OUT_OF_RANGE",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError | ErrorCode::InvalidInput | ErrorCode::IndexOutOfRange => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::StorageError => 4,
            ErrorCode::ConfigError => 5,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::IndexOutOfRange { .. } => {
                ApiError::new(ErrorCode::IndexOutOfRange, err.to_string())
            }
            CoreError::InvalidInput { field, reason } => ApiError::new(
                ErrorCode::InvalidInput,
                format!("Invalid {}: {}", field, reason),
            ),
            CoreError::Export(e) => {
                tracing::error!("Export failed: {}", e);
                ApiError::internal("Export failed")
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::QuotaExceeded { .. } => ApiError::new(
                ErrorCode::StorageError,
                format!("{}. Nothing was changed.", err),
            ),
            StoreError::ReadFailed(_) | StoreError::WriteFailed(_) => {
                tracing::error!(error = %err, "Storage operation failed");
                ApiError::new(ErrorCode::StorageError, err.to_string())
            }
            StoreError::ConnectionFailed(_) | StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, err.to_string())
            }
            StoreError::Serialization(e) | StoreError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                ApiError::internal("Storage operation failed")
            }
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Core(e) => e.into(),
            LedgerError::Store(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Could not render JSON: {}", err))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for CLI commands.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shelfbook_core::ValidationError;

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::ProductNotFound("p-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: p-1");

        let err: ApiError = CoreError::IndexOutOfRange { position: 4, len: 2 }.into();
        assert_eq!(err.code, ErrorCode::IndexOutOfRange);

        let err: ApiError = CoreError::invalid_input("base amount", "'abc' is not a number").into();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err: ApiError = LedgerError::from(ValidationError::Required {
            field: "name".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "name is required");
    }

    #[test]
    fn test_storage_error_codes() {
        let err: ApiError = StoreError::QuotaExceeded {
            key: "products".to_string(),
            bytes: 10,
            limit: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(err.message.ends_with("Nothing was changed."));
        assert_eq!(err.code.exit_code(), 4);
    }

    #[test]
    fn test_json_shape() {
        let err = ApiError::not_found("Product", "p-9");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: p-9");
        assert_eq!(err.to_string(), "error[NOT_FOUND]: Product not found: p-9");
    }
}
