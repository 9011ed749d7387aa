//! # Error Types
//!
//! Domain-specific error types for shelfbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shelfbook-core errors (this file)                                     │
//! │  ├── CoreError        - Domain errors (not found, stale position, ...) │
//! │  └── ValidationError  - Product form validation failures               │
//! │                                                                         │
//! │  shelfbook-store errors (separate crate)                               │
//! │  ├── StoreError       - Key-value storage failures                     │
//! │  └── LedgerError      - CoreError | StoreError                         │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the terminal sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → Output   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product carries the given id.
    ///
    /// ## When This Occurs
    /// - Id typed by hand with a typo
    /// - Product was deleted by an earlier command
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A store-order position no longer points at a product.
    ///
    /// ## When This Occurs
    /// Position-based callers (`delete --at 3`) resolve the position against
    /// the current product list. If the list shrank in the meantime the
    /// position is stale.
    #[error("Position {position} is out of range (ledger holds {len} products)")]
    IndexOutOfRange { position: usize, len: usize },

    /// Malformed input to a standalone calculation (tax calculator).
    ///
    /// Reported inline to the caller. Never mutates any state.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Export formatting failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidInput error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary, before any derived value is computed, so a bad
/// form submission can never produce a half-valued record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field is not a number.
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: String, value: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
