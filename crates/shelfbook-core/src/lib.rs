//! # shelfbook-core: Pure Inventory Logic for Shelfbook
//!
//! This crate holds every inventory rule Shelfbook applies, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelfbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shelfbook CLI (clap)                         │   │
//! │  │    add / edit / delete / list / dashboard / export / tax        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                shelfbook-store (Ledger)                         │   │
//! │  │     Mutex<Inventory> ──► KeyValueStore (SQLite / memory)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shelfbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ valuation │  │   query   │  │ dashboard │  │   │
//! │  │   │  Product  │  │  derive   │  │  filter   │  │ summarize │  │   │
//! │  │   │  History  │  │  (VAT)    │  │  sort/page│  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │validation │  │    tax    │  │  export   │  │   │
//! │  │   │ add/update│  │  forms    │  │  quote    │  │ csv / txt │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK READS • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, HistoryEntry, TaxRate, settings)
//! - [`money`] - Money type with integer arithmetic
//! - [`valuation`] - VAT, shelf price and total value derivation
//! - [`validation`] - Product form validation
//! - [`inventory`] - Product list and stock history mutations
//! - [`query`] - Filtering, sorting, pagination, row alerts
//! - [`dashboard`] - Summary figures
//! - [`tax`] - Standalone tax calculator
//! - [`export`] - CSV and tab-delimited exports
//! - [`auth`] - Demo login check
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the current date and time are parameters, never read
//! 2. **No I/O**: storage, files and logging subscribers live in other crates
//! 3. **Integer Money**: all amounts are minor units (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use shelfbook_core::money::Money;
//! use shelfbook_core::types::TaxRate;
//! use shelfbook_core::valuation::derive;
//!
//! let rice = derive(Money::from_major(1000), 4, TaxRate::from_bps(750));
//!
//! assert_eq!(rice.vat, Money::from_major(75));
//! assert_eq!(rice.total_value.to_string(), "4300.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod inventory;
pub mod money;
pub mod query;
pub mod tax;
pub mod types;
pub mod validation;
pub mod valuation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::DemoCredentials;
pub use dashboard::DashboardSummary;
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use money::Money;
pub use query::{Page, ProductRow, StockAlert, ViewQuery};
pub use tax::TaxQuote;
pub use types::*;
pub use valuation::Valuation;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default VAT in basis points (7.5%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 750;

/// Low-stock level for products without their own reorder level.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Rows per page in the product table.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Products expiring within this many days are flagged.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Currency prefix used in formatted amounts (Naira).
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";
