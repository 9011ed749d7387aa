//! # shelfbook-store: Persistence Layer for Shelfbook
//!
//! This crate keeps the inventory ledger durable. It provides the
//! key-value storage seam, a SQLite backend, an in-memory backend and the
//! [`Ledger`] that ties them to the pure logic in `shelfbook-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelfbook Data Flow                              │
//! │                                                                         │
//! │  CLI command (shelfbook add ...)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shelfbook-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Ledger     │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │  (ledger.rs)  │───►│   (kv.rs)     │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Mutex<Inv.>   │    │ SqliteStore   │───►│ 001_kv_...   │  │   │
//! │  │   │ quarantine    │    │ MemoryStore   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/shelfbook/shelfbook.db                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`ledger`] - The Ledger Store (load, mutate-then-persist, reads)
//! - [`kv`] - `KeyValueStore` trait and the in-memory backend
//! - [`pool`] - SQLite connection pool and backend
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage and ledger error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shelfbook_store::{DbConfig, Ledger, SqliteStore};
//!
//! let store = SqliteStore::connect(DbConfig::new("shelfbook.db")).await?;
//! let ledger = Ledger::open(Arc::new(store), LedgerSettings::default()).await?;
//!
//! let summary = ledger.dashboard().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod ledger;
pub mod migrations;
pub mod pool;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{LedgerError, LedgerResult, StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use ledger::{Ledger, LoadReport};
pub use pool::{DbConfig, SqliteStore};
