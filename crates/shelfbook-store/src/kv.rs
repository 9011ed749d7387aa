//! # Key-Value Storage
//!
//! The storage seam the ledger persists through.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Arc<dyn KeyValueStore>                               │
//! │                             │                                           │
//! │            ┌────────────────┴────────────────┐                          │
//! │            ▼                                 ▼                          │
//! │   ┌─────────────────┐               ┌─────────────────┐                 │
//! │   │   SqliteStore   │               │   MemoryStore   │                 │
//! │   │   (pool.rs)     │               │   (this file)   │                 │
//! │   │                 │               │                 │                 │
//! │   │ kv_entries      │               │ HashMap         │                 │
//! │   │ WAL, migrations │               │ optional quota  │                 │
//! │   │ set_many = 1 tx │               │ all-or-nothing  │                 │
//! │   └─────────────────┘               └─────────────────┘                 │
//! │       durable                          tests, demos                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings (the ledger writes JSON arrays). A missing key
//! reads as `None`, never as an error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// String key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a key. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes one key.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes a key. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Writes several keys, all or nothing.
    async fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process store with an optional byte quota.
///
/// ## Quota
/// The quota counts key and value bytes across every entry, the way browser
/// storage does. A write that would exceed it fails with
/// [`StoreError::QuotaExceeded`] and changes nothing.
///
/// ```rust
/// use shelfbook_store::kv::MemoryStore;
///
/// let store = MemoryStore::with_quota(64);
/// assert_eq!(store.quota(), Some(64));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Creates a store that rejects writes past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryStore {
            quota: Some(bytes),
            ..Default::default()
        }
    }

    /// The configured quota, if any.
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently held (keys plus values).
    pub async fn usage(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Makes every read and write fail, like storage disabled by the host.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, op: &str) -> StoreResult<()> {
        if !self.unavailable.load(Ordering::SeqCst) {
            return Ok(());
        }
        let reason = "storage is unavailable".to_string();
        Err(match op {
            "read" => StoreError::ReadFailed(reason),
            _ => StoreError::WriteFailed(reason),
        })
    }

    fn check_quota(
        &self,
        entries: &HashMap<String, String>,
        writes: &[(&str, &str)],
    ) -> StoreResult<()> {
        let Some(limit) = self.quota else {
            return Ok(());
        };

        // Later writes to the same key replace earlier ones in the batch
        let batch: HashMap<&str, &str> = writes.iter().copied().collect();
        let projected: usize = entries
            .iter()
            .filter(|(k, _)| !batch.contains_key(k.as_str()))
            .map(|(k, v)| k.len() + v.len())
            .chain(batch.iter().map(|(k, v)| k.len() + v.len()))
            .sum();

        if projected > limit {
            let key = writes.first().map(|(k, _)| k.to_string()).unwrap_or_default();
            debug!(key = %key, bytes = projected, limit, "Write rejected by quota");
            return Err(StoreError::QuotaExceeded {
                key,
                bytes: projected,
                limit,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_available("read")?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_available("write")?;
        let mut entries = self.entries.lock().await;
        self.check_quota(&entries, &[(key, value)])?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_available("write")?;
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn set_many(&self, writes: &[(&str, String)]) -> StoreResult<()> {
        self.check_available("write")?;
        let mut entries = self.entries.lock().await;
        let borrowed: Vec<(&str, &str)> = writes.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.check_quota(&entries, &borrowed)?;
        for (key, value) in writes {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
