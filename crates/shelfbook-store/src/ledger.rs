//! # Ledger Store
//!
//! Owns the product list and stock history for the life of the process and
//! keeps them in step with the key-value store.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Ledger::open(store, settings)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  get("products"), get("stockHistory")                                  │
//! │       │   I/O failure ──────────────► Err(StoreError)  (nothing loaded)│
//! │       │   missing key ──────────────► empty list                       │
//! │       │   bad element / bad JSON ───► "<key>.quarantine" + warn!       │
//! │       ▼                                                                 │
//! │  ensure_ids() on legacy records                                        │
//! │       │   (cleaned state written back once if anything changed)        │
//! │       ▼                                                                 │
//! │  Mutex<Inventory>                                                      │
//! │       │                                                                 │
//! │       │  add / update / delete:                                        │
//! │       │    lock ─► snapshot ─► mutate ─► set_many ─┬─► Ok              │
//! │       │                                            └─► restore, Err    │
//! │       ▼                                                                 │
//! │  view / dashboard / exports read a clone under the lock                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use shelfbook_core::dashboard::{self, DashboardSummary};
use shelfbook_core::export;
use shelfbook_core::inventory::Inventory;
use shelfbook_core::query::{self, Page, ProductRow, ViewQuery};
use shelfbook_core::{CoreResult, HistoryEntry, LedgerSettings, Product, ProductInput};

use crate::error::{LedgerResult, StoreResult};
use crate::kv::KeyValueStore;

/// Storage key for the product array.
pub const PRODUCTS_KEY: &str = "products";

/// Storage key for the stock history array.
pub const HISTORY_KEY: &str = "stockHistory";

/// Where unreadable product records are kept.
pub const PRODUCTS_QUARANTINE_KEY: &str = "products.quarantine";

/// Where unreadable history records are kept.
pub const HISTORY_QUARANTINE_KEY: &str = "stockHistory.quarantine";

/// What [`Ledger::open`] found in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub products: usize,
    pub history: usize,
    pub quarantined_products: usize,
    pub quarantined_history: usize,
    pub ids_assigned: usize,
}

impl LoadReport {
    /// True when loading changed what is stored.
    pub fn needs_write_back(&self) -> bool {
        self.quarantined_products > 0 || self.quarantined_history > 0 || self.ids_assigned > 0
    }
}

/// The inventory ledger.
///
/// ## Usage
/// ```rust,ignore
/// let store = Arc::new(SqliteStore::connect(DbConfig::new(path)).await?);
/// let ledger = Ledger::open(store, LedgerSettings::default()).await?;
///
/// let rice = ledger.add_product(&input).await?;
/// let page = ledger.view(&ViewQuery::search("rice")).await;
/// ```
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    settings: LedgerSettings,
    inventory: Mutex<Inventory>,
    report: LoadReport,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("settings", &self.settings)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads the ledger from `store`.
    ///
    /// Malformed records are quarantined rather than failing the load; a
    /// storage read failure is returned as an error so that a later write
    /// can never overwrite data that merely couldn't be read.
    pub async fn open(store: Arc<dyn KeyValueStore>, settings: LedgerSettings) -> LedgerResult<Self> {
        let (inventory, report) = load(store.as_ref()).await?;

        info!(
            products = report.products,
            history = report.history,
            "Ledger loaded"
        );

        Ok(Ledger {
            store,
            settings,
            inventory: Mutex::new(inventory),
            report,
        })
    }

    /// What the initial load found.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validates the form, derives values, appends the product and an
    /// `Added` history entry, then persists.
    pub async fn add_product(&self, input: &ProductInput) -> LedgerResult<Product> {
        let draft = input.validate()?;
        let rate = self.settings.tax_rate;

        let product = self
            .mutate(|inventory| Ok(inventory.add(draft, rate, Local::now().naive_local())))
            .await?;

        info!(id = %product.id, name = %product.name, quantity = product.quantity, "Product added");
        Ok(product)
    }

    /// Replaces a product's fields in place. The id and position are kept,
    /// values are re-derived and an `Updated` entry is recorded.
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> LedgerResult<Product> {
        let draft = input.validate()?;
        let rate = self.settings.tax_rate;

        let product = self
            .mutate(|inventory| inventory.update(id, draft, rate, Local::now().naive_local()))
            .await?;

        info!(id = %product.id, name = %product.name, quantity = product.quantity, "Product updated");
        Ok(product)
    }

    /// Removes a product and records a `Deleted` entry.
    pub async fn delete_product(&self, id: &str) -> LedgerResult<Product> {
        let product = self
            .mutate(|inventory| inventory.remove(id, Local::now().naive_local()))
            .await?;

        info!(id = %product.id, name = %product.name, "Product deleted");
        Ok(product)
    }

    /// Runs `change` and persists, restoring the prior state if either fails.
    async fn mutate<T, F>(&self, change: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut Inventory) -> CoreResult<T>,
    {
        let mut inventory = self.inventory.lock().await;
        let snapshot = inventory.clone();

        let value = change(&mut inventory)?;

        if let Err(err) = write_inventory(self.store.as_ref(), &inventory, Vec::new()).await {
            error!(error = %err, "Persist failed, rolling back in-memory change");
            *inventory = snapshot;
            return Err(err.into());
        }

        Ok(value)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A form pre-filled from the stored product, for editing.
    pub async fn edit_form(&self, id: &str) -> LedgerResult<ProductInput> {
        let inventory = self.inventory.lock().await;
        Ok(ProductInput::from_product(inventory.get(id)?))
    }

    /// Resolves a 1-based store-order position to a product id.
    pub async fn product_id_at(&self, position: usize) -> LedgerResult<String> {
        Ok(self.inventory.lock().await.product_id_at(position)?)
    }

    pub async fn find(&self, id: &str) -> Option<Product> {
        self.inventory.lock().await.find(id).cloned()
    }

    /// All products in store order.
    pub async fn products(&self) -> Vec<Product> {
        self.inventory.lock().await.products.clone()
    }

    /// The full stock history, oldest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.inventory.lock().await.history.clone()
    }

    /// Filters, sorts and pages the products as of today's local date.
    pub async fn view(&self, view: &ViewQuery) -> Page<ProductRow> {
        self.view_on(view, Local::now().date_naive()).await
    }

    /// Like [`view`](Self::view) with an explicit "today".
    pub async fn view_on(&self, view: &ViewQuery, today: NaiveDate) -> Page<ProductRow> {
        let inventory = self.inventory.lock().await;
        query::query(&inventory.products, view, &self.settings, today)
    }

    pub async fn dashboard(&self) -> DashboardSummary {
        let inventory = self.inventory.lock().await;
        dashboard::summarize(&inventory.products, &self.settings)
    }

    pub async fn categories(&self) -> Vec<String> {
        query::categories(&self.inventory.lock().await.products)
    }

    pub async fn export_csv(&self) -> LedgerResult<String> {
        Ok(export::to_csv(&self.inventory.lock().await.products)?)
    }

    pub async fn export_text(&self) -> LedgerResult<String> {
        let inventory = self.inventory.lock().await;
        Ok(export::to_delimited_text(
            &inventory.products,
            &self.settings.currency_symbol,
        )?)
    }
}

// =============================================================================
// Storage Helpers
// =============================================================================

async fn load(store: &dyn KeyValueStore) -> LedgerResult<(Inventory, LoadReport)> {
    let (products, bad_products) = read_array::<Product>(store, PRODUCTS_KEY).await?;
    let (history, bad_history) = read_array::<HistoryEntry>(store, HISTORY_KEY).await?;

    let mut inventory = Inventory::new(products, history);
    let ids_assigned = inventory.ensure_ids();

    let report = LoadReport {
        products: inventory.products.len(),
        history: inventory.history.len(),
        quarantined_products: bad_products.len(),
        quarantined_history: bad_history.len(),
        ids_assigned,
    };

    if report.needs_write_back() {
        let mut extra = Vec::new();
        if !bad_products.is_empty() {
            let merged = merge_quarantine(store, PRODUCTS_QUARANTINE_KEY, bad_products).await?;
            extra.push((PRODUCTS_QUARANTINE_KEY, merged));
        }
        if !bad_history.is_empty() {
            let merged = merge_quarantine(store, HISTORY_QUARANTINE_KEY, bad_history).await?;
            extra.push((HISTORY_QUARANTINE_KEY, merged));
        }

        write_inventory(store, &inventory, extra).await?;
        debug!(
            quarantined_products = report.quarantined_products,
            quarantined_history = report.quarantined_history,
            ids_assigned = report.ids_assigned,
            "Wrote back cleaned ledger state"
        );
    }

    Ok((inventory, report))
}

/// Reads a JSON array, splitting it into parsed records and raw rejects.
async fn read_array<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<(Vec<T>, Vec<Value>)> {
    let Some(raw) = store.get(key).await? else {
        return Ok((Vec::new(), Vec::new()));
    };

    let elements = match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(elements) => elements,
        Err(err) => {
            warn!(key, error = %err, "Stored value is not a JSON array, quarantining it");
            return Ok((Vec::new(), vec![Value::String(raw)]));
        }
    };

    let mut parsed = Vec::with_capacity(elements.len());
    let mut rejected = Vec::new();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<T>(element.clone()) {
            Ok(record) => parsed.push(record),
            Err(err) => {
                warn!(key, index, error = %err, "Skipping malformed record");
                rejected.push(element);
            }
        }
    }

    Ok((parsed, rejected))
}

/// Appends rejects to whatever the quarantine key already holds.
async fn merge_quarantine(
    store: &dyn KeyValueStore,
    key: &str,
    rejected: Vec<Value>,
) -> StoreResult<String> {
    let mut held = match store.get(key).await? {
        None => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<Value>>(&raw).unwrap_or_else(|_| vec![Value::String(raw)]),
    };
    held.extend(rejected);
    Ok(serde_json::to_string(&held)?)
}

async fn write_inventory(
    store: &dyn KeyValueStore,
    inventory: &Inventory,
    mut extra: Vec<(&str, String)>,
) -> StoreResult<()> {
    let mut entries = vec![
        (PRODUCTS_KEY, serde_json::to_string(&inventory.products)?),
        (HISTORY_KEY, serde_json::to_string(&inventory.history)?),
    ];
    entries.append(&mut extra);
    store.set_many(&entries).await
}

// =============================================================================
// Unit Tests
// =============================================================================
