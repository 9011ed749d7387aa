//! # Inventory
//!
//! The in-memory product list and its stock history, plus every mutation
//! that touches them.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ProductDraft ──► add ──────► products.push   ──► history: Added       │
//! │                                                                         │
//! │   id + Draft ────► update ───► products[i] = … ──► history: Updated     │
//! │                                (id kept, values re-derived)             │
//! │                                                                         │
//! │   id ────────────► remove ───► products.remove ──► history: Deleted     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here persists. The store crate wraps an `Inventory` in a mutex,
//! snapshots it before each mutation and restores the snapshot if the write
//! to storage fails.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    HistoryEntry, HistoryKind, Product, ProductDraft, TaxRate, TIMESTAMP_FORMAT,
};

/// Products in store (insertion) order plus the append-only history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub products: Vec<Product>,
    pub history: Vec<HistoryEntry>,
}

impl Inventory {
    /// Builds an inventory from loaded records.
    pub fn new(products: Vec<Product>, history: Vec<HistoryEntry>) -> Self {
        Inventory { products, history }
    }

    /// Assigns fresh ids to records stored before ids existed.
    ///
    /// Returns how many records were changed.
    pub fn ensure_ids(&mut self) -> usize {
        let mut assigned = 0;
        for product in self.products.iter_mut().filter(|p| p.id.is_empty()) {
            product.id = new_id();
            assigned += 1;
        }
        for entry in self.history.iter_mut().filter(|h| h.id.is_empty()) {
            entry.id = new_id();
            assigned += 1;
        }
        assigned
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Finds a product by id.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Like [`find`](Self::find) but fails with `ProductNotFound`.
    pub fn get(&self, id: &str) -> CoreResult<&Product> {
        self.find(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Resolves a 1-based store-order position to a product id.
    ///
    /// ```rust
    /// use shelfbook_core::inventory::Inventory;
    ///
    /// let inventory = Inventory::default();
    /// assert!(inventory.product_id_at(1).is_err());
    /// ```
    pub fn product_id_at(&self, position: usize) -> CoreResult<String> {
        position
            .checked_sub(1)
            .and_then(|index| self.products.get(index))
            .map(|p| p.id.clone())
            .ok_or(CoreError::IndexOutOfRange {
                position,
                len: self.products.len(),
            })
    }

    fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends a new product and an `Added` history entry.
    pub fn add(&mut self, draft: ProductDraft, rate: TaxRate, now: NaiveDateTime) -> Product {
        let product = draft.into_product(new_id(), rate);
        self.record(&product.name, product.quantity, None, HistoryKind::Added, now);
        self.products.push(product.clone());
        product
    }

    /// Replaces a product's fields in place, keeping its id and position.
    ///
    /// Records an `Updated` entry with the quantity before and after.
    pub fn update(
        &mut self,
        id: &str,
        draft: ProductDraft,
        rate: TaxRate,
        now: NaiveDateTime,
    ) -> CoreResult<Product> {
        let index = self.index_of(id)?;
        let previous_quantity = self.products[index].quantity;
        let product = draft.into_product(id.to_string(), rate);

        self.record(
            &product.name,
            product.quantity,
            Some(previous_quantity),
            HistoryKind::Updated,
            now,
        );
        self.products[index] = product.clone();
        Ok(product)
    }

    /// Removes a product and records a `Deleted` entry with its last quantity.
    pub fn remove(&mut self, id: &str, now: NaiveDateTime) -> CoreResult<Product> {
        let index = self.index_of(id)?;
        let product = self.products.remove(index);
        self.record(&product.name, product.quantity, None, HistoryKind::Deleted, now);
        Ok(product)
    }

    fn record(
        &mut self,
        name: &str,
        quantity: u32,
        previous_quantity: Option<u32>,
        kind: HistoryKind,
        now: NaiveDateTime,
    ) {
        self.history.push(HistoryEntry {
            id: new_id(),
            name: name.to_string(),
            quantity,
            previous_quantity,
            date: now.format(TIMESTAMP_FORMAT).to_string(),
            kind,
        });
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn draft(name: &str, cost_major: i64, quantity: u32) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            cost_price: Money::from_major(cost_major),
            quantity,
            category: "Grains".to_string(),
            brand: String::new(),
            size: String::new(),
            supplier: String::new(),
            expiry_date: None,
            reorder_level: 5,
        }
    }

    #[test]
    fn test_add_derives_values_and_records_history() {
        let mut inventory = Inventory::default();
        let rice = inventory.add(draft("Rice", 1000, 4), TaxRate::default(), now());

        assert!(!rice.id.is_empty());
        assert_eq!(rice.total_value, Money::from_major(4300));
        assert_eq!(inventory.products.len(), 1);

        let entry = &inventory.history[0];
        assert_eq!(entry.kind, HistoryKind::Added);
        assert_eq!(entry.name, "Rice");
        assert_eq!(entry.quantity, 4);
        assert_eq!(entry.date, "2024-03-01 09:30:00");
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let mut inventory = Inventory::default();
        inventory.add(draft("Beans", 500, 10), TaxRate::default(), now());
        let rice = inventory.add(draft("Rice", 1000, 4), TaxRate::default(), now());

        let updated = inventory
            .update(&rice.id, draft("Rice", 1200, 9), TaxRate::default(), now())
            .unwrap();

        assert_eq!(updated.id, rice.id);
        assert_eq!(inventory.products[1].id, rice.id);
        assert_eq!(updated.shelf_price, Money::from_major(1290));
        assert_eq!(updated.total_value, Money::from_major(11_610));

        let entry = inventory.history.last().unwrap();
        assert_eq!(entry.kind, HistoryKind::Updated);
        assert_eq!(entry.previous_quantity, Some(4));
        assert_eq!(entry.quantity, 9);
    }

    #[test]
    fn test_remove_records_last_quantity() {
        let mut inventory = Inventory::default();
        let rice = inventory.add(draft("Rice", 1000, 4), TaxRate::default(), now());

        let removed = inventory.remove(&rice.id, now()).unwrap();
        assert_eq!(removed.name, "Rice");
        assert!(inventory.products.is_empty());
        assert!(inventory.find(&rice.id).is_none());

        let entry = inventory.history.last().unwrap();
        assert_eq!(entry.kind, HistoryKind::Deleted);
        assert_eq!(entry.quantity, 4);
        assert_eq!(inventory.history.len(), 2);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut inventory = Inventory::default();
        assert!(matches!(
            inventory.remove("missing", now()),
            Err(CoreError::ProductNotFound(_))
        ));
        assert!(matches!(
            inventory.update("missing", draft("X", 1, 1), TaxRate::default(), now()),
            Err(CoreError::ProductNotFound(_))
        ));
        assert!(inventory.history.is_empty());
    }

    #[test]
    fn test_product_id_at() {
        let mut inventory = Inventory::default();
        let first = inventory.add(draft("Rice", 1000, 4), TaxRate::default(), now());
        inventory.add(draft("Beans", 500, 10), TaxRate::default(), now());

        assert_eq!(inventory.product_id_at(1).unwrap(), first.id);
        assert!(matches!(
            inventory.product_id_at(0),
            Err(CoreError::IndexOutOfRange { position: 0, len: 2 })
        ));
        assert!(matches!(
            inventory.product_id_at(3),
            Err(CoreError::IndexOutOfRange { position: 3, len: 2 })
        ));
    }

    #[test]
    fn test_ensure_ids_only_fills_blanks() {
        let mut inventory = Inventory::default();
        let kept = inventory.add(draft("Rice", 1000, 4), TaxRate::default(), now());
        inventory.products.push(
            draft("Legacy", 100, 1).into_product(String::new(), TaxRate::default()),
        );
        inventory.history[0].id.clear();

        assert_eq!(inventory.ensure_ids(), 2);
        assert_eq!(inventory.products[0].id, kept.id);
        assert!(inventory.products.iter().all(|p| !p.id.is_empty()));
        assert!(inventory.history.iter().all(|h| !h.id.is_empty()));
        assert_eq!(inventory.ensure_ids(), 0);
    }
}
