//! # Domain Types
//!
//! Core domain types used throughout Shelfbook.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  HistoryEntry   │   │ LedgerSettings  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  tax_rate       │       │
//! │  │  name, category │   │  name, quantity │   │  low_stock (5)  │       │
//! │  │  cost_price     │   │  date           │   │  page_size (10) │       │
//! │  │  vat (derived)  │   │  kind           │   │  expiry (30d)   │       │
//! │  │  shelf (derived)│   └─────────────────┘   └─────────────────┘       │
//! │  │  total (derived)│                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │  HistoryKind    │   │    TaxRate      │       │
//! │  ┌─────────────────┐   │  Added          │   │  bps (u32)      │       │
//! │  │  ProductInput   │   │  Updated        │   │  750 = 7.5%     │       │
//! │  │  (raw form)     │   │  Deleted        │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Shape
//! Product and HistoryEntry serialize in camelCase with the field names the
//! browser ledger used (`costPrice`, `shelfPrice`, `stockHistory[].type`),
//! so existing stored arrays load without conversion. Records written before
//! ids existed get one assigned at load.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::valuation;
use crate::{
    DEFAULT_CURRENCY_SYMBOL, DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD,
    DEFAULT_PAGE_SIZE, DEFAULT_TAX_RATE_BPS,
};

/// Date format for expiry dates (HTML date input format).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format for history timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 750 bps = 7.5% (Nigerian VAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The highest rate the ledger accepts (100%).
    pub const MAX: TaxRate = TaxRate(10_000);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (7.5 → 750 bps).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(DEFAULT_TAX_RATE_BPS)
    }
}

/// Renders `7.5%`, `8.25%`, `10%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        match self.0 % 100 {
            0 => write!(f, "{whole}%"),
            part if part % 10 == 0 => write!(f, "{whole}.{}%", part / 10),
            part => write!(f, "{whole}.{part:02}%"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// One inventory line item.
///
/// `vat`, `shelf_price` and `total_value` are derived from `cost_price` and
/// `quantity` whenever the product is created or updated and are never
/// edited on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stable identifier (UUID v4).
    #[serde(default)]
    pub id: String,

    /// Display name. Not unique.
    pub name: String,

    /// Unit cost before tax.
    #[ts(type = "number")]
    pub cost_price: Money,

    /// Tax on one unit (derived).
    #[ts(type = "number")]
    pub vat: Money,

    /// Customer-facing unit price, cost plus tax (derived).
    #[ts(type = "number")]
    pub shelf_price: Money,

    /// Units on hand.
    pub quantity: u32,

    /// Shelf price times quantity (derived).
    #[ts(type = "number")]
    pub total_value: Money,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub size: String,

    #[serde(default)]
    pub supplier: String,

    /// Absent when unset. Stored blank strings read as absent.
    #[serde(
        default,
        deserialize_with = "deserialize_blank_date",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    /// Per-product low-stock level. Zero falls back to the global threshold.
    #[serde(default)]
    pub reorder_level: u32,
}

impl Product {
    /// Recomputes the derived figures from cost and quantity.
    pub fn revalue(&mut self, rate: TaxRate) {
        let derived = valuation::derive(self.cost_price, self.quantity, rate);
        self.vat = derived.vat;
        self.shelf_price = derived.shelf_price;
        self.total_value = derived.total_value;
    }

    /// The level below which this product counts as low stock.
    #[inline]
    pub fn effective_reorder_level(&self, global_threshold: u32) -> u32 {
        if self.reorder_level == 0 {
            global_threshold
        } else {
            self.reorder_level
        }
    }

    /// `quantity < (reorder_level || global_threshold)`.
    #[inline]
    pub fn is_low_stock(&self, global_threshold: u32) -> bool {
        self.quantity < self.effective_reorder_level(global_threshold)
    }

    /// True when an expiry date is set and falls before `today + window_days`.
    ///
    /// Already-expired products count as expiring soon. A window reaching
    /// past the last representable date covers every expiry.
    pub fn is_expiring_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        let Some(expiry) = self.expiry_date else {
            return false;
        };
        let days = Days::new(window_days.unsigned_abs());
        let cutoff = if window_days >= 0 {
            today.checked_add_days(days)
        } else {
            today.checked_sub_days(days)
        };
        match cutoff {
            Some(cutoff) => expiry < cutoff,
            None => window_days > 0,
        }
    }
}

fn deserialize_blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// History
// =============================================================================

/// The stock-affecting event a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum HistoryKind {
    Added,
    Updated,
    Deleted,
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HistoryKind::Added => "Added",
            HistoryKind::Updated => "Updated",
            HistoryKind::Deleted => "Deleted",
        };
        f.write_str(label)
    }
}

/// Append-only audit record. References a product by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Quantity after the event (before it, for deletions).
    pub quantity: u32,

    /// Quantity before an update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_quantity: Option<u32>,

    /// Local timestamp. Older entries keep whatever text they were written with.
    pub date: String,

    #[serde(rename = "type")]
    pub kind: HistoryKind,
}

// =============================================================================
// Product Form
// =============================================================================

/// Raw product form fields, exactly as typed.
///
/// Nothing here is trusted: numeric fields stay text until
/// [`ProductInput::validate`](crate::validation) turns the form into a
/// [`ProductDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub cost_price: String,
    pub quantity: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub reorder_level: String,
}

impl ProductInput {
    /// Re-seeds the form from a stored product (the "edit" entry point).
    pub fn from_product(product: &Product) -> Self {
        ProductInput {
            name: product.name.clone(),
            cost_price: product.cost_price.to_plain_string(),
            quantity: product.quantity.to_string(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            size: product.size.clone(),
            expiry_date: product
                .expiry_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            supplier: product.supplier.clone(),
            reorder_level: product.reorder_level.to_string(),
        }
    }
}

/// A validated product form. Produced only by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub cost_price: Money,
    pub quantity: u32,
    pub category: String,
    pub brand: String,
    pub size: String,
    pub supplier: String,
    pub expiry_date: Option<NaiveDate>,
    pub reorder_level: u32,
}

impl ProductDraft {
    /// Builds a product with freshly derived values.
    pub fn into_product(self, id: String, rate: TaxRate) -> Product {
        let mut product = Product {
            id,
            name: self.name,
            cost_price: self.cost_price,
            vat: Money::zero(),
            shelf_price: Money::zero(),
            quantity: self.quantity,
            total_value: Money::zero(),
            category: self.category,
            brand: self.brand,
            size: self.size,
            supplier: self.supplier,
            expiry_date: self.expiry_date,
            reorder_level: self.reorder_level,
        };
        product.revalue(rate);
        product
    }
}

// =============================================================================
// Configuration Types
// =============================================================================

/// Process-wide ledger constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSettings {
    /// VAT applied to every cost price.
    pub tax_rate: TaxRate,

    /// Low-stock level for products without their own reorder level.
    pub low_stock_threshold: u32,

    /// Rows per view page.
    pub page_size: usize,

    /// Products expiring within this many days are flagged.
    pub expiry_window_days: i64,

    /// Prefix for formatted amounts.
    pub currency_symbol: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            tax_rate: TaxRate::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(quantity: u32, reorder_level: u32) -> Product {
        ProductDraft {
            name: "Rice".to_string(),
            cost_price: Money::from_major(1000),
            quantity,
            category: "Grains".to_string(),
            brand: String::new(),
            size: String::new(),
            supplier: String::new(),
            expiry_date: None,
            reorder_level,
        }
        .into_product("p-1".to_string(), TaxRate::default())
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(750).to_string(), "7.5%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::from_bps(1000).to_string(), "10%");
        assert_eq!(TaxRate::from_percentage(7.5).bps(), 750);
        assert_eq!(TaxRate::default().bps(), 750);
    }

    #[test]
    fn test_low_stock_falls_back_to_global_threshold() {
        assert!(sample(3, 0).is_low_stock(5));
        assert!(!sample(3, 2).is_low_stock(5));
        assert!(!sample(5, 0).is_low_stock(5));
        assert!(sample(9, 10).is_low_stock(5));
    }

    #[test]
    fn test_expiring_soon_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut product = sample(10, 0);
        assert!(!product.is_expiring_soon(today, 30));

        product.expiry_date = NaiveDate::from_ymd_opt(2024, 3, 30);
        assert!(product.is_expiring_soon(today, 30));

        product.expiry_date = NaiveDate::from_ymd_opt(2024, 3, 31);
        assert!(!product.is_expiring_soon(today, 30));

        product.expiry_date = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(product.is_expiring_soon(today, 30));
    }

    #[test]
    fn test_expiring_soon_extreme_windows() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut product = sample(10, 0);
        product.expiry_date = NaiveDate::from_ymd_opt(2030, 1, 1);

        assert!(product.is_expiring_soon(today, i64::MAX));
        assert!(product.is_expiring_soon(today, 10_000_000_000_000));
        assert!(!product.is_expiring_soon(today, i64::MIN));
        assert!(!product.is_expiring_soon(today, -1));
    }

    #[test]
    fn test_product_stored_shape() {
        let product = sample(4, 5);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["costPrice"], 1000);
        assert_eq!(json["vat"], 75);
        assert_eq!(json["shelfPrice"], 1075);
        assert_eq!(json["totalValue"], 4300);
        assert_eq!(json["reorderLevel"], 5);
        assert!(json.get("expiryDate").is_none());
    }

    #[test]
    fn test_reads_browser_era_record() {
        let legacy = r#"{
            "name": "Beans", "costPrice": 10.5, "vat": 0.79, "shelfPrice": 11.29,
            "quantity": 2, "totalValue": 22.58, "category": "Grains",
            "brand": "", "size": "", "expiryDate": "", "supplier": "",
            "reorderLevel": 0
        }"#;
        let product: Product = serde_json::from_str(legacy).unwrap();
        assert!(product.id.is_empty());
        assert_eq!(product.cost_price.minor(), 1050);
        assert_eq!(product.total_value.minor(), 2258);
        assert_eq!(product.expiry_date, None);
    }

    #[test]
    fn test_rejects_nan_tainted_record() {
        // JSON.stringify(NaN) writes null
        let legacy = r#"{"name": "Bad", "costPrice": null, "vat": null, "shelfPrice": null,
                         "quantity": null, "totalValue": null, "category": "X"}"#;
        assert!(serde_json::from_str::<Product>(legacy).is_err());
    }

    #[test]
    fn test_history_kind_serializes_as_type() {
        let entry = HistoryEntry {
            id: "h-1".to_string(),
            name: "Rice".to_string(),
            quantity: 4,
            previous_quantity: None,
            date: "2024-03-01 10:00:00".to_string(),
            kind: HistoryKind::Added,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "Added");
        assert!(json.get("previousQuantity").is_none());
    }

    #[test]
    fn test_input_reseeds_from_product() {
        let mut product = sample(4, 5);
        product.expiry_date = NaiveDate::from_ymd_opt(2025, 1, 31);
        let input = ProductInput::from_product(&product);
        assert_eq!(input.cost_price, "1000");
        assert_eq!(input.quantity, "4");
        assert_eq!(input.expiry_date, "2025-01-31");
        assert_eq!(input.reorder_level, "5");
    }
}
