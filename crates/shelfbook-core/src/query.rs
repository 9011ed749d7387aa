//! # Query / View Engine
//!
//! Filters, sorts and paginates the product list for display.
//!
//! ## Pipeline
//! ```text
//! products (store order)
//!      │
//!      ▼  filter: term ⊂ name OR term ⊂ category (case-insensitive)
//!      │          + optional exact category (category selector)
//!      ▼  sort:   by name, case-folded, stable
//!      │
//!      ▼  page:   [(page-1)·size, page·size)   out of range → empty
//!      │
//!      ▼  classify each row: LowStock > ExpiringSoon > None
//! Page<ProductRow>
//! ```
//!
//! The engine never mutates and never hands out positions: rows carry the
//! product id, which stays valid however the view is sorted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::types::{LedgerSettings, Product};

// =============================================================================
// Query Types
// =============================================================================

/// What the user asked to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    /// Free-text term matched against name and category. Empty matches all.
    pub filter: String,

    /// Exact category (case-insensitive), from the category selector.
    pub category: Option<String>,

    /// 1-indexed page number.
    pub page: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        ViewQuery {
            filter: String::new(),
            category: None,
            page: 1,
        }
    }
}

impl ViewQuery {
    /// A first-page query for a search term.
    pub fn search(filter: impl Into<String>) -> Self {
        ViewQuery {
            filter: filter.into(),
            ..Default::default()
        }
    }

    /// Same query, different page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// Display hint for a row. Low stock wins over expiring soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum StockAlert {
    None,
    LowStock,
    ExpiringSoon,
}

/// One visible table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductRow {
    pub product: Product,
    pub low_stock: bool,
    pub expiring_soon: bool,
    pub alert: StockAlert,
}

/// One page of results plus the numbers a pager needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_matching: usize,
    pub total_pages: usize,
}

// =============================================================================
// Query Functions
// =============================================================================

/// Runs a view query over the full product list.
///
/// `today` is passed in so the engine stays pure; callers use the local date.
pub fn query(
    products: &[Product],
    view: &ViewQuery,
    settings: &LedgerSettings,
    today: NaiveDate,
) -> Page<ProductRow> {
    let page_size = settings.page_size.max(1);
    let term = view.filter.trim().to_lowercase();
    let category = view
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<&Product> = products
        .iter()
        .filter(|p| matches_term(p, &term))
        .filter(|p| match &category {
            Some(category) => p.category.to_lowercase() == *category,
            None => true,
        })
        .collect();

    // sort_by is stable: equal names keep store order
    matching.sort_by(|a, b| compare_names(&a.name, &b.name));

    let total_matching = matching.len();
    let total_pages = total_matching.div_ceil(page_size);

    let items = if view.page == 0 {
        Vec::new()
    } else {
        matching
            .into_iter()
            .skip((view.page - 1).saturating_mul(page_size))
            .take(page_size)
            .map(|p| classify(p, settings, today))
            .collect()
    };

    Page {
        items,
        page: view.page,
        page_size,
        total_matching,
        total_pages,
    }
}

/// Case-insensitive substring match on name or category.
pub fn matches_term(product: &Product, lowered_term: &str) -> bool {
    lowered_term.is_empty()
        || product.name.to_lowercase().contains(lowered_term)
        || product.category.to_lowercase().contains(lowered_term)
}

/// Locale-style name ordering: case-folded first, raw text as tie-break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Computes the display flags for one product.
pub fn classify(product: &Product, settings: &LedgerSettings, today: NaiveDate) -> ProductRow {
    let low_stock = product.is_low_stock(settings.low_stock_threshold);
    let expiring_soon = product.is_expiring_soon(today, settings.expiry_window_days);
    let alert = if low_stock {
        StockAlert::LowStock
    } else if expiring_soon {
        StockAlert::ExpiringSoon
    } else {
        StockAlert::None
    };

    ProductRow {
        product: product.clone(),
        low_stock,
        expiring_soon,
        alert,
    }
}

/// Distinct non-empty categories, sorted like names.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut all: Vec<String> = products
        .iter()
        .map(|p| p.category.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    all.sort_by(|a, b| compare_names(a, b));
    all.dedup();
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ProductDraft, TaxRate};

    fn product(name: &str, category: &str, quantity: u32) -> Product {
        ProductDraft {
            name: name.to_string(),
            cost_price: Money::from_major(100),
            quantity,
            category: category.to_string(),
            brand: String::new(),
            size: String::new(),
            supplier: String::new(),
            expiry_date: None,
            reorder_level: 0,
        }
        .into_product(format!("id-{name}"), TaxRate::default())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn shelf() -> Vec<Product> {
        vec![
            product("rice", "Grains", 40),
            product("Beans", "Grains", 12),
            product("Milk", "Dairy", 3),
            product("apple juice", "Drinks", 20),
            product("Garri", "Grains", 8),
        ]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let products = shelf();
        let page = query(&products, &ViewQuery::default(), &LedgerSettings::default(), today());
        assert_eq!(page.total_matching, products.len());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_sorted_by_name_case_insensitive() {
        let products = shelf();
        let page = query(&products, &ViewQuery::default(), &LedgerSettings::default(), today());
        let names: Vec<&str> = page.items.iter().map(|r| r.product.name.as_str()).collect();
        assert_eq!(names, ["apple juice", "Beans", "Garri", "Milk", "rice"]);
    }

    #[test]
    fn test_filter_matches_name_or_category() {
        let products = shelf();
        let settings = LedgerSettings::default();

        let page = query(&products, &ViewQuery::search("GRAIN"), &settings, today());
        assert_eq!(page.total_matching, 3);

        let page = query(&products, &ViewQuery::search("juice"), &settings, today());
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.items[0].product.name, "apple juice");
    }

    #[test]
    fn test_exact_category_filter() {
        let products = shelf();
        let view = ViewQuery {
            category: Some("dairy".to_string()),
            ..Default::default()
        };
        let page = query(&products, &view, &LedgerSettings::default(), today());
        assert_eq!(page.total_matching, 1);
        assert!(page.items.iter().all(|r| r.product.category == "Dairy"));
    }

    #[test]
    fn test_pagination_bounds() {
        let products: Vec<Product> = (0..23)
            .map(|i| product(&format!("item {i:02}"), "Misc", 50))
            .collect();
        let settings = LedgerSettings::default();

        let first = query(&products, &ViewQuery::default(), &settings, today());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 10);

        let last = query(&products, &ViewQuery::default().with_page(3), &settings, today());
        assert_eq!(last.items.len(), 3);
        assert_eq!(last.items[0].product.name, "item 20");

        let beyond = query(&products, &ViewQuery::default().with_page(4), &settings, today());
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_matching, 23);

        let zero = query(&products, &ViewQuery::default().with_page(0), &settings, today());
        assert!(zero.items.is_empty());
    }

    #[test]
    fn test_empty_ledger_has_no_pages() {
        let page = query(&[], &ViewQuery::default(), &LedgerSettings::default(), today());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_low_stock_takes_precedence() {
        let mut milk = product("Milk", "Dairy", 3);
        milk.expiry_date = NaiveDate::from_ymd_opt(2024, 3, 5);
        let mut yoghurt = product("Yoghurt", "Dairy", 30);
        yoghurt.expiry_date = NaiveDate::from_ymd_opt(2024, 3, 5);

        let settings = LedgerSettings::default();
        let row = classify(&milk, &settings, today());
        assert!(row.low_stock && row.expiring_soon);
        assert_eq!(row.alert, StockAlert::LowStock);

        let row = classify(&yoghurt, &settings, today());
        assert_eq!(row.alert, StockAlert::ExpiringSoon);

        let row = classify(&product("Rice", "Grains", 40), &settings, today());
        assert_eq!(row.alert, StockAlert::None);
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        assert_eq!(categories(&shelf()), ["Dairy", "Drinks", "Grains"]);
    }
}
