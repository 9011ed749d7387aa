//! # Dashboard Aggregator
//!
//! Summary figures over the **entire** product list, never the filtered view.
//! A full scan on every call; ledgers hold tens to low thousands of lines.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LedgerSettings, Product};

/// The dashboard summary card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    /// Number of product lines.
    pub count: usize,

    /// Units on hand across all lines.
    pub total_quantity: u64,

    /// Sum of each line's stored total value.
    #[ts(type = "number")]
    pub total_value: Money,

    /// Lines below their reorder level.
    pub low_stock_count: usize,
}

/// Aggregates the summary. Stored `total_value`s are summed as-is,
/// saturating at the largest representable amount.
pub fn summarize(products: &[Product], settings: &LedgerSettings) -> DashboardSummary {
    DashboardSummary {
        count: products.len(),
        total_quantity: products.iter().map(|p| u64::from(p.quantity)).sum(),
        total_value: products
            .iter()
            .fold(Money::zero(), |acc, p| acc.saturating_add(p.total_value)),
        low_stock_count: products
            .iter()
            .filter(|p| p.is_low_stock(settings.low_stock_threshold))
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductDraft, TaxRate};

    fn product(cost_major: i64, quantity: u32, reorder_level: u32) -> Product {
        ProductDraft {
            name: "Item".to_string(),
            cost_price: Money::from_major(cost_major),
            quantity,
            category: "Misc".to_string(),
            brand: String::new(),
            size: String::new(),
            supplier: String::new(),
            expiry_date: None,
            reorder_level,
        }
        .into_product(String::new(), TaxRate::default())
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[], &LedgerSettings::default());
        assert_eq!(summary, DashboardSummary::default());
    }

    #[test]
    fn test_summary_totals() {
        let products = vec![product(1000, 4, 5), product(200, 3, 0), product(50, 10, 2)];
        let summary = summarize(&products, &LedgerSettings::default());

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_quantity, 17);
        // 4300.00 + 3 × 215.00 + 10 × 53.75
        assert_eq!(summary.total_value, Money::from_minor(430_000 + 64_500 + 53_750));
        // 4 < 5 and 3 < 5 (fallback); 10 ≥ 2
        assert_eq!(summary.low_stock_count, 2);
    }

    #[test]
    fn test_summary_uses_stored_totals() {
        let mut stale = product(100, 1, 0);
        stale.total_value = Money::from_major(999);
        let summary = summarize(&[stale], &LedgerSettings::default());
        assert_eq!(summary.total_value, Money::from_major(999));
    }

    #[test]
    fn test_summary_total_saturates() {
        let mut big = product(100, 1, 0);
        big.total_value = Money::from_minor(i64::MAX - 10);
        let summary = summarize(&[big.clone(), big], &LedgerSettings::default());
        assert_eq!(summary.total_value, Money::from_minor(i64::MAX));
    }
}
