//! # Valuation Engine
//!
//! Derives tax, shelf price and extended value from a cost price.
//!
//! ## Derivation Chain
//! ```text
//! cost_price ──► vat = round2(cost_price × tax_rate)
//!      │               │
//!      └───────┬───────┘
//!              ▼
//!        shelf_price = cost_price + vat
//!              │
//!              ▼
//!        total_value = shelf_price × quantity
//! ```
//!
//! Each step works on already-rounded values: `total_value` is computed from
//! the rounded `shelf_price`, never from the unrounded product of cost and
//! rate. Money is held in minor units, so only the tax step can round.
//!
//! Validated drafts always fit: [`crate::validation::check_line_value`]
//! rejects any cost and quantity that would overflow at the highest rate.
//! [`derive`] saturates for anything else, [`checked_derive`] reports it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// The derived figures of one product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Valuation {
    #[ts(type = "number")]
    pub vat: Money,
    #[ts(type = "number")]
    pub shelf_price: Money,
    #[ts(type = "number")]
    pub total_value: Money,
}

/// Derives `{vat, shelf_price, total_value}` for a cost and quantity.
///
/// ```rust
/// use shelfbook_core::money::Money;
/// use shelfbook_core::types::TaxRate;
/// use shelfbook_core::valuation::derive;
///
/// let v = derive(Money::from_major(1000), 4, TaxRate::from_bps(750));
/// assert_eq!(v.vat.to_string(), "75.00");
/// assert_eq!(v.shelf_price.to_string(), "1075.00");
/// assert_eq!(v.total_value.to_string(), "4300.00");
/// ```
pub fn derive(cost_price: Money, quantity: u32, rate: TaxRate) -> Valuation {
    let vat = cost_price.calculate_tax(rate);
    let shelf_price = cost_price.saturating_add(vat);
    Valuation {
        vat,
        shelf_price,
        total_value: shelf_price.multiply_quantity(quantity),
    }
}

/// Like [`derive`], but `None` when any figure leaves the money range.
pub fn checked_derive(cost_price: Money, quantity: u32, rate: TaxRate) -> Option<Valuation> {
    let vat = cost_price.calculate_tax(rate);
    let shelf_price = cost_price.checked_add(vat)?;
    Some(Valuation {
        vat,
        shelf_price,
        total_value: shelf_price.checked_multiply_quantity(quantity)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VAT: TaxRate = TaxRate::from_bps(750);

    #[test]
    fn test_rice_scenario() {
        let v = derive(Money::from_major(1000), 4, VAT);
        assert_eq!(v.vat, Money::from_major(75));
        assert_eq!(v.shelf_price, Money::from_major(1075));
        assert_eq!(v.total_value, Money::from_major(4300));
    }

    #[test]
    fn test_total_uses_rounded_shelf_price() {
        // 10.50 × 7.5% = 0.7875 → 0.79; shelf 11.29; × 3 = 33.87
        // (unrounded: 11.2875 × 3 = 33.8625 → 33.86)
        let v = derive(Money::from_minor(1050), 3, VAT);
        assert_eq!(v.vat.minor(), 79);
        assert_eq!(v.shelf_price.minor(), 1129);
        assert_eq!(v.total_value.minor(), 3387);
    }

    #[test]
    fn test_zero_quantity_and_zero_cost() {
        let v = derive(Money::from_major(50), 0, VAT);
        assert_eq!(v.total_value, Money::zero());

        let v = derive(Money::zero(), 12, VAT);
        assert_eq!(v, Valuation {
            vat: Money::zero(),
            shelf_price: Money::zero(),
            total_value: Money::zero(),
        });
    }

    #[test]
    fn test_overflowing_line_is_reported() {
        let cost = Money::from_major(100_000_000_000);
        assert_eq!(checked_derive(cost, 1_000_000, VAT), None);
        assert_eq!(checked_derive(Money::from_minor(i64::MAX), 0, TaxRate::MAX), None);

        let v = derive(cost, 1_000_000, VAT);
        assert_eq!(v.total_value.minor(), i64::MAX);
        assert_eq!(checked_derive(Money::from_major(1000), 4, VAT), Some(derive(Money::from_major(1000), 4, VAT)));
    }

    proptest! {
        #[test]
        fn prop_derivation_matches_stepwise_rounding(
            cost in 0i64..10_000_000_000,
            quantity in 0u32..100_000,
        ) {
            let v = derive(Money::from_minor(cost), quantity, VAT);

            // round2(cost × 0.075), half away from zero, in minor units
            let expected_vat = (cost as i128 * 750 + 5000) / 10000;
            prop_assert_eq!(v.vat.minor() as i128, expected_vat);
            prop_assert_eq!(v.shelf_price.minor(), cost + v.vat.minor());
            prop_assert_eq!(v.total_value.minor(), v.shelf_price.minor() * quantity as i64);

            prop_assert!(!v.vat.is_negative());
            prop_assert!(!v.shelf_price.is_negative());
            prop_assert!(!v.total_value.is_negative());
        }
    }
}
