//! # Tax Calculator
//!
//! Standalone VAT quote for an arbitrary base amount. Never touches the
//! ledger: a bad input is reported to the caller and nothing else happens.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, ParseMoneyError};
use crate::types::TaxRate;

/// Result of a tax quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxQuote {
    #[ts(type = "number")]
    pub base: Money,
    #[ts(type = "number")]
    pub vat_amount: Money,
    #[ts(type = "number")]
    pub total: Money,
}

impl TaxQuote {
    /// The calculator's result line: `VAT (7.5%): ₦150.00 | Total: ₦2150.00`.
    pub fn describe(&self, rate: TaxRate, symbol: &str) -> String {
        format!(
            "VAT ({rate}): {} | Total: {}",
            self.vat_amount.format_with_symbol(symbol),
            self.total.format_with_symbol(symbol)
        )
    }
}

/// Quotes VAT on a base amount typed by the user.
///
/// ```rust
/// use shelfbook_core::tax::quote;
/// use shelfbook_core::types::TaxRate;
///
/// let q = quote("2000", TaxRate::from_bps(750)).unwrap();
/// assert_eq!(q.vat_amount.to_string(), "150.00");
/// assert_eq!(q.total.to_string(), "2150.00");
/// assert!(quote("abc", TaxRate::from_bps(750)).is_err());
/// ```
pub fn quote(input: &str, rate: TaxRate) -> CoreResult<TaxQuote> {
    let base = Money::parse(input).map_err(|e| match e {
        ParseMoneyError::Empty => CoreError::invalid_input("base amount", "enter an amount"),
        other => CoreError::invalid_input("base amount", other.to_string()),
    })?;

    if base.is_negative() {
        return Err(CoreError::invalid_input(
            "base amount",
            "amount must not be negative",
        ));
    }

    quote_amount(base, rate)
}

/// Quotes VAT on an already-parsed amount.
///
/// Fails with `InvalidInput` when the total cannot be represented.
pub fn quote_amount(base: Money, rate: TaxRate) -> CoreResult<TaxQuote> {
    let vat_amount = base.calculate_tax(rate);
    let total = base
        .checked_add(vat_amount)
        .ok_or_else(|| CoreError::invalid_input("base amount", "amount is too large"))?;

    Ok(TaxQuote {
        base,
        vat_amount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAT: TaxRate = TaxRate::from_bps(750);

    #[test]
    fn test_quote_whole_amount() {
        let q = quote("2000", VAT).unwrap();
        assert_eq!(q.base, Money::from_major(2000));
        assert_eq!(q.vat_amount, Money::from_major(150));
        assert_eq!(q.total, Money::from_major(2150));
    }

    #[test]
    fn test_quote_rounds_vat() {
        // 19.99 × 7.5% = 1.49925 → 1.50
        let q = quote("19.99", VAT).unwrap();
        assert_eq!(q.vat_amount.minor(), 150);
        assert_eq!(q.total.minor(), 2149);
    }

    #[test]
    fn test_quote_rejects_bad_input() {
        for input in ["abc", "", "   ", "-5", "NaN"] {
            assert!(
                matches!(quote(input, VAT), Err(CoreError::InvalidInput { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_quote_rejects_unrepresentable_total() {
        let err = quote("90000000000000000", VAT).unwrap_err();
        assert_eq!(err.to_string(), "Invalid base amount: amount is too large");

        let q = quote("1000000000000", VAT).unwrap();
        assert_eq!(q.total, Money::from_major(1_075_000_000_000));
    }

    #[test]
    fn test_describe() {
        let q = quote("2000", VAT).unwrap();
        assert_eq!(
            q.describe(VAT, "₦"),
            "VAT (7.5%): ₦150.00 | Total: ₦2150.00"
        );
    }
}
