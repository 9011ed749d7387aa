//! `shelfbook tax <AMOUNT>`: the VAT calculator. Touches no ledger state.

use serde_json::json;

use shelfbook_core::{tax, LedgerSettings};

use super::Output;
use crate::error::ApiResult;

pub fn quote(amount: &str, settings: &LedgerSettings) -> ApiResult<Output> {
    let quote = tax::quote(amount, settings.tax_rate)?;

    Ok(Output::new(
        quote.describe(settings.tax_rate, &settings.currency_symbol),
        json!({
            "base": quote.base,
            "vatAmount": quote.vat_amount,
            "total": quote.total,
            "rate": settings.tax_rate.to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use shelfbook_core::TaxRate;

    #[test]
    fn test_quote() {
        let out = quote("2000", &LedgerSettings::default()).unwrap();
        assert_eq!(out.text, "VAT (7.5%): ₦150.00 | Total: ₦2150.00");
        assert_eq!(out.json["vatAmount"], 150);
        assert_eq!(out.json["total"], 2150);
        assert_eq!(out.json["rate"], "7.5%");
    }

    #[test]
    fn test_configured_rate() {
        let settings = LedgerSettings {
            tax_rate: TaxRate::from_bps(1000),
            currency_symbol: "$".to_string(),
            ..Default::default()
        };
        let out = quote("19.99", &settings).unwrap();
        assert_eq!(out.text, "VAT (10%): $2.00 | Total: $21.99");
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["abc", "", "-5"] {
            let err = quote(input, &LedgerSettings::default()).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput, "input {:?}", input);
        }
    }
}
