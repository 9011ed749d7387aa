//! # Validation Module
//!
//! Input validation for product forms and queries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command surface (clap)                                       │
//! │  └── Argument presence and shape                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Numeric parsing (no NaN can get past here)                        │
//! │  ├── Non-negative money and quantities                                 │
//! │  └── Dates, lengths                                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Valuation                                                    │
//! │  └── Only ever sees a ProductDraft                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shelfbook_core::types::ProductInput;
//!
//! let input = ProductInput {
//!     name: "Rice".into(),
//!     cost_price: "1000".into(),
//!     quantity: "4".into(),
//!     ..Default::default()
//! };
//! let draft = input.validate().unwrap();
//! assert_eq!(draft.quantity, 4);
//!
//! let bad = ProductInput { cost_price: "ten".into(), ..input };
//! assert!(bad.validate().is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{Money, ParseMoneyError};
use crate::types::{ProductDraft, ProductInput, TaxRate, DATE_FORMAT};
use crate::valuation;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_FIELD_LEN: usize = 100;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// Form Validation
// =============================================================================

impl ProductInput {
    /// Validates every field and returns a draft ready for valuation.
    ///
    /// Fields are checked in form order and the first failure is returned.
    pub fn validate(&self) -> ValidationResult<ProductDraft> {
        let name = validate_product_name(&self.name)?;
        let cost_price = parse_cost_price(&self.cost_price)?;
        let quantity = parse_count("quantity", &self.quantity)?;
        check_line_value(cost_price, quantity)?;

        Ok(ProductDraft {
            name,
            cost_price,
            quantity,
            category: validate_text_field("category", &self.category)?,
            brand: validate_text_field("brand", &self.brand)?,
            size: validate_text_field("size", &self.size)?,
            supplier: validate_text_field("supplier", &self.supplier)?,
            expiry_date: parse_expiry_date(&self.expiry_date)?,
            reorder_level: parse_reorder_level(&self.reorder_level)?,
        })
    }
}

/// Rejects a cost and quantity whose total value cannot be represented at
/// the highest accepted tax rate.
///
/// ```rust
/// use shelfbook_core::money::Money;
/// use shelfbook_core::validation::check_line_value;
///
/// assert!(check_line_value(Money::from_major(1000), 4).is_ok());
/// assert!(check_line_value(Money::from_major(100_000_000_000), 1_000_000).is_err());
/// ```
pub fn check_line_value(cost_price: Money, quantity: u32) -> ValidationResult<()> {
    if valuation::checked_derive(cost_price, quantity, TaxRate::MAX).is_some() {
        return Ok(());
    }

    // At 100% the shelf price is exactly twice the cost
    match cost_price.checked_add(cost_price) {
        None => Err(ValidationError::OutOfRange {
            field: "cost price".to_string(),
            min: 0,
            max: i64::MAX / 2 / 100,
        }),
        Some(shelf_ceiling) => Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX / shelf_ceiling.minor().max(1),
        }),
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional free-text field (category, brand, ...).
pub fn validate_text_field(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a search query and returns it trimmed. Empty matches everything.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a cost price: required, decimal, not negative.
///
/// ```rust
/// use shelfbook_core::validation::parse_cost_price;
///
/// assert_eq!(parse_cost_price("10.50").unwrap().minor(), 1050);
/// assert!(parse_cost_price("").is_err());
/// assert!(parse_cost_price("-1").is_err());
/// ```
pub fn parse_cost_price(raw: &str) -> ValidationResult<Money> {
    parse_non_negative_money("cost price", raw)
}

/// Parses any required non-negative amount.
pub fn parse_non_negative_money(field: &str, raw: &str) -> ValidationResult<Money> {
    let amount = Money::parse(raw).map_err(|e| match e {
        ParseMoneyError::Empty => ValidationError::Required {
            field: field.to_string(),
        },
        ParseMoneyError::NotANumber(value) => ValidationError::NotANumber {
            field: field.to_string(),
            value,
        },
        ParseMoneyError::TooLarge(_) => ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX / 100,
        },
    })?;

    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(amount)
}

/// Parses a required whole-number count (quantity).
///
/// ## Rules
/// - Required
/// - Whole number, no decimals
/// - Not negative, at most `u32::MAX`
pub fn parse_count(field: &str, raw: &str) -> ValidationResult<u32> {
    let text = raw.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value: i64 = text.parse().map_err(|_| ValidationError::NotANumber {
        field: field.to_string(),
        value: text.to_string(),
    })?;

    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

/// Parses an optional reorder level. Blank means 0 (use the global threshold).
pub fn parse_reorder_level(raw: &str) -> ValidationResult<u32> {
    if raw.trim().is_empty() {
        return Ok(0);
    }
    parse_count("reorder level", raw)
}

/// Parses an optional `YYYY-MM-DD` expiry date. Blank means no date.
pub fn parse_expiry_date(raw: &str) -> ValidationResult<Option<NaiveDate>> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidFormat {
            field: "expiry date".to_string(),
            reason: format!("'{}' is not a YYYY-MM-DD date", text),
        })
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> ProductInput {
        ProductInput {
            name: "  Rice ".to_string(),
            cost_price: "1000".to_string(),
            quantity: "4".to_string(),
            category: "Grains".to_string(),
            reorder_level: "5".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let draft = rice().validate().unwrap();
        assert_eq!(draft.name, "Rice");
        assert_eq!(draft.cost_price, Money::from_major(1000));
        assert_eq!(draft.quantity, 4);
        assert_eq!(draft.reorder_level, 5);
        assert_eq!(draft.expiry_date, None);
    }

    #[test]
    fn test_missing_numbers_are_rejected() {
        let form = ProductInput {
            cost_price: String::new(),
            ..rice()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::Required {
                field: "cost price".to_string()
            })
        );

        let form = ProductInput {
            quantity: "lots".to_string(),
            ..rice()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_unrepresentable_total_value_rejected() {
        let form = ProductInput {
            cost_price: "100000000000".to_string(),
            quantity: "1000000".to_string(),
            ..rice()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "quantity"
        ));

        let form = ProductInput {
            cost_price: "50000000000000000".to_string(),
            quantity: "0".to_string(),
            ..rice()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "cost price"
        ));

        // The largest quantity reported as allowed does fit
        let cost = Money::from_major(100_000_000_000);
        let Err(ValidationError::OutOfRange { max, .. }) = check_line_value(cost, 1_000_000) else {
            panic!("expected an out-of-range quantity");
        };
        assert!(check_line_value(cost, max as u32).is_ok());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("quantity", "0"), Ok(0));
        assert_eq!(parse_count("quantity", " 12 "), Ok(12));
        assert!(matches!(
            parse_count("quantity", "-1"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            parse_count("quantity", "4.5"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_count("quantity", "99999999999"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert_eq!(
            parse_cost_price("-5"),
            Err(ValidationError::Negative {
                field: "cost price".to_string()
            })
        );
        assert_eq!(parse_cost_price("0"), Ok(Money::zero()));
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(parse_reorder_level(""), Ok(0));
        assert_eq!(parse_expiry_date(""), Ok(None));
        assert_eq!(
            parse_expiry_date("2025-06-30"),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 30))
        );
        assert!(parse_expiry_date("30/06/2025").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  rice "), Ok("rice".to_string()));
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(750).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
