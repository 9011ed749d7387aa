//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, VAT at 7.5% on 0.1 + 0.2:                                │
//! │    (0.1 + 0.2) * 0.075 = 0.022500000000000003                          │
//! │                                                                         │
//! │  Valuation rounds at EVERY step (vat, then shelf price, then total),   │
//! │  so drift in one step leaks into the next.                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (kobo / cents)                      │
//! │    Every value is already "rounded to 2 decimal places" by type.       │
//! │    Only tax multiplication rounds, and it does so explicitly.          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Format
//! On the storage boundary Money is a JSON decimal number in major units
//! (`1075.5`), which is what the browser-era ledger wrote. Internally it is
//! always an `i64` of minor units.
//!
//! ## Usage
//! ```rust
//! use shelfbook_core::money::Money;
//!
//! let cost = Money::parse("1000").unwrap();
//! assert_eq!(cost.minor(), 100_000);
//!
//! let total = cost.multiply_quantity(4);
//! assert_eq!(total.to_string(), "4000.00");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use thiserror::Error;

use crate::types::TaxRate;

/// Minor units per major unit (two decimal places).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Parse Error
// =============================================================================

/// Why a decimal string could not be read as Money.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is too large")]
    TooLarge(String),
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (kobo for NGN).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Decimal serde**: stored records stay readable by the browser UI
///
/// ## Where Money is Used
/// ```text
/// Product.cost_price ──► valuation::derive ──► vat, shelf_price, total_value
///                                                          │
///                                   dashboard::summarize ◄─┘ (sum of totals)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (kobo/cents).
    ///
    /// ```rust
    /// use shelfbook_core::money::Money;
    ///
    /// let price = Money::from_minor(107_500); // 1075.00
    /// assert_eq!(price.major(), 1075);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Parses a decimal amount such as `"1000"`, `"10.5"` or `".75"`.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored, a leading `+` or `-` is allowed
    /// - Digits only, at most one decimal point, no thousands separators
    /// - More than two fractional digits round half away from zero
    ///
    /// ```rust
    /// use shelfbook_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.5").unwrap().minor(), 1050);
    /// assert_eq!(Money::parse("0.125").unwrap().minor(), 13);
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseMoneyError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let not_a_number = || ParseMoneyError::NotANumber(text.to_string());
        let too_large = || ParseMoneyError::TooLarge(text.to_string());

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(not_a_number());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_a_number());
        }

        let mut minor: i64 = 0;
        for digit in whole.bytes() {
            minor = minor
                .checked_mul(10)
                .and_then(|m| m.checked_add(i64::from(digit - b'0')))
                .ok_or_else(too_large)?;
        }
        minor = minor.checked_mul(MINOR_PER_MAJOR).ok_or_else(too_large)?;

        let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        minor = minor
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -minor } else { minor }))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at `rate`, rounding half away from zero to the minor unit.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(|amount| * bps + 5000) / 10000`,
    /// with the sign restored afterwards so negative amounts mirror
    /// positive ones.
    ///
    /// ```rust
    /// use shelfbook_core::money::Money;
    /// use shelfbook_core::types::TaxRate;
    ///
    /// let cost = Money::from_major(1000);
    /// let vat = cost.calculate_tax(TaxRate::from_bps(750));
    /// assert_eq!(vat, Money::from_major(75));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps `amount * bps` from overflowing on large ledgers
        let magnitude = (self.0 as i128).abs();
        let tax = (magnitude * rate.bps() as i128 + 5000) / 10000;
        let tax = if self.0 < 0 { -tax } else { tax };
        Money(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by an on-hand quantity, saturating at the bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Multiplies money by an on-hand quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: u32) -> Option<Self> {
        match self.0.checked_mul(qty as i64) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Adds two amounts, saturating at the bounds.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Shortest decimal rendering, the way a JavaScript number prints.
    ///
    /// Used by the CSV export, whose numeric columns are unformatted.
    ///
    /// ```rust
    /// use shelfbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(107_500).to_plain_string(), "1075");
    /// assert_eq!(Money::from_minor(1050).to_plain_string(), "10.5");
    /// assert_eq!(Money::from_minor(75).to_plain_string(), "0.75");
    /// ```
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.major().abs();
        match self.minor_part() {
            0 => format!("{sign}{whole}"),
            part if part % 10 == 0 => format!("{sign}{whole}.{}", part / 10),
            part => format!("{sign}{whole}.{part:02}"),
        }
    }

    /// Two-decimal rendering prefixed with a currency symbol (`₦1075.00`).
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{symbol}{}.{:02}", self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering without a currency symbol (`1075.00`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Saturates at the bounds instead of wrapping.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc.saturating_add(m))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Serializes as a decimal number of major units (`1075.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.minor_part() == 0 {
            serializer.serialize_i64(self.major())
        } else {
            serializer.serialize_f64(self.0 as f64 / MINOR_PER_MAJOR as f64)
        }
    }
}

/// Accepts any finite JSON number of major units, rounded to the minor unit.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl de::Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a finite decimal amount")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(MINOR_PER_MAJOR)
                    .map(Money)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .map_err(|_| E::custom("amount out of range"))
                    .and_then(|v| self.visit_i64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                if !v.is_finite() {
                    return Err(E::custom("amount is not finite"));
                }
                let minor = (v * MINOR_PER_MAJOR as f64).round();
                if minor.abs() > i64::MAX as f64 {
                    return Err(E::custom("amount out of range"));
                }
                Ok(Money(minor as i64))
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}
