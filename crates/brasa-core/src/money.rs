//! # Numeric Foundation
//!
//! Shared decimal arithmetic for quantities, lengths, percentages and money.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A proposal ladder is a chain of percentage multiplications:            │
//! │    1000 → +25% BDI → +15% margem → R$ 1437.50 exactly                  │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    Quantities can be fractional (9.25 m of conduit), prices carry       │
//! │    centavos, and every step of the ladder stays exact.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brasa_core::money::{percent_of, round_up};
//! use rust_decimal::Decimal;
//!
//! let custo = Decimal::from(1000);
//! let bdi = percent_of(custo, Decimal::from(25));
//! assert_eq!(bdi, Decimal::from(250));
//!
//! let qty: Decimal = "10.175".parse().unwrap();
//! assert_eq!(round_up(qty), Decimal::from(11));
//! ```

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};

// =============================================================================
// Percentage Arithmetic
// =============================================================================

/// Applies a percentage to a base amount: `base * (pct / 100)`.
///
/// ## Example
/// ```rust
/// use brasa_core::money::percent_of;
/// use rust_decimal::Decimal;
///
/// let margem = percent_of(Decimal::from(1250), Decimal::from(15));
/// assert_eq!(margem, "187.5".parse().unwrap());
/// ```
#[inline]
pub fn percent_of(base: Decimal, pct: Decimal) -> Decimal {
    base * pct / Decimal::ONE_HUNDRED
}

/// Rounds a kit-derived quantity up to the next whole unit.
///
/// ## Rules
/// - Ceiling, never nearest: 10.175 pieces of conduit means buying 11.
/// - Applied AFTER the loss percentage, only to kit-derived quantities.
/// - Manually entered quantities are never rounded.
#[inline]
pub fn round_up(qty: Decimal) -> Decimal {
    qty.ceil()
}

// =============================================================================
// Lenient Parsing
// =============================================================================

/// Parses a decimal out of free-form text, never failing.
///
/// ## Rules
/// - Plain decimal strings parse directly ("1437.5", "-2").
/// - Scientific notation is accepted ("1e3").
/// - Brazilian money strings are normalized: "R$ 1.234,56" → 1234.56
///   (strip "R$", spaces and thousand dots, comma becomes the decimal point).
/// - Anything else, including the empty string, parses to zero.
///
/// ## Example
/// ```rust
/// use brasa_core::money::parse_decimal_lenient;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal_lenient("R$ 1.234,56"), "1234.56".parse().unwrap());
/// assert_eq!(parse_decimal_lenient(""), Decimal::ZERO);
/// ```
pub fn parse_decimal_lenient(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// The fallible core of [`parse_decimal_lenient`]: `None` when the text
/// holds no number at all, so callers can substitute something other than
/// zero.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<Decimal>() {
        return Some(value);
    }
    if let Ok(value) = Decimal::from_scientific(trimmed) {
        return Some(value);
    }

    // "R$ 1.234,56" → "1234,56" → "1234.56"
    let normalized: String = trimmed
        .chars()
        .filter(|c| !matches!(c, 'R' | '$' | '.') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse::<Decimal>().ok()
}

// =============================================================================
// Lenient Serde Deserialization
// =============================================================================

/// Deserializes a decimal field from any shape a stored snapshot may hold.
///
/// Legacy records were written by a JavaScript frontend, so a numeric field
/// can arrive as a JSON number, a numeric string, an empty string, or null.
/// All of them must enter the engine as a defined value:
///
/// | Input                          | Result |
/// |--------------------------------|--------|
/// | `12.5`, `37`                   | value  |
/// | `"12,5"`, `"R$ 950"`           | parsed |
/// | `""`, `null`, absent, non-finite | `0`  |
///
/// Pair with `#[serde(default)]` so absent fields also land on zero:
/// ```rust,ignore
/// #[serde(deserialize_with = "crate::money::lenient_decimal", default)]
/// pub preco: Decimal,
/// ```
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientDecimalVisitor)
}

struct LenientDecimalVisitor;

impl<'de> Visitor<'de> for LenientDecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        // NaN/Infinity cannot be represented; coerce to zero
        Ok(Decimal::try_from(v).unwrap_or(Decimal::ZERO))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Ok(parse_decimal_lenient(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(LenientDecimalVisitor)
    }
}

/// Deserializes a whole-number field from any shape a stored snapshot may
/// hold, or `None` when the shape holds no usable number.
///
/// The integer sibling of [`lenient_decimal`], for day counts and other
/// fields where zero is not a sensible stand-in for "missing". Fractional
/// values truncate toward zero ("30.5 days" is 30 days); null and
/// unparseable text come back as `None` so the caller can fall back to the
/// field's own default:
/// ```rust,ignore
/// fn lenient_validade_dias<'de, D>(deserializer: D) -> Result<i64, D::Error>
/// where
///     D: Deserializer<'de>,
/// {
///     Ok(crate::money::lenient_opt_i64(deserializer)?.unwrap_or(DEFAULT_VALIDITY_DAYS))
/// }
/// ```
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientOptI64Visitor)
}

struct LenientOptI64Visitor;

impl<'de> Visitor<'de> for LenientOptI64Visitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a whole number, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).ok())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // NaN/Infinity carry no day count; let the caller pick the default
        Ok(Decimal::try_from(v).ok().and_then(|d| d.trunc().to_i64()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(parse_decimal(v).and_then(|d| d.trunc().to_i64()))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientOptI64Visitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
