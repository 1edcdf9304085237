//! Fixed-point currency amounts.
//!
//! [`Money`] is a value object: immutable, compared by value, and never a
//! native float. Internally it is a [`Decimal`] normalized to scale 2 (minor
//! currency units), so parsing, addition, and multiplication by a quantity
//! are exact. Amounts are bounded to what a `NUMERIC(12, 2)` column can hold;
//! arithmetic that would leave that range is an error, never a wrap or a
//! silent truncation.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};

/// Number of fractional digits carried by every amount.
const SCALE: u32 = 2;

/// A currency amount with exactly two fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Largest representable magnitude: 9,999,999,999.99.
    fn max_amount() -> Decimal {
        Decimal::new(999_999_999_999, SCALE)
    }

    fn in_range(mut d: Decimal) -> Option<Money> {
        d.rescale(SCALE);
        (d.abs() <= Self::max_amount()).then_some(Money(d))
    }

    /// Build an amount from minor units (cents): `1999` becomes `19.99`.
    pub fn from_minor_units(minor: i64) -> DomainResult<Self> {
        Self::in_range(Decimal::new(minor, SCALE))
            .ok_or_else(|| DomainError::validation("amount out of range"))
    }

    /// The amount in minor units (cents). Exact, since scale is fixed at 2.
    pub fn minor_units(self) -> i64 {
        self.0.mantissa() as i64
    }

    /// Decode an amount read back from storage.
    ///
    /// Values that cannot be represented at scale 2 without loss indicate a
    /// corrupted column and surface as an invariant violation.
    pub fn try_from_decimal(d: Decimal) -> DomainResult<Self> {
        let normalized = Self::in_range(d)
            .ok_or_else(|| DomainError::invariant(format!("stored amount {d} out of range")))?;
        if normalized.0 != d {
            return Err(DomainError::invariant(format!(
                "stored amount {d} has more than {SCALE} fractional digits"
            )));
        }
        Ok(normalized)
    }

    /// The underlying decimal, for encoding into storage.
    pub fn into_decimal(self) -> Decimal {
        self.0
    }

    /// Multiply by an item quantity. Exact; errors if the result leaves the
    /// representable range.
    pub fn checked_mul(self, quantity: i32) -> DomainResult<Money> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .and_then(Self::in_range)
            .ok_or_else(|| DomainError::validation("amount out of range"))
    }

    /// Add another amount. Exact; errors if the result leaves the
    /// representable range.
    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .and_then(Self::in_range)
            .ok_or_else(|| DomainError::validation("amount out of range"))
    }
}

impl fmt::Display for Money {
    /// Always renders exactly two fractional digits: `44.98`, `5.00`, `0.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = self.0;
        d.rescale(SCALE);
        fmt::Display::fmt(&d, f)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parse a decimal string with at most two fractional digits. Shorter
    /// inputs are normalized (`"5"` parses to `5.00`); longer ones are
    /// rejected rather than rounded.
    fn from_str(s: &str) -> DomainResult<Self> {
        let d = Decimal::from_str(s)
            .map_err(|e| DomainError::validation(format!("invalid amount {s:?}: {e}")))?;
        if d.scale() > SCALE {
            return Err(DomainError::validation(format!(
                "amount {s:?} has more than {SCALE} fractional digits"
            )));
        }
        Self::in_range(d).ok_or_else(|| DomainError::validation("amount out of range"))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_and_format_round_trip() {
        for s in ["0.00", "5.00", "19.99", "44.98", "9999999999.99"] {
            assert_eq!(s.parse::<Money>().unwrap().to_string(), s);
        }
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn short_inputs_are_normalized_to_two_digits() {
        assert_eq!("5".parse::<Money>().unwrap().to_string(), "5.00");
        assert_eq!("19.9".parse::<Money>().unwrap().to_string(), "19.90");
    }

    #[test]
    fn three_fractional_digits_are_rejected() {
        let err = "19.999".parse::<Money>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!("10000000000.00".parse::<Money>().is_err());
        let max: Money = "9999999999.99".parse().unwrap();
        assert!(max.checked_add(Money::from_minor_units(1).unwrap()).is_err());
        assert!(max.checked_mul(2).is_err());
    }

    #[test]
    fn multiplication_and_addition_are_exact() {
        let unit: Money = "19.99".parse().unwrap();
        let twice = unit.checked_mul(2).unwrap();
        assert_eq!(twice.to_string(), "39.98");

        let five: Money = "5.00".parse().unwrap();
        assert_eq!(twice.checked_add(five).unwrap().to_string(), "44.98");
    }

    #[test]
    fn minor_units_round_trip() {
        let m = Money::from_minor_units(1999).unwrap();
        assert_eq!(m.to_string(), "19.99");
        assert_eq!(m.minor_units(), 1999);
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let m: Money = "44.98".parse().unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"44.98\"");
        let back: Money = serde_json::from_str("\"44.98\"").unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn stored_decimal_with_extra_digits_is_an_invariant_violation() {
        let d: Decimal = "1.005".parse().unwrap();
        assert!(matches!(
            Money::try_from_decimal(d),
            Err(DomainError::InvariantViolation(_))
        ));
        // Scale 0 reads (e.g. a COALESCEd zero) normalize fine.
        let zero: Decimal = "0".parse().unwrap();
        assert_eq!(Money::try_from_decimal(zero).unwrap(), Money::ZERO);
    }

    proptest! {
        #[test]
        fn string_round_trip_for_any_two_digit_amount(units in 0i64..10_000_000_000, cents in 0i64..100) {
            let s = format!("{units}.{cents:02}");
            let parsed: Money = s.parse().unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        #[test]
        fn multiplication_matches_integer_cent_arithmetic(
            minor in 0i64..1_000_000,
            quantity in 1i32..10_000,
        ) {
            let money = Money::from_minor_units(minor).unwrap();
            let product = money.checked_mul(quantity).unwrap();
            prop_assert_eq!(product.minor_units(), minor * i64::from(quantity));
        }

        #[test]
        fn addition_matches_integer_cent_arithmetic(a in 0i64..1_000_000_000, b in 0i64..1_000_000_000) {
            let sum = Money::from_minor_units(a).unwrap()
                .checked_add(Money::from_minor_units(b).unwrap())
                .unwrap();
            prop_assert_eq!(sum.minor_units(), a + b);
        }
    }
}
