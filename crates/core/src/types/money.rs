//! Money helpers.
//!
//! Prices are plain [`Decimal`] amounts in the store currency's major unit
//! (dollars). The charge provider wants integer minor units (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Errors converting an amount to minor units.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Zero or negative amount.
    #[error("amount must be positive")]
    NotPositive,
    /// Amount does not fit into an `i64` of minor units.
    #[error("amount is out of range")]
    OutOfRange,
}

/// Convert a major-unit amount to minor units (x100), rounding half away
/// from zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use swiftbite_core::to_minor_units;
///
/// assert_eq!(to_minor_units(Decimal::new(1299, 2)), Ok(1299));
/// assert_eq!(to_minor_units(Decimal::new(10005, 3)), Ok(1001));
/// ```
///
/// # Errors
///
/// Returns [`MoneyError::NotPositive`] for amounts that round to zero or
/// below, and [`MoneyError::OutOfRange`] if the result overflows `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MoneyError::OutOfRange)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if minor <= Decimal::ZERO {
        return Err(MoneyError::NotPositive);
    }

    minor.to_i64().ok_or(MoneyError::OutOfRange)
}

/// Sum of a sequence of amounts.
pub fn total<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, p| acc + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_fractional_amounts() {
        assert_eq!(to_minor_units(Decimal::new(25, 0)), Ok(2500));
        assert_eq!(to_minor_units(Decimal::new(1999, 2)), Ok(1999));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::new(1005, 3)), Ok(101));
        assert_eq!(to_minor_units(Decimal::new(1004, 3)), Ok(100));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(to_minor_units(Decimal::ZERO), Err(MoneyError::NotPositive));
        assert_eq!(
            to_minor_units(Decimal::new(-5, 0)),
            Err(MoneyError::NotPositive)
        );
        assert_eq!(
            to_minor_units(Decimal::new(4, 3)),
            Err(MoneyError::NotPositive)
        );
    }

    #[test]
    fn test_total() {
        let sum = total([Decimal::new(1050, 2), Decimal::new(249, 2)]);
        assert_eq!(sum, Decimal::new(1299, 2));
        assert_eq!(total(Vec::new()), Decimal::ZERO);
    }
}
