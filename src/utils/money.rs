//! Decimal helpers shared by the store and the aggregation engine.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::LedgerError;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Parses a user-entered amount, accepting surrounding whitespace.
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| LedgerError::validation(format!("Invalid amount `{}`", raw.trim())))
}

/// Sums an iterator of amounts; an empty iterator yields zero.
///
/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// `part / whole * 100`, or zero when `whole` is zero.
///
/// A quotient too large to represent saturates to `Decimal::MAX` (or `Decimal::MIN`
/// when the signs differ).
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() || part.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or_else(|| {
            if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        })
}

/// Rounds half away from zero, matching how amounts are shown to users.
pub fn round_display(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_amount_trims_and_rejects_garbage() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
        let err = parse_amount("twelve").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref msg) if msg.contains("twelve")));
    }

    #[test]
    fn sum_is_exact_for_cents() {
        let total = sum([dec!(0.1), dec!(0.2), dec!(0.3)]);
        assert_eq!(total, dec!(0.6));
        assert_eq!(sum(Vec::<Decimal>::new()), Decimal::ZERO);
    }

    #[test]
    fn percent_of_guards_zero_denominator() {
        assert_eq!(percent_of(dec!(50), dec!(0)), Decimal::ZERO);
        assert_eq!(percent_of(dec!(50), dec!(200)), dec!(25));
    }

    #[test]
    fn overflowing_arithmetic_saturates() {
        assert_eq!(percent_of(Decimal::MAX, dec!(0.01)), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MIN, dec!(0.01)), Decimal::MIN);
        assert_eq!(sum([Decimal::MAX, dec!(1), dec!(1)]), Decimal::MAX);
        assert_eq!(sum([Decimal::MIN, dec!(-1)]), Decimal::MIN);
    }

    #[test]
    fn round_display_rounds_half_away_from_zero() {
        assert_eq!(round_display(dec!(0.25), 1), dec!(0.3));
        assert_eq!(round_display(dec!(-0.25), 1), dec!(-0.3));
    }
}
