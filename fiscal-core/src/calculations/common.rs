//! Rounding and clamping shared by every calculator.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with midpoints going away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(5416.302496)), dec!(5416.30));
/// assert_eq!(round_half_up(dec!(148.515)), dec!(148.52));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `max(0, value)`, the clamp every "payable" line applies.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Converts a percentage such as `10.88` into the fraction `0.1088`.
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}
