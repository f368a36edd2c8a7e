//! Monetary types for price and quantity representation.
//!
//! Money is always an integer count of minor units (cents, fen, kopecks) in
//! some currency. Decimal arithmetic is only used transiently while scaling.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Price in minor units of some currency.
pub type MinorUnits = i64;

/// Discrete item count.
pub type Quantity = i64;

/// Round a decimal amount half-up to whole minor units.
///
/// Prices are non-negative, so half-up is applied as midpoint-away-from-zero;
/// a negative midpoint such as `-0.5` rounds to `-1`. Returns `None` if the
/// result does not fit in [`MinorUnits`].
#[must_use]
pub fn round_half_up(amount: Decimal) -> Option<MinorUnits> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Scale an amount by a multiplier, rounding half-up.
///
/// A strictly positive amount never collapses to zero unless the multiplier
/// itself is zero.
#[must_use]
pub fn scale(amount: MinorUnits, multiplier: Decimal) -> Option<MinorUnits> {
    let scaled = round_half_up(Decimal::from(amount).checked_mul(multiplier)?)?;
    if scaled == 0 && amount > 0 && multiplier > Decimal::ZERO {
        return Some(1);
    }
    Some(scaled)
}
