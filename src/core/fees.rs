//! Fee breakdown for a paid booking.
//!
//! Every derived amount is a fixed percentage of the base amount, rounded
//! half-up to the cent on its own. Components are never obtained by
//! subtracting already-rounded totals, so `helper_receives + total_platform_cut`
//! may differ from `base_amount` by a cent.

use crate::errors::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Customer pays base plus 10%.
pub const CUSTOMER_CHARGE_RATE: Decimal = dec!(1.10);
/// Helper keeps 90% of base.
pub const HELPER_RATE: Decimal = dec!(0.90);
/// Card processing fee.
pub const STRIPE_FEE_RATE: Decimal = dec!(0.03);
/// Platform revenue.
pub const PLATFORM_FEE_RATE: Decimal = dec!(0.05);
/// Charity contribution.
pub const CHARITY_RATE: Decimal = dec!(0.02);

/// Largest accepted base amount. Every derived field stays well inside
/// what `i64` cents can hold, and totals over any realistic ledger stay
/// inside `Decimal` range.
pub const MAX_BASE_AMOUNT: Decimal = dec!(1000000000000);

const CENT_SCALE: u32 = 2;

/// The five derived currency fields of a ledger entry plus their platform cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// `round2(base * 1.10)`
    pub total_customer_charge: Decimal,
    /// `round2(base * 0.90)`
    pub helper_receives: Decimal,
    /// `round2(base * 0.03)`
    pub stripe_fee: Decimal,
    /// `round2(base * 0.05)`
    pub platform_fee: Decimal,
    /// `round2(base * 0.02)`
    pub charity_amount: Decimal,
    /// `stripe_fee + platform_fee + charity_amount`
    pub total_platform_cut: Decimal,
}

impl FeeBreakdown {
    /// Computes the breakdown for a base amount. Fails with `InvalidAmount`
    /// for anything [`validate_base_amount`] rejects.
    pub fn from_base_amount(base_amount: Decimal) -> Result<Self> {
        let base_amount = validate_base_amount(base_amount)?;
        let share = |rate: Decimal| {
            base_amount
                .checked_mul(rate)
                .map(round_cents)
                .ok_or_else(|| Error::InvalidAmount {
                    input: base_amount.to_string(),
                })
        };

        let stripe_fee = share(STRIPE_FEE_RATE)?;
        let platform_fee = share(PLATFORM_FEE_RATE)?;
        let charity_amount = share(CHARITY_RATE)?;

        Ok(Self {
            total_customer_charge: share(CUSTOMER_CHARGE_RATE)?,
            helper_receives: share(HELPER_RATE)?,
            stripe_fee,
            platform_fee,
            charity_amount,
            total_platform_cut: stripe_fee + platform_fee + charity_amount,
        })
    }
}

/// Rounds to two decimal places, midpoints away from zero.
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Checks that a base amount is strictly positive, cent denominated and no
/// larger than [`MAX_BASE_AMOUNT`].
pub fn validate_base_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO
        || amount > MAX_BASE_AMOUNT
        || amount.normalize().scale() > CENT_SCALE
    {
        return Err(Error::InvalidAmount {
            input: amount.to_string(),
        });
    }
    Ok(amount)
}

/// Parses a base amount typed into a booking or admin form.
///
/// Leading `$` and surrounding whitespace are ignored. Anything that is not
/// a positive number with at most two decimals is `InvalidAmount`.
pub fn parse_base_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);

    let amount = Decimal::from_str(digits).map_err(|_| Error::InvalidAmount {
        input: input.to_string(),
    })?;

    validate_base_amount(amount).map_err(|_| Error::InvalidAmount {
        input: input.to_string(),
    })
}
