//! Pricing
//!
//! Minor-unit money helpers shared by the cart, checkout and sales journal.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while deriving money amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A minor-unit calculation did not fit in an `i64`.
    #[error("money amount overflowed")]
    Overflow,

    /// A percentage could not be applied to an amount.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the line total does not fit in minor units.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sum a sequence of amounts, starting from zero in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if any amount is in a different currency.
pub fn sum<'a, I>(
    amounts: I,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError>
where
    I: IntoIterator<Item = Money<'a, Currency>>,
{
    amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| {
            acc.add(amount).map_err(PricingError::from)
        })
}

/// Apply a percentage to an amount, rounding to the nearest minor unit.
///
/// Midpoints round away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result cannot be represented.
pub fn percent_of<'a>(
    amount: &Money<'a, Currency>,
    percent: Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = percent_of_minor(percent, amount.to_minor_units())?;

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Apply a percentage to a minor-unit amount.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, PricingError> {
    let fraction = percent * Decimal::ONE;

    let Some(minor) = Decimal::from_i64(minor) else {
        return Err(PricingError::PercentConversion);
    };

    fraction
        .checked_mul(minor)
        .and_then(|applied| {
            applied
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(PricingError::PercentConversion)
}

/// Number of minor units in one major unit of the currency (100 for two-decimal currencies).
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] for an exponent too large for `i64`.
pub fn minor_per_major(currency: &Currency) -> Result<i64, PricingError> {
    10_i64
        .checked_pow(currency.exponent)
        .ok_or(PricingError::Overflow)
}

/// Build an amount from whole major units (e.g. rupiah, pounds).
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn from_major(major: i64, currency: &Currency) -> Result<Money<'_, Currency>, PricingError> {
    let minor = major
        .checked_mul(minor_per_major(currency)?)
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, currency))
}

/// Round an amount up to whole major units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the currency exponent is unsupported.
pub fn ceil_major(amount: &Money<'_, Currency>) -> Result<i64, PricingError> {
    let per_major = minor_per_major(amount.currency())?;
    let minor = amount.to_minor_units();

    let whole = minor.div_euclid(per_major);

    Ok(if minor.rem_euclid(per_major) == 0 {
        whole
    } else {
        whole + 1
    })
}
