//! Discounts
//!
//! The cart asks its [`DiscountRule`] for the discount on every read of the
//! total. No promotion engine exists yet, so [`NoDiscount`] is the only rule
//! and the default for every cart.

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{cart::CartLine, pricing::PricingError};

/// Derives the discount for a set of cart lines.
pub trait DiscountRule: fmt::Debug {
    /// Calculate the discount to subtract from the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount cannot be represented.
    fn discount<'a>(
        &self,
        lines: &[CartLine<'a>],
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError>;
}

/// Always discounts nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoDiscount;

impl DiscountRule for NoDiscount {
    fn discount<'a>(
        &self,
        _lines: &[CartLine<'a>],
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        Ok(Money::from_minor(0, subtotal.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn no_discount_is_zero_in_subtotal_currency() -> TestResult {
        let discount = NoDiscount.discount(&[], &Money::from_minor(20_000, IDR))?;

        assert_eq!(discount, Money::from_minor(0, IDR));

        Ok(())
    }
}
