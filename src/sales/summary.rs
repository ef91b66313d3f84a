//! Sales Summary

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, sum},
    sales::{SaleRecord, SalesError},
};

/// Totals across a set of sale records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesSummary<'a> {
    /// Number of sales
    pub orders: usize,

    /// Sum of subtotals
    pub gross: Money<'a, Currency>,

    /// Sum of tax
    pub tax: Money<'a, Currency>,

    /// Sum of discounts
    pub discount: Money<'a, Currency>,

    /// Sum of totals
    pub net: Money<'a, Currency>,

    /// Net divided by orders, rounded to the nearest minor unit
    pub average: Money<'a, Currency>,
}

impl<'a> SalesSummary<'a> {
    /// Summarise a set of records.
    ///
    /// # Errors
    ///
    /// Returns a [`SalesError`] if a record is in another currency or a sum overflows.
    pub fn from_records<'r, I>(records: I, currency: &'a Currency) -> Result<Self, SalesError>
    where
        'a: 'r,
        I: IntoIterator<Item = &'r SaleRecord<'a>>,
    {
        let records: Vec<&SaleRecord<'a>> = records.into_iter().collect();

        let gross = sum(records.iter().map(|r| r.subtotal), currency)?;
        let tax = sum(records.iter().map(|r| r.tax), currency)?;
        let discount = sum(records.iter().map(|r| r.discount), currency)?;
        let net = sum(records.iter().map(|r| r.total), currency)?;

        let average = Money::from_minor(average_minor(net.to_minor_units(), records.len())?, currency);

        Ok(Self {
            orders: records.len(),
            gross,
            tax,
            discount,
            net,
            average,
        })
    }
}

/// Mean of a minor-unit total over a count, midpoints rounded away from zero.
fn average_minor(total: i64, count: usize) -> Result<i64, PricingError> {
    if count == 0 {
        return Ok(0);
    }

    let (Some(total), Some(count)) = (Decimal::from_i64(total), Decimal::from_usize(count)) else {
        return Err(PricingError::Overflow);
    };

    total
        .checked_div(count)
        .and_then(|mean| {
            mean.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(PricingError::Overflow)
}
