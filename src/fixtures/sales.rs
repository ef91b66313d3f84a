//! Sales Fixtures

use jiff::civil::{Date, Time};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_currency, parse_price},
    sales::{PaymentMethod, SaleRecord, SaleStatus, SalesJournal},
};

/// Wrapper for sales in YAML
#[derive(Debug, Deserialize)]
pub struct SalesFixture {
    /// Journal currency code (e.g., "IDR")
    pub currency: String,

    /// Sales in journal order
    #[serde(default)]
    pub sales: Vec<SaleFixture>,
}

impl SalesFixture {
    /// Build a journal from the fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is unknown, an amount is malformed,
    /// or the journal rejects a sale.
    pub fn into_journal(self) -> Result<SalesJournal<'static>, FixtureError> {
        let mut journal = SalesJournal::new(parse_currency(&self.currency)?);

        for sale in self.sales {
            journal.push(sale.try_into()?)?;
        }

        Ok(journal)
    }
}

/// Sale Fixture
#[derive(Debug, Deserialize)]
pub struct SaleFixture {
    /// Invoice number
    pub invoice: String,

    /// Business date (e.g., "2025-11-29")
    pub date: Date,

    /// Time of day (e.g., "08:15:00")
    pub time: Time,

    /// Units sold
    pub items_count: u64,

    /// Subtotal (e.g., "52000 IDR")
    pub subtotal: String,

    /// Tax charged
    pub tax: String,

    /// Discount given
    pub discount: String,

    /// Amount paid
    pub total: String,

    /// How the sale was paid
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Whether the sale still stands
    #[serde(default)]
    pub status: SaleStatus,

    /// Cashier who took the payment
    pub cashier: String,

    /// Customer name
    pub customer: String,
}

impl TryFrom<SaleFixture> for SaleRecord<'static> {
    type Error = FixtureError;

    fn try_from(fixture: SaleFixture) -> Result<Self, Self::Error> {
        let money = |s: &str| -> Result<Money<'static, Currency>, FixtureError> {
            let (minor_units, currency) = parse_price(s)?;

            Ok(Money::from_minor(minor_units, currency))
        };

        Ok(SaleRecord {
            subtotal: money(&fixture.subtotal)?,
            tax: money(&fixture.tax)?,
            discount: money(&fixture.discount)?,
            total: money(&fixture.total)?,
            invoice: fixture.invoice,
            date: fixture.date,
            time: fixture.time,
            items_count: fixture.items_count,
            payment_method: fixture.payment_method,
            status: fixture.status,
            cashier: fixture.cashier,
            customer: fixture.customer,
        })
    }
}
