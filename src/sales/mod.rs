//! Sales
//!
//! The sales journal records every settled payment and answers the daily
//! sales report: records for one date, optionally narrowed by a free-text
//! search, and their summary.

use std::fmt;

use jiff::civil::{Date, DateTime, Time};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{checkout::Payment, pricing::PricingError};

mod report;
mod summary;

pub use report::SalesReport;
pub use summary::SalesSummary;

/// Errors related to the sales journal.
#[derive(Debug, Error)]
pub enum SalesError {
    /// A record's currency differs from the journal currency (invoice, record currency, journal currency).
    #[error("Sale {0} has currency {1}, but journal has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A record with the same invoice number is already in the journal.
    #[error("Invoice {0} already exists in the journal")]
    DuplicateInvoice(String),

    /// Error summing sale amounts.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error writing a report
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Notes and coins
    #[default]
    Cash,

    /// QR code payment
    Qris,

    /// Debit card
    Debit,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::Debit => "Debit",
        })
    }
}

/// Whether a sale still stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Settled
    #[default]
    Paid,

    /// Money returned to the customer
    Refunded,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaleStatus::Paid => "Paid",
            SaleStatus::Refunded => "Refunded",
        })
    }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord<'a> {
    /// Invoice number, `INV-YYYYMMDD-NNN`
    pub invoice: String,

    /// Business date of the sale
    pub date: Date,

    /// Time of day of the sale
    pub time: Time,

    /// Units sold
    pub items_count: u64,

    /// Sum of line totals
    pub subtotal: Money<'a, Currency>,

    /// Tax charged
    pub tax: Money<'a, Currency>,

    /// Discount given
    pub discount: Money<'a, Currency>,

    /// Amount paid
    pub total: Money<'a, Currency>,

    /// How the sale was paid
    pub payment_method: PaymentMethod,

    /// Whether the sale still stands
    pub status: SaleStatus,

    /// Cashier who took the payment
    pub cashier: String,

    /// Customer name
    pub customer: String,
}

impl SaleRecord<'_> {
    /// Check if the record falls on the query date and matches its search text.
    pub fn matches(&self, query: &SalesQuery) -> bool {
        if self.date != query.date {
            return false;
        }

        let needle = query.search.trim().to_lowercase();

        if needle.is_empty() {
            return true;
        }

        [
            self.invoice.as_str(),
            self.customer.as_str(),
            self.cashier.as_str(),
            &self.payment_method.to_string(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Who and how, for a payment being recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleContext {
    /// How the sale was paid
    pub payment_method: PaymentMethod,

    /// Cashier who took the payment
    pub cashier: String,

    /// Customer name
    pub customer: String,
}

impl Default for SaleContext {
    fn default() -> Self {
        Self {
            payment_method: PaymentMethod::Cash,
            cashier: "Admin".to_string(),
            customer: "Walk-in".to_string(),
        }
    }
}

/// Selects the records shown in a sales report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesQuery {
    date: Date,
    search: String,
}

impl SalesQuery {
    /// Every record on a date.
    #[must_use]
    pub fn on(date: Date) -> Self {
        Self {
            date,
            search: String::new(),
        }
    }

    /// Narrow to records whose invoice, customer, cashier or payment method contain `search`.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Report date
    pub fn date(&self) -> Date {
        self.date
    }

    /// Search text, possibly empty
    pub fn search(&self) -> &str {
        &self.search
    }
}

/// Sales journal for a single currency.
#[derive(Debug, Clone)]
pub struct SalesJournal<'a> {
    records: Vec<SaleRecord<'a>>,
    currency: &'static Currency,
}

impl<'a> SalesJournal<'a> {
    /// Create an empty journal.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            records: Vec::new(),
            currency,
        }
    }

    /// Append an existing record.
    ///
    /// # Errors
    ///
    /// Returns a [`SalesError`] if the invoice is taken or the currency differs.
    pub fn push(&mut self, record: SaleRecord<'a>) -> Result<(), SalesError> {
        if self.records.iter().any(|r| r.invoice == record.invoice) {
            return Err(SalesError::DuplicateInvoice(record.invoice));
        }

        let mismatched = [&record.subtotal, &record.tax, &record.discount, &record.total]
            .into_iter()
            .find(|amount| amount.currency() != self.currency)
            .map(|amount| amount.currency().iso_alpha_code);

        if let Some(record_currency) = mismatched {
            return Err(SalesError::CurrencyMismatch(
                record.invoice,
                record_currency,
                self.currency.iso_alpha_code,
            ));
        }

        self.records.push(record);

        Ok(())
    }

    /// Record a settled payment under the next invoice number for its date.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::CurrencyMismatch`] if the payment is in another currency.
    pub fn record_payment(
        &mut self,
        payment: &Payment<'a>,
        context: SaleContext,
        at: DateTime,
    ) -> Result<SaleRecord<'a>, SalesError> {
        let totals = payment.receipt().totals();

        let record = SaleRecord {
            invoice: self.next_invoice(at.date()),
            date: at.date(),
            time: at.time(),
            items_count: totals.item_count,
            subtotal: totals.subtotal,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            payment_method: context.payment_method,
            status: SaleStatus::Paid,
            cashier: context.cashier,
            customer: context.customer,
        };

        self.push(record.clone())?;

        info!(invoice = %record.invoice, total = %record.total, "recorded sale");

        Ok(record)
    }

    /// The invoice number the next sale on `date` would receive.
    pub fn next_invoice(&self, date: Date) -> String {
        let prefix = format!("INV-{}-", date.strftime("%Y%m%d"));

        let last = self
            .records
            .iter()
            .filter_map(|record| record.invoice.strip_prefix(prefix.as_str()))
            .filter_map(|sequence| sequence.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        format!("{prefix}{:03}", last.saturating_add(1))
    }

    /// Records matching the query, in journal order.
    pub fn filter<'q>(
        &'q self,
        query: &'q SalesQuery,
    ) -> impl Iterator<Item = &'q SaleRecord<'a>> + 'q {
        self.records.iter().filter(move |record| record.matches(query))
    }

    /// Summary of the records matching the query.
    ///
    /// # Errors
    ///
    /// Returns a [`SalesError`] if the amounts cannot be summed.
    pub fn summary(&self, query: &SalesQuery) -> Result<SalesSummary<'a>, SalesError> {
        SalesSummary::from_records(self.filter(query), self.currency)
    }

    /// Records and summary for a report.
    ///
    /// # Errors
    ///
    /// Returns a [`SalesError`] if the amounts cannot be summed.
    pub fn report<'q>(&'q self, query: &'q SalesQuery) -> Result<SalesReport<'q, 'a>, SalesError> {
        Ok(SalesReport::new(
            query.date(),
            self.filter(query).collect(),
            self.summary(query)?,
        ))
    }

    /// Every record, in journal order
    pub fn records(&self) -> &[SaleRecord<'a>] {
        &self.records
    }

    /// Number of records in the journal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the journal is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the currency of the journal.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::civil::{date, time};
    use rusty_money::iso::{IDR, USD};
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        checkout::Checkout,
        pricing::from_major,
        products::Product,
    };

    use super::*;

    pub(crate) fn record<'a>(
        invoice: &str,
        on: Date,
        customer: &str,
        method: PaymentMethod,
        subtotal_major: i64,
        discount_major: i64,
    ) -> Result<SaleRecord<'a>, PricingError> {
        let subtotal = from_major(subtotal_major, IDR)?;
        let tax = from_major(subtotal_major / 10, IDR)?;
        let discount = from_major(discount_major, IDR)?;
        let total = from_major(subtotal_major + subtotal_major / 10 - discount_major, IDR)?;

        Ok(SaleRecord {
            invoice: invoice.to_string(),
            date: on,
            time: time(9, 0, 0, 0),
            items_count: 1,
            subtotal,
            tax,
            discount,
            total,
            payment_method: method,
            status: SaleStatus::Paid,
            cashier: "Sari".to_string(),
            customer: customer.to_string(),
        })
    }

    fn journal<'a>() -> Result<SalesJournal<'a>, Box<dyn std::error::Error>> {
        let day = date(2025, 11, 29);
        let mut journal = SalesJournal::new(IDR);

        journal.push(record(
            "INV-20251129-001",
            day,
            "Walk-in",
            PaymentMethod::Cash,
            52_000,
            2_000,
        )?)?;
        journal.push(record(
            "INV-20251129-002",
            day,
            "Bpk Andi",
            PaymentMethod::Qris,
            18_000,
            0,
        )?)?;
        journal.push(record(
            "INV-20251128-001",
            date(2025, 11, 28),
            "Ibu Rina",
            PaymentMethod::Debit,
            34_000,
            4_000,
        )?)?;

        Ok(journal)
    }

    #[test]
    fn filter_by_date() -> TestResult {
        let journal = journal()?;
        let query = SalesQuery::on(date(2025, 11, 29));

        let invoices: Vec<&str> = journal.filter(&query).map(|r| r.invoice.as_str()).collect();

        assert_eq!(invoices, vec!["INV-20251129-001", "INV-20251129-002"]);

        Ok(())
    }

    #[test]
    fn search_matches_customer_and_payment_method() -> TestResult {
        let journal = journal()?;
        let day = date(2025, 11, 29);

        let by_customer = journal.filter(&SalesQuery::on(day).with_search("andi")).count();
        let by_method = journal.filter(&SalesQuery::on(day).with_search(" qris ")).count();
        let by_cashier = journal.filter(&SalesQuery::on(day).with_search("SARI")).count();
        let nothing = journal.filter(&SalesQuery::on(day).with_search("rina")).count();

        assert_eq!(by_customer, 1);
        assert_eq!(by_method, 1);
        assert_eq!(by_cashier, 2);
        assert_eq!(nothing, 0);

        Ok(())
    }

    #[test]
    fn push_rejects_duplicate_invoice() -> TestResult {
        let mut journal = journal()?;

        let result = journal.push(record(
            "INV-20251129-001",
            date(2025, 11, 29),
            "Walk-in",
            PaymentMethod::Cash,
            1_000,
            0,
        )?);

        assert!(matches!(
            result,
            Err(SalesError::DuplicateInvoice(invoice)) if invoice == "INV-20251129-001"
        ));

        Ok(())
    }

    #[test]
    fn push_rejects_currency_mismatch() -> TestResult {
        let mut journal = SalesJournal::new(USD);

        let result = journal.push(record(
            "INV-20251129-001",
            date(2025, 11, 29),
            "Walk-in",
            PaymentMethod::Cash,
            1_000,
            0,
        )?);

        assert!(matches!(result, Err(SalesError::CurrencyMismatch(..))));
        assert!(journal.is_empty());

        Ok(())
    }

    #[test]
    fn push_rejects_any_amount_in_another_currency() -> TestResult {
        let mut journal = journal()?;
        let day = date(2025, 11, 29);

        let mut foreign_subtotal =
            record("INV-20251129-003", day, "Walk-in", PaymentMethod::Cash, 1_000, 0)?;
        foreign_subtotal.subtotal = Money::from_minor(100, USD);

        let mut foreign_discount =
            record("INV-20251129-004", day, "Walk-in", PaymentMethod::Cash, 1_000, 0)?;
        foreign_discount.discount = Money::from_minor(0, USD);

        assert!(matches!(
            journal.push(foreign_subtotal),
            Err(SalesError::CurrencyMismatch(invoice, "USD", "IDR")) if invoice == "INV-20251129-003"
        ));
        assert!(matches!(
            journal.push(foreign_discount),
            Err(SalesError::CurrencyMismatch(..))
        ));
        assert_eq!(journal.len(), 3);
        assert!(journal.summary(&SalesQuery::on(day)).is_ok());

        Ok(())
    }

    #[test]
    fn next_invoice_continues_sequence_per_date() -> TestResult {
        let journal = journal()?;

        assert_eq!(journal.next_invoice(date(2025, 11, 29)), "INV-20251129-003");
        assert_eq!(journal.next_invoice(date(2025, 11, 28)), "INV-20251128-002");
        assert_eq!(journal.next_invoice(date(2025, 12, 1)), "INV-20251201-001");

        Ok(())
    }

    #[test]
    fn record_payment_appends_paid_sale() -> TestResult {
        let mut checkout = Checkout::new(Cart::new(IDR));
        let kopi = Product::new("kopi", "Kopi Susu", from_major(18_000, IDR)?)?;
        checkout.cart_mut().add_item(&kopi)?;
        checkout.cart_mut().add_item(&kopi)?;
        checkout.tender_mut().set_amount(50_000)?;
        let payment = checkout.pay()?;

        let mut journal = journal()?;
        let at = date(2025, 11, 29).at(10, 11, 0, 0);

        let sale = journal.record_payment(&payment, SaleContext::default(), at)?;

        assert_eq!(sale.invoice, "INV-20251129-003");
        assert_eq!(sale.items_count, 2);
        assert_eq!(sale.subtotal, from_major(36_000, IDR)?);
        assert_eq!(sale.tax, from_major(3_600, IDR)?);
        assert_eq!(sale.total, from_major(39_600, IDR)?);
        assert_eq!(sale.status, SaleStatus::Paid);
        assert_eq!(sale.customer, "Walk-in");
        assert_eq!(journal.len(), 4);

        Ok(())
    }
}
