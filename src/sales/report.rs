//! Sales Report

use std::io;

use jiff::civil::Date;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::sales::{SaleRecord, SalesError, SalesSummary};

/// Records for one day and their summary, ready to print.
#[derive(Debug, Clone)]
pub struct SalesReport<'q, 'a> {
    date: Date,
    records: Vec<&'q SaleRecord<'a>>,
    summary: SalesSummary<'a>,
}

impl<'q, 'a> SalesReport<'q, 'a> {
    /// Create a report from already filtered records.
    pub fn new(date: Date, records: Vec<&'q SaleRecord<'a>>, summary: SalesSummary<'a>) -> Self {
        Self {
            date,
            records,
            summary,
        }
    }

    /// Report date
    pub fn date(&self) -> Date {
        self.date
    }

    /// Records in journal order
    pub fn records(&self) -> &[&'q SaleRecord<'a>] {
        &self.records
    }

    /// Totals across the records
    pub fn summary(&self) -> SalesSummary<'a> {
        self.summary
    }

    /// Writes the report as a table followed by the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SalesError> {
        writeln!(out, " Sales for {}", self.date.strftime("%A, %-d %B %Y"))?;

        if self.records.is_empty() {
            writeln!(out, "\n No transactions\n")?;
        } else {
            writeln!(out, "\n{}\n", self.records_table())?;
        }

        let summary = &self.summary;

        let rows = [
            ("Orders:", summary.orders.to_string()),
            ("Gross:", summary.gross.to_string()),
            ("Tax:", summary.tax.to_string()),
            ("Discount:", summary.discount.to_string()),
            ("Net:", summary.net.to_string()),
            ("Average:", summary.average.to_string()),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:<label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }

    fn records_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record([
            "Invoice", "Time", "Customer", "Cashier", "Method", "Status", "Items", "Total",
        ]);

        for record in &self.records {
            builder.push_record([
                record.invoice.clone(),
                record.time.strftime("%H:%M").to_string(),
                record.customer.clone(),
                record.cashier.clone(),
                record.payment_method.to_string(),
                record.status.to_string(),
                record.items_count.to_string(),
                record.total.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(6..8), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use crate::sales::{PaymentMethod, SalesJournal, SalesQuery, tests::record};

    use super::*;

    #[test]
    fn report_lists_matching_records_and_summary() -> TestResult {
        let day = date(2025, 11, 29);
        let mut journal = SalesJournal::new(IDR);
        journal.push(record("INV-20251129-001", day, "Walk-in", PaymentMethod::Cash, 52_000, 2_000)?)?;
        journal.push(record("INV-20251129-002", day, "Bpk Andi", PaymentMethod::Qris, 18_000, 0)?)?;
        journal.push(record("INV-20251128-001", date(2025, 11, 28), "Ibu Rina", PaymentMethod::Debit, 34_000, 0)?)?;

        let query = SalesQuery::on(day);
        let report = journal.report(&query)?;

        assert_eq!(report.date(), day);
        assert_eq!(report.records().len(), 2);
        assert_eq!(report.summary().orders, 2);

        let mut out = Vec::new();
        report.write_to(&mut out)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Saturday, 29 November 2025"));
        assert!(text.contains("INV-20251129-002"));
        assert!(text.contains("QRIS"));
        assert!(text.contains("09:00"));
        assert!(!text.contains("INV-20251128-001"));
        assert!(text.contains("Orders:"));
        assert!(text.contains("Average:"));

        Ok(())
    }

    #[test]
    fn empty_report_prints_placeholder() -> TestResult {
        let journal = SalesJournal::new(IDR);
        let query = SalesQuery::on(date(2025, 11, 29)).with_search("nobody");

        let report = journal.report(&query)?;
        let mut out = Vec::new();
        report.write_to(&mut out)?;
        let text = String::from_utf8(out)?;

        assert!(report.records().is_empty());
        assert!(text.contains("No transactions"));
        assert!(!text.contains("Invoice"));

        Ok(())
    }
}
