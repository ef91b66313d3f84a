//! Receipt

use std::{io, num::NonZeroU32};

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartTotals},
    discounts::DiscountRule,
    pricing::PricingError,
    products::ProductId,
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error deriving cart totals.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Error deriving a line total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error writing the receipt
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Store details printed above the items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreHeader {
    /// Store name
    pub name: String,

    /// Street address
    pub address: String,

    /// Contact phone number
    pub phone: String,

    /// Cashier on duty
    pub cashier: String,
}

/// One printed line of a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Product identifier
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Number of units
    pub quantity: NonZeroU32,

    /// Price per unit
    pub unit_price: Money<'a, Currency>,

    /// Unit price multiplied by quantity
    pub line_total: Money<'a, Currency>,
}

/// Tender and change recorded on a paid receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement<'a> {
    /// Amount handed over
    pub tendered: Money<'a, Currency>,

    /// Amount handed back
    pub change: Money<'a, Currency>,
}

/// Snapshot of a cart, optionally settled by a payment.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    totals: CartTotals<'a>,
    settlement: Option<Settlement<'a>>,
}

impl<'a> Receipt<'a> {
    /// Snapshot the lines and totals of a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart totals cannot be derived.
    pub fn from_cart<R: DiscountRule>(cart: &Cart<'a, R>) -> Result<Self, ReceiptError> {
        let lines = cart
            .iter()
            .map(|line| -> Result<ReceiptLine<'a>, ReceiptError> {
                Ok(ReceiptLine {
                    product_id: line.product_id().clone(),
                    name: line.name().to_string(),
                    quantity: line.quantity(),
                    unit_price: *line.unit_price(),
                    line_total: line.line_total()?,
                })
            })
            .collect::<Result<SmallVec<_>, _>>()?;

        Ok(Self {
            lines,
            totals: cart.totals()?,
            settlement: None,
        })
    }

    /// Record the tender and change on the receipt.
    #[must_use]
    pub fn settled(mut self, tendered: Money<'a, Currency>, change: Money<'a, Currency>) -> Self {
        self.settlement = Some(Settlement { tendered, change });
        self
    }

    /// Printed lines, in cart order
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Subtotal, tax, discount, total and item count
    pub fn totals(&self) -> CartTotals<'a> {
        self.totals
    }

    /// Tender and change, if the receipt has been paid
    pub fn settlement(&self) -> Option<Settlement<'a>> {
        self.settlement
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, header: &StoreHeader) -> Result<(), ReceiptError> {
        write_store_header(&mut out, header)?;

        if self.lines.is_empty() {
            writeln!(out, "\n No items\n")?;
        } else {
            writeln!(out, "\n{}", self.items_table())?;
        }

        self.write_summary(&mut out)?;

        writeln!(out, "\n Thank you!")?;

        Ok(())
    }

    fn items_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["#", "Item", "Qty", "Unit Price", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("{}", idx + 1),
                line.name.clone(),
                format!("x{}", line.quantity),
                format!("{}", line.unit_price),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        table.to_string()
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut rows: SmallVec<[(&str, String); 8]> = SmallVec::new();

        rows.push(("Subtotal:", format!("{}", self.totals.subtotal)));
        rows.push(("Tax:", format!("{}", self.totals.tax)));
        rows.push(("Discount:", format!("{}", self.totals.discount)));
        rows.push(("Total:", format!("{}", self.totals.total)));

        if let Some(settlement) = self.settlement {
            rows.push(("Paid:", format!("{}", settlement.tendered)));
            rows.push(("Change:", format!("{}", settlement.change)));
        }

        rows.push(("Items:", format!("{}", self.totals.item_count)));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:<label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }
}

fn write_store_header(out: &mut impl io::Write, header: &StoreHeader) -> Result<(), ReceiptError> {
    for line in [&header.name, &header.address, &header.phone] {
        if !line.is_empty() {
            writeln!(out, " {line}")?;
        }
    }

    if !header.cashier.is_empty() {
        writeln!(out, " Cashier: {}", header.cashier)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    fn cart<'a>() -> Result<Cart<'a>, Box<dyn std::error::Error>> {
        let mut cart = Cart::new(IDR);
        let kopi = Product::new("kopi", "Kopi Susu", Money::from_minor(1_800_000, IDR))?;
        let teh = Product::new("teh", "Teh Manis", Money::from_minor(500_000, IDR))?;

        cart.add_item(&kopi)?;
        cart.add_item(&teh)?;
        cart.add_item(&teh)?;

        Ok(cart)
    }

    fn header() -> StoreHeader {
        StoreHeader {
            name: "Toko Contoh".to_string(),
            address: "Jl. Mawar No. 123".to_string(),
            phone: String::new(),
            cashier: "Admin".to_string(),
        }
    }

    #[test]
    fn from_cart_snapshots_lines_and_totals() -> TestResult {
        let cart = cart()?;

        let receipt = Receipt::from_cart(&cart)?;

        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(
            receipt.lines().get(1).map(|line| line.line_total),
            Some(Money::from_minor(1_000_000, IDR))
        );
        assert_eq!(receipt.totals(), cart.totals()?);
        assert!(receipt.settlement().is_none());

        Ok(())
    }

    #[test]
    fn settled_receipt_keeps_tender_and_change() -> TestResult {
        let receipt = Receipt::from_cart(&cart()?)?.settled(
            Money::from_minor(5_000_000, IDR),
            Money::from_minor(1_920_000, IDR),
        );

        let settlement = receipt.settlement().ok_or("expected settlement")?;

        assert_eq!(settlement.tendered, Money::from_minor(5_000_000, IDR));
        assert_eq!(settlement.change, Money::from_minor(1_920_000, IDR));

        Ok(())
    }

    #[test]
    fn write_to_prints_items_and_summary() -> TestResult {
        let receipt = Receipt::from_cart(&cart()?)?;
        let mut out = Vec::new();

        receipt.write_to(&mut out, &header())?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Toko Contoh"));
        assert!(text.contains("Cashier: Admin"));
        assert!(text.contains("Kopi Susu"));
        assert!(text.contains("x2"));
        assert!(text.contains("Subtotal:"));
        assert!(text.contains("Items:"));
        assert!(!text.contains("Change:"));

        Ok(())
    }

    #[test]
    fn write_to_prints_payment_rows_when_settled() -> TestResult {
        let receipt = Receipt::from_cart(&cart()?)?.settled(
            Money::from_minor(5_000_000, IDR),
            Money::from_minor(1_920_000, IDR),
        );
        let mut out = Vec::new();

        receipt.write_to(&mut out, &header())?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Paid:"));
        assert!(text.contains("Change:"));

        Ok(())
    }

    #[test]
    fn write_to_empty_cart_prints_placeholder() -> TestResult {
        let receipt = Receipt::from_cart(&Cart::new(IDR))?;
        let mut out = Vec::new();

        receipt.write_to(&mut out, &StoreHeader::default())?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("No items"));
        assert!(!text.contains("Item "));

        Ok(())
    }
}
