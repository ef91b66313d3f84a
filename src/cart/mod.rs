//! Cart
//!
//! An ordered, product-keyed ledger of cart lines for one in-progress sale.
//! Every monetary figure is derived from the lines on read.

use std::num::NonZeroU32;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    discounts::{DiscountRule, NoDiscount},
    pricing::{PricingError, percent_of},
    products::{Product, ProductId},
};

mod line;

pub use line::CartLine;

/// Errors related to cart contents or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Error deriving a line total, tax or discount.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Tax rate applied when none is configured (10%).
pub fn default_tax_rate() -> Percentage {
    Percentage::from(Decimal::new(10, 2))
}

/// All derived figures of a cart, computed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals<'a> {
    /// Sum of every line total
    pub subtotal: Money<'a, Currency>,

    /// Subtotal multiplied by the tax rate
    pub tax: Money<'a, Currency>,

    /// Discount from the cart's discount rule
    pub discount: Money<'a, Currency>,

    /// Subtotal plus tax minus discount
    pub total: Money<'a, Currency>,

    /// Sum of every line quantity
    pub item_count: u64,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a, R: DiscountRule = NoDiscount> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
    tax_rate: Percentage,
    discount_rule: R,
}

impl Cart<'_> {
    /// Create an empty cart with the default tax rate and no discount.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_discount_rule(currency, NoDiscount)
    }
}

impl<'a, R: DiscountRule> Cart<'a, R> {
    /// Create an empty cart that derives its discount from `discount_rule`.
    pub fn with_discount_rule(currency: &'static Currency, discount_rule: R) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            tax_rate: default_tax_rate(),
            discount_rule,
        }
    }

    /// Replace the tax rate used by [`Cart::tax`] and [`Cart::total`].
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Percentage) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity increased; its original
    /// unit price is kept even if `product` carries a different one. Returns
    /// the line's quantity afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in
    /// another currency. The cart is left unchanged.
    pub fn add_item(&mut self, product: &Product<'a>) -> Result<NonZeroU32, CartError> {
        let product_currency = product.price().currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id().clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self.line_mut(product.id()) {
            let quantity = line.quantity().saturating_add(1);
            line.set_quantity(quantity);

            debug!(product_id = %product.id(), quantity = quantity.get(), "increased cart line");

            return Ok(quantity);
        }

        self.lines.push(CartLine::new(product));

        debug!(product_id = %product.id(), "added cart line");

        Ok(NonZeroU32::MIN)
    }

    /// Remove a product's line, returning it if it was present.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartLine<'a>> {
        let index = self.position(product_id)?;
        let line = self.lines.remove(index);

        debug!(product_id = %product_id, "removed cart line");

        Some(line)
    }

    /// Replace a line's quantity; zero removes the line.
    ///
    /// Does nothing when the product is not in the cart. Returns the line's
    /// quantity afterwards, or `None` if no line remains.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Option<NonZeroU32> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            self.remove_item(product_id);
            return None;
        };

        let line = self.line_mut(product_id)?;
        line.set_quantity(quantity);

        debug!(product_id = %product_id, quantity = quantity.get(), "set cart line quantity");

        Some(quantity)
    }

    /// Add one to a line's quantity.
    ///
    /// Does nothing when the product is not in the cart.
    pub fn increase_quantity(&mut self, product_id: &ProductId) -> Option<NonZeroU32> {
        let line = self.line_mut(product_id)?;
        let quantity = line.quantity().saturating_add(1);
        line.set_quantity(quantity);

        debug!(product_id = %product_id, quantity = quantity.get(), "increased cart line");

        Some(quantity)
    }

    /// Take one from a line's quantity, removing the line when it reaches zero.
    ///
    /// Does nothing when the product is not in the cart.
    pub fn decrease_quantity(&mut self, product_id: &ProductId) -> Option<NonZeroU32> {
        let index = self.position(product_id)?;
        let line = self.lines.get_mut(index)?;

        if let Some(quantity) = NonZeroU32::new(line.quantity().get() - 1) {
            line.set_quantity(quantity);

            debug!(product_id = %product_id, quantity = quantity.get(), "decreased cart line");

            return Some(quantity);
        }

        self.lines.remove(index);

        debug!(product_id = %product_id, "removed cart line");

        None
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();

        debug!("cleared cart");
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        self.lines
            .iter()
            .try_fold(
                Money::from_minor(0, self.currency),
                |acc, line| -> Result<_, CartError> { Ok(acc.add(line.line_total()?)?) },
            )
    }

    /// Calculate tax on the subtotal at the cart's tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal or tax cannot be represented.
    pub fn tax(&self) -> Result<Money<'a, Currency>, CartError> {
        self.tax_at(self.tax_rate)
    }

    /// Calculate tax on the subtotal at an explicit rate.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal or tax cannot be represented.
    pub fn tax_at(&self, rate: Percentage) -> Result<Money<'a, Currency>, CartError> {
        Ok(percent_of(&self.subtotal()?, rate)?)
    }

    /// Calculate the discount from the cart's discount rule.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal or discount cannot be represented.
    pub fn discount(&self) -> Result<Money<'a, Currency>, CartError> {
        let subtotal = self.subtotal()?;

        Ok(self.discount_rule.discount(&self.lines, &subtotal)?)
    }

    /// Calculate the total payable: subtotal plus tax minus discount.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any derived figure cannot be represented.
    pub fn total(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.totals()?.total)
    }

    /// Calculate every derived figure in one pass over the lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any derived figure cannot be represented.
    pub fn totals(&self) -> Result<CartTotals<'a>, CartError> {
        let subtotal = self.subtotal()?;
        let tax = percent_of(&subtotal, self.tax_rate)?;
        let discount = self.discount_rule.discount(&self.lines, &subtotal)?;
        let total = subtotal.add(tax)?.sub(discount)?;

        Ok(CartTotals {
            subtotal,
            tax,
            discount,
            total,
            item_count: self.total_item_count(),
        })
    }

    /// Sum of every line quantity.
    pub fn total_item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Get a product's line.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    /// Lines in the order their products were first added.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Iterate over the lines in the order their products were first added.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the tax rate of the cart.
    #[must_use]
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine<'a>> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }
}
