//! Cart Lines

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_total},
    products::{Product, ProductId},
};

/// One product's entry in the cart.
///
/// The unit price is a snapshot taken when the product was first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product_id: ProductId,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: NonZeroU32,
}

impl<'a> CartLine<'a> {
    /// Create a line for a single unit of the product.
    pub(crate) fn new(product: &Product<'a>) -> Self {
        Self {
            product_id: product.id().clone(),
            name: product.name().to_string(),
            unit_price: *product.price(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// Product identifier
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name at the time it was added
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price at the time it was added
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Number of units
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        line_total(&self.unit_price, self.quantity.get())
    }
}
