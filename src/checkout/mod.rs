//! Checkout
//!
//! A checkout session owns the cart for one sale and the tender typed on the
//! payment keypad. Paying settles the cart into a [`Payment`] and leaves the
//! session empty for the next customer.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, CartError},
    discounts::{DiscountRule, NoDiscount},
    pricing::PricingError,
    receipt::{Receipt, ReceiptError},
};

mod tender;

pub use tender::{MAX_DIGITS, QUICK_AMOUNTS, Tender, TenderError, TenderKey};

/// Errors raised while settling a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The total is zero, so there is nothing to collect.
    #[error("nothing to pay")]
    NothingToPay,

    /// The tendered amount does not cover the total.
    #[error("payment of {tendered} does not cover total of {total}")]
    InsufficientPayment {
        /// Amount due
        total: Money<'static, Currency>,

        /// Amount tendered
        tendered: Money<'static, Currency>,
    },

    /// Error deriving cart totals.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Error converting the tender to money.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Error setting the tender from the total.
    #[error(transparent)]
    Tender(#[from] TenderError),

    /// Error building the receipt.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A settled sale.
#[derive(Debug, Clone)]
pub struct Payment<'a> {
    receipt: Receipt<'a>,
    tendered: Money<'a, Currency>,
    change: Money<'a, Currency>,
}

impl<'a> Payment<'a> {
    /// Receipt for the sale, including tender and change.
    pub fn receipt(&self) -> &Receipt<'a> {
        &self.receipt
    }

    /// Amount handed over by the customer
    pub fn tendered(&self) -> Money<'a, Currency> {
        self.tendered
    }

    /// Amount handed back to the customer
    pub fn change(&self) -> Money<'a, Currency> {
        self.change
    }

    /// Amount due for the sale
    pub fn total(&self) -> Money<'a, Currency> {
        self.receipt.totals().total
    }
}

/// Checkout session
#[derive(Debug)]
pub struct Checkout<'a, R: DiscountRule = NoDiscount> {
    cart: Cart<'a, R>,
    tender: Tender,
}

impl<'a, R: DiscountRule> Checkout<'a, R> {
    /// Start a checkout session around a cart.
    pub fn new(cart: Cart<'a, R>) -> Self {
        Self {
            cart,
            tender: Tender::new(),
        }
    }

    /// The session's cart
    pub fn cart(&self) -> &Cart<'a, R> {
        &self.cart
    }

    /// The session's cart, mutably.
    pub fn cart_mut(&mut self) -> &mut Cart<'a, R> {
        &mut self.cart
    }

    /// The tender keypad buffer
    pub fn tender(&self) -> &Tender {
        &self.tender
    }

    /// The tender keypad buffer, mutably.
    pub fn tender_mut(&mut self) -> &mut Tender {
        &mut self.tender
    }

    /// Set the tender to the cart total.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the total cannot be derived, or
    /// [`CheckoutError::Tender`] if it is negative or too large for the keypad.
    pub fn tender_exact(&mut self) -> Result<(), CheckoutError> {
        let total = self.cart.total()?;

        self.tender.set_exact(&total)?;

        Ok(())
    }

    /// The tendered amount in the cart's currency.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Pricing`] if the tender does not fit in minor units.
    pub fn tendered(&self) -> Result<Money<'static, Currency>, CheckoutError> {
        Ok(self.tender.amount(self.cart.currency())?)
    }

    /// Change due at the current tender, never below zero.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the total or tender cannot be derived.
    pub fn change_preview(&self) -> Result<Money<'a, Currency>, CheckoutError> {
        let total = self.cart.total()?;
        let tendered = self.tendered()?;
        let change = tendered.to_minor_units().saturating_sub(total.to_minor_units());

        Ok(Money::from_minor(change.max(0), self.cart.currency()))
    }

    /// Check if [`Checkout::pay`] would succeed.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the total or tender cannot be derived.
    pub fn can_pay(&self) -> Result<bool, CheckoutError> {
        let total = self.cart.total()?.to_minor_units();
        let tendered = self.tendered()?.to_minor_units();

        Ok(total > 0 && tendered >= total)
    }

    /// Settle the cart against the tender.
    ///
    /// On success the cart and tender are cleared. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NothingToPay`]: the total is zero.
    /// - [`CheckoutError::InsufficientPayment`]: the tender is below the total.
    /// - Any error deriving totals or building the receipt.
    #[tracing::instrument(skip(self), fields(lines = self.cart.len()))]
    pub fn pay(&mut self) -> Result<Payment<'a>, CheckoutError> {
        let currency = self.cart.currency();
        let total = self.cart.total()?;
        let tendered = self.tendered()?;

        if total.to_minor_units() <= 0 {
            warn!("rejected payment with nothing to pay");

            return Err(CheckoutError::NothingToPay);
        }

        if tendered.to_minor_units() < total.to_minor_units() {
            warn!(%total, %tendered, "rejected insufficient payment");

            return Err(CheckoutError::InsufficientPayment {
                total: Money::from_minor(total.to_minor_units(), currency),
                tendered,
            });
        }

        let change = tendered.sub(total)?;
        let receipt = Receipt::from_cart(&self.cart)?.settled(tendered, change);

        self.cart.clear();
        self.tender.clear();

        info!(%total, %tendered, %change, "payment accepted");

        Ok(Payment {
            receipt,
            tendered,
            change,
        })
    }

    /// Abandon the sale, emptying the cart and tender.
    pub fn cancel(&mut self) {
        self.cart.clear();
        self.tender.clear();

        info!("checkout cancelled");
    }
}
