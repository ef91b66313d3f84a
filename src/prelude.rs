//! Kasir prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartTotals, default_tax_rate},
    checkout::{Checkout, CheckoutError, Payment, QUICK_AMOUNTS, Tender, TenderError, TenderKey},
    discounts::{DiscountRule, NoDiscount},
    fixtures::{FixtureError, Fixtures},
    pricing::PricingError,
    products::{Catalog, Product, ProductError, ProductId, ProductKey},
    receipt::{Receipt, ReceiptError, StoreHeader},
    sales::{
        PaymentMethod, SaleContext, SaleRecord, SaleStatus, SalesError, SalesJournal, SalesQuery,
        SalesReport, SalesSummary,
    },
};
