//! Kasir
//!
//! Kasir is a point-of-sale cart ledger: a catalog of products, a cart that
//! derives subtotal, tax, discount and total from its lines, a checkout that
//! settles the cart against a tender, and a sales journal for daily reports.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod sales;
