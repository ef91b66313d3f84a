//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use decimal_percentage::Percentage;
use jiff::civil::Date;

use crate::{fixtures::parse_percentage, sales::PaymentMethod};

pub mod logging;
pub mod store;

pub use logging::{LogFormat, LoggingConfig};
pub use store::StoreConfig;

/// Kasir point-of-sale CLI
#[derive(Debug, Parser)]
#[command(name = "kasir", about = "Point-of-sale cart, checkout and sales journal", long_about = None)]
pub struct Cli {
    /// Directory holding `products/` and `sales/` fixture sets
    #[arg(long, env = "KASIR_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Tax rate on the cart subtotal, as "10%" or "0.1"
    #[arg(long, env = "KASIR_TAX_RATE", default_value = "10%", value_parser = parse_percentage)]
    pub tax_rate: Percentage,

    /// Store details for receipts.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Kasir subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products
    Products(ProductsArgs),

    /// Ring up a sale, pay it and print the receipt
    Checkout(CheckoutArgs),

    /// Print the sales report for a day
    Sales(SalesArgs),
}

/// Arguments for `kasir products`
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Product fixture set
    #[arg(long, default_value = "basic")]
    pub catalog: String,

    /// Only products whose name contains this text
    #[arg(long)]
    pub search: Option<String>,
}

/// Arguments for `kasir checkout`
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Product fixture set
    #[arg(long, default_value = "basic")]
    pub catalog: String,

    /// Sales fixture set the sale is numbered after
    #[arg(long, default_value = "basic")]
    pub journal: String,

    /// Product to add; repeat to add more units
    #[arg(long = "add", value_name = "ID", required = true)]
    pub add: Vec<String>,

    /// Amount tendered in whole major units
    #[arg(long, conflicts_with = "exact")]
    pub pay: Option<u64>,

    /// Tender the exact total
    #[arg(long)]
    pub exact: bool,

    /// Payment method
    #[arg(long, value_enum, default_value_t)]
    pub method: PaymentMethod,

    /// Customer name
    #[arg(long, default_value = "Walk-in")]
    pub customer: String,
}

/// Arguments for `kasir sales`
#[derive(Debug, Args)]
pub struct SalesArgs {
    /// Sales fixture set
    #[arg(long, default_value = "basic")]
    pub journal: String,

    /// Business date, YYYY-MM-DD
    #[arg(long)]
    pub date: Date,

    /// Only sales whose invoice, customer, cashier or method contain this text
    #[arg(long, default_value = "")]
    pub search: String,
}
