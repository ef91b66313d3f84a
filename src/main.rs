//! Kasir CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use jiff::Zoned;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use tracing::debug;

use kasir::{
    cart::Cart,
    checkout::Checkout,
    config::{CheckoutArgs, Cli, Command, ProductsArgs, SalesArgs},
    fixtures::Fixtures,
    logging,
    products::ProductId,
    receipt::Receipt,
    sales::{SaleContext, SalesQuery},
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the operator, not the log stream"
            )]
            {
                eprintln!("Error: {error:#}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    logging::init(&cli.logging).context("failed to initialise logging")?;

    let fixtures = Fixtures::with_base_path(&cli.fixtures);

    debug!(fixtures = %cli.fixtures.display(), "starting");

    match &cli.command {
        Command::Products(args) => products(&fixtures, args),
        Command::Checkout(args) => checkout(cli, &fixtures, args),
        Command::Sales(args) => sales(&fixtures, args),
    }
}

fn products(fixtures: &Fixtures, args: &ProductsArgs) -> anyhow::Result<()> {
    let catalog = fixtures.load_catalog(&args.catalog)?;

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price"]);

    for product in catalog.search(args.search.as_deref().unwrap_or_default()) {
        builder.push_record([
            product.id().to_string(),
            product.name().to_string(),
            product.price().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(io::stdout().lock(), "{table}")?;

    Ok(())
}

fn checkout(cli: &Cli, fixtures: &Fixtures, args: &CheckoutArgs) -> anyhow::Result<()> {
    let catalog = fixtures.load_catalog(&args.catalog)?;
    let cart = Cart::new(catalog.currency()).with_tax_rate(cli.tax_rate);
    let mut checkout = Checkout::new(cart);

    for id in &args.add {
        let product = catalog
            .get(&ProductId::from(id.as_str()))
            .with_context(|| format!("unknown product {id} in catalog {}", args.catalog))?;

        checkout.cart_mut().add_item(product)?;
    }

    let header = cli.store.header();
    let mut out = io::stdout().lock();

    if args.exact {
        checkout.tender_exact()?;
    } else if let Some(amount) = args.pay {
        checkout.tender_mut().set_amount(amount)?;
    } else {
        Receipt::from_cart(checkout.cart())?.write_to(&mut out, &header)?;

        return Ok(());
    }

    let mut journal = fixtures.load_journal(&args.journal)?;
    let payment = checkout.pay()?;

    let context = SaleContext {
        payment_method: args.method,
        cashier: cli.store.cashier.clone(),
        customer: args.customer.clone(),
    };
    let record = journal.record_payment(&payment, context, Zoned::now().datetime())?;

    writeln!(out, " {} ({})", record.invoice, record.payment_method)?;
    payment.receipt().write_to(&mut out, &header)?;

    Ok(())
}

fn sales(fixtures: &Fixtures, args: &SalesArgs) -> anyhow::Result<()> {
    let journal = fixtures.load_journal(&args.journal)?;
    let query = SalesQuery::on(args.date).with_search(args.search.as_str());

    journal.report(&query)?.write_to(io::stdout().lock())?;

    Ok(())
}
