//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, IDR, MYR, SGD, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::minor_per_major,
    products::{Catalog, Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

impl ProductsFixture {
    /// Build a catalog in the currency of the first product.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has no products, a price is malformed,
    /// or the catalog rejects a product.
    pub fn into_catalog(self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        let Some(first) = self.products.first() else {
            return Err(FixtureError::NoProducts(name.to_string()));
        };

        let (_minor_units, currency) = parse_price(&first.price)?;
        let mut catalog = Catalog::new(currency);

        for product_fixture in self.products {
            catalog.insert(product_fixture.try_into()?)?;
        }

        Ok(catalog)
    }
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price (e.g., "10000 IDR")
    pub price: String,
}

impl TryFrom<ProductFixture> for Product<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product::new(
            fixture.id,
            fixture.name,
            Money::from_minor(minor_units, currency),
        )?)
    }
}

/// Parse a price string (e.g., "10000 IDR" or "2.99 GBP") into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    let per_major =
        minor_per_major(currency).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(per_major))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Look up a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "IDR" => Ok(IDR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "SGD" => Ok(SGD),
        "MYR" => Ok(MYR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse percentage string (e.g., "10%" or "0.1") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "10%" for 10%
/// - Decimal format: "0.1" for 10%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the value is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .ok()
            .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
    } else {
        trimmed.parse::<Decimal>().ok()
    };

    match fraction {
        Some(fraction) if !fraction.is_sign_negative() => Ok(Percentage::from(fraction)),
        _ => Err(FixtureError::InvalidPercentage(s.to_string())),
    }
}
