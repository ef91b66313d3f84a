//! Fixtures

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    products::{Catalog, ProductError},
    sales::{SalesError, SalesJournal},
};

pub mod products;
pub mod sales;

pub use products::{parse_currency, parse_percentage, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A products file with no products has no currency
    #[error("Product fixture {0} has no products")]
    NoProducts(String),

    /// Product rejected by the catalog
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Sale rejected by the journal
    #[error(transparent)]
    Sales(#[from] SalesError),
}

/// Loads named fixture sets from a directory.
///
/// Products live at `<base>/products/<name>.yml` and sales at
/// `<base>/sales/<name>.yml`.
#[derive(Debug, Clone)]
pub struct Fixtures {
    base_path: PathBuf,
}

impl Fixtures {
    /// Fixtures under `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Fixtures under a custom directory
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the catalog rejects a product.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        let contents = self.read("products", name)?;
        let fixture: products::ProductsFixture = serde_norway::from_str(&contents)?;

        let catalog = fixture.into_catalog(name)?;

        debug!(name, products = catalog.len(), "loaded catalog fixture");

        Ok(catalog)
    }

    /// Load a sales journal.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the journal rejects a sale.
    pub fn load_journal(&self, name: &str) -> Result<SalesJournal<'static>, FixtureError> {
        let contents = self.read("sales", name)?;
        let fixture: sales::SalesFixture = serde_norway::from_str(&contents)?;

        let journal = fixture.into_journal()?;

        debug!(name, sales = journal.len(), "loaded sales fixture");

        Ok(journal)
    }

    fn read(&self, category: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn loads_bundled_catalog() -> TestResult {
        let catalog = Fixtures::new().load_catalog("basic")?;

        assert_eq!(catalog.currency(), IDR);
        assert!(catalog.get(&ProductId::from("kopi-susu")).is_some());

        Ok(())
    }

    #[test]
    fn loads_bundled_journal() -> TestResult {
        let journal = Fixtures::new().load_journal("basic")?;

        assert_eq!(journal.currency(), IDR);
        assert_eq!(journal.len(), 5);

        Ok(())
    }

    #[test]
    fn catalog_keeps_file_order() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "tiny",
            "products:\n  - id: teh\n    name: Teh Manis\n    price: 5000 IDR\n  - id: kopi\n    name: Kopi\n    price: 8000 IDR\n",
        )?;

        let catalog = Fixtures::with_base_path(dir.path()).load_catalog("tiny")?;
        let ids: Vec<&str> = catalog.iter().map(|p| p.id().as_str()).collect();

        assert_eq!(ids, vec!["teh", "kopi"]);

        Ok(())
    }

    #[test]
    fn duplicate_product_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "dupes",
            "products:\n  - id: teh\n    name: Teh\n    price: 5000 IDR\n  - id: teh\n    name: Teh Lagi\n    price: 6000 IDR\n",
        )?;

        let result = Fixtures::with_base_path(dir.path()).load_catalog("dupes");

        assert!(matches!(
            result,
            Err(FixtureError::Product(ProductError::Duplicate(_)))
        ));

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "products",
            "mixed",
            "products:\n  - id: teh\n    name: Teh\n    price: 5000 IDR\n  - id: tea\n    name: Tea\n    price: 2.50 GBP\n",
        )?;

        let result = Fixtures::with_base_path(dir.path()).load_catalog("mixed");

        assert!(matches!(
            result,
            Err(FixtureError::Product(ProductError::CurrencyMismatch(..)))
        ));

        Ok(())
    }

    #[test]
    fn empty_catalog_has_no_currency() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "products", "empty", "products: []\n")?;

        let result = Fixtures::with_base_path(dir.path()).load_catalog("empty");

        assert!(matches!(result, Err(FixtureError::NoProducts(name)) if name == "empty"));

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Fixtures::with_base_path("./does-not-exist").load_catalog("basic");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn malformed_yaml_is_yaml_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "sales", "broken", "currency: [IDR\n")?;

        let result = Fixtures::with_base_path(dir.path()).load_journal("broken");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));

        Ok(())
    }
}
