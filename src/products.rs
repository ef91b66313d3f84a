//! Products

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Catalog storage key
    pub struct ProductKey;
}

/// Errors related to products and the catalog.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// A product was priced below zero.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product with the same identifier is already in the catalog.
    #[error("Product {0} already exists in the catalog")]
    Duplicate(ProductId),

    /// A product's currency differs from the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// Backend identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Snapshot of a product as handed to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    id: ProductId,
    name: String,
    price: Money<'a, Currency>,
}

impl<'a> Product<'a> {
    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NegativePrice`] if the price is below zero.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, ProductError> {
        let id = id.into();

        if price.to_minor_units() < 0 {
            return Err(ProductError::NegativePrice(id));
        }

        Ok(Self {
            id,
            name: name.into(),
            price,
        })
    }

    /// Product identifier
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }
}

/// In-memory product catalog for a single currency.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    ids: FxHashMap<ProductId, ProductKey>,
    order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the identifier is taken or the currency differs.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, ProductError> {
        if self.ids.contains_key(product.id()) {
            return Err(ProductError::Duplicate(product.id().clone()));
        }

        let product_currency = product.price().currency();

        if product_currency != self.currency {
            return Err(ProductError::CurrencyMismatch(
                product.id().clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let id = product.id().clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Lookup a product by its identifier.
    pub fn get(&self, id: &ProductId) -> Option<&Product<'a>> {
        self.ids.get(id).and_then(|key| self.products.get(*key))
    }

    /// Iterate over products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Products whose name contains the query, ignoring case.
    ///
    /// An empty (or whitespace-only) query matches everything.
    pub fn search<'s>(&'s self, query: &str) -> impl Iterator<Item = &'s Product<'a>> + 's {
        let needle = query.trim().to_lowercase();

        self.iter()
            .filter(move |product| product.name().to_lowercase().contains(&needle))
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency of every product in the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
