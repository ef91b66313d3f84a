//! Store Config

use clap::Args;

use crate::receipt::StoreHeader;

/// Store details printed on receipts.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Store name
    #[arg(long, env = "KASIR_STORE_NAME", default_value = "Toko Kasir")]
    pub store_name: String,

    /// Store address
    #[arg(long, env = "KASIR_STORE_ADDRESS", default_value = "")]
    pub store_address: String,

    /// Store phone number
    #[arg(long, env = "KASIR_STORE_PHONE", default_value = "")]
    pub store_phone: String,

    /// Cashier on duty
    #[arg(long, env = "KASIR_CASHIER", default_value = "Admin")]
    pub cashier: String,
}

impl StoreConfig {
    /// Receipt header for this store
    #[must_use]
    pub fn header(&self) -> StoreHeader {
        StoreHeader {
            name: self.store_name.clone(),
            address: self.store_address.clone(),
            phone: self.store_phone.clone(),
            cashier: self.cashier.clone(),
        }
    }
}
