//! Store configuration loading from config.toml
//!
//! This module loads the storefront settings (store name, business WhatsApp
//! number, local data directory) together with the product catalog and
//! coupon campaigns used to seed the database on first run.

use crate::entities::DiscountKind;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Storefront settings
    pub store: StoreConfig,
    /// Products to seed the catalog with
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    /// Coupon campaigns to seed
    #[serde(default)]
    pub coupons: Vec<CouponConfig>,
}

/// Storefront settings
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Store name used in notifications and the checkout message
    pub name: String,
    /// Business WhatsApp number in international format, digits only
    pub whatsapp_number: String,
    /// Directory for anonymous-session data (cart, wishlist, search history)
    #[serde(default = "default_local_data_dir")]
    pub local_data_dir: String,
}

fn default_local_data_dir() -> String {
    "data/local".to_string()
}

/// Configuration for a single seeded product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Product name, unique within the seed set
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price in BRL
    pub price: f64,
    /// Image URL
    #[serde(default)]
    pub image_url: String,
    /// Catalog category
    pub category: String,
}

/// Configuration for a single seeded coupon campaign
#[derive(Debug, Deserialize, Clone)]
pub struct CouponConfig {
    /// Redemption code; stored uppercase
    pub code: String,
    /// Campaign name
    pub name: String,
    /// Discount computation kind
    pub kind: DiscountKind,
    /// Percentage or fixed amount, depending on `kind`
    pub value: f64,
    /// Smallest order subtotal the coupon applies to
    #[serde(default)]
    pub minimum_order_amount: f64,
    /// Maximum number of redemptions
    #[serde(default)]
    pub usage_limit: Option<i32>,
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration from the default location
/// (./config.toml)
pub fn load_app_configuration() -> Result<AppConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_store_config() {
        let toml_str = r#"
            [store]
            name = "STG CATALOG"
            whatsapp_number = "5511999999999"

            [[products]]
            name = "Red Shoe"
            description = "A red shoe"
            price = 50.0
            category = "Shoes"

            [[coupons]]
            code = "WELCOME10"
            name = "Welcome discount"
            kind = "percentage"
            value = 10.0
            minimum_order_amount = 50.0
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.name, "STG CATALOG");
        assert_eq!(config.store.local_data_dir, "data/local");
        assert_eq!(config.products.len(), 1);
        assert_eq!(config.products[0].price, 50.0);
        assert_eq!(config.coupons.len(), 1);
        assert_eq!(config.coupons[0].kind, DiscountKind::Percentage);
        assert!(config.coupons[0].usage_limit.is_none());
    }

    #[test]
    fn test_parse_all_discount_kinds() {
        for (kind, expected) in [
            ("percentage", DiscountKind::Percentage),
            ("fixed_amount", DiscountKind::FixedAmount),
            ("free_shipping", DiscountKind::FreeShipping),
        ] {
            let toml_str = format!(
                r#"
                [store]
                name = "Store"
                whatsapp_number = "5511999999999"

                [[coupons]]
                code = "CODE"
                name = "Campaign"
                kind = "{kind}"
                value = 1.0
                "#
            );
            let config: AppConfig = toml::from_str(&toml_str).unwrap();
            assert_eq!(config.coupons[0].kind, expected);
        }
    }

    #[test]
    fn test_missing_store_section_is_an_error() {
        let parsed: std::result::Result<AppConfig, _> = toml::from_str("[[products]]");
        assert!(parsed.is_err());
    }
}
