//! Shared test utilities for `Vitrine`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::config::store::StoreConfig;
use crate::core::cart::CartService;
use crate::core::notifications::Notifier;
use crate::core::wishlist::WishlistService;
use crate::entities::{DiscountKind, coupon, product, product_review};
use crate::errors::Result;
use crate::local_store::LocalStore;
use crate::session::Identity;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// The pool is capped at one connection: an in-memory `SQLite` database is
/// scoped to its connection, so a second pooled connection would see an
/// empty schema.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product with a generated description and placeholder
/// image.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    category: &str,
) -> Result<product::Model> {
    product::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        price: Set(price),
        image_url: Set("/placeholder.svg".to_string()),
        category: Set(category.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active test coupon with no minimum, no usage cap, and an
/// open-ended validity window starting yesterday.
pub async fn create_test_coupon(
    db: &DatabaseConnection,
    code: &str,
    kind: DiscountKind,
    value: f64,
) -> Result<coupon::Model> {
    create_custom_coupon(
        db,
        code,
        kind,
        value,
        0.0,
        None,
        Utc::now() - Duration::days(1),
        None,
        true,
    )
    .await
}

/// Creates a test coupon with full control over the validation inputs.
/// Use this when a test needs a specific window, cap, or minimum.
#[allow(clippy::too_many_arguments)]
pub async fn create_custom_coupon(
    db: &DatabaseConnection,
    code: &str,
    kind: DiscountKind,
    value: f64,
    minimum_order_amount: f64,
    usage_limit: Option<i32>,
    valid_from: DateTime<Utc>,
    valid_until: Option<DateTime<Utc>>,
    is_active: bool,
) -> Result<coupon::Model> {
    let now = Utc::now();
    coupon::ActiveModel {
        code: Set(code.to_uppercase()),
        name: Set(format!("{code} campaign")),
        description: Set(None),
        kind: Set(kind),
        value: Set(value),
        minimum_order_amount: Set(minimum_order_amount),
        usage_limit: Set(usage_limit),
        used_count: Set(0),
        is_active: Set(is_active),
        valid_from: Set(valid_from),
        valid_until: Set(valid_until),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an approved, unverified test review with no title or comment.
pub async fn create_test_review(
    db: &DatabaseConnection,
    product_id: i64,
    user_id: &str,
    rating: i32,
) -> Result<product_review::Model> {
    let now = Utc::now();
    product_review::ActiveModel {
        product_id: Set(product_id),
        user_id: Set(user_id.to_string()),
        rating: Set(rating),
        title: Set(None),
        comment: Set(None),
        is_verified_purchase: Set(false),
        is_approved: Set(true),
        helpful_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A fixed signed-in shopper for authenticated-mode tests.
pub fn test_identity() -> Identity {
    Identity {
        id: "user-1".to_string(),
        email: "shopper@example.com".to_string(),
        display_name: Some("Shopper".to_string()),
    }
}

/// A fresh notifier for asserting raised notifications.
pub fn test_notifier() -> Notifier {
    Notifier::new()
}

/// Store settings matching the shipped config.toml defaults.
pub fn test_store_config() -> StoreConfig {
    StoreConfig {
        name: "STG CATALOG".to_string(),
        whatsapp_number: "5511999999999".to_string(),
        local_data_dir: "data/local".to_string(),
    }
}

/// An anonymous cart service over a throwaway local-store directory.
/// Keep the returned directory alive for the duration of the test.
pub fn anonymous_cart(db: DatabaseConnection) -> (TempDir, CartService) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let cart = CartService::new(db, LocalStore::new(dir.path()), Notifier::new());
    (dir, cart)
}

/// An anonymous wishlist service over a throwaway local-store directory.
pub fn anonymous_wishlist(db: DatabaseConnection) -> (TempDir, WishlistService) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let wishlist = WishlistService::new(db, LocalStore::new(dir.path()), Notifier::new());
    (dir, wishlist)
}

/// A minimal shipping address for order tests.
pub fn test_address() -> crate::entities::Address {
    crate::entities::Address {
        street: "Rua das Flores, 123".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        postal_code: "01000-000".to_string(),
        country: "Brasil".to_string(),
    }
}
