//! Catalog seeding from the store configuration.
//!
//! Seeds the products and coupon campaigns defined in config.toml into the
//! database on startup. Seeding is idempotent: rows are matched by product
//! name / coupon code and only inserted when missing, so existing data
//! (including redemption counters) is left untouched.

use crate::config::store::AppConfig;
use crate::entities::{Coupon, Product, coupon, product};
use crate::errors::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, info};

/// Inserts the configured products and coupons that are not yet present.
pub async fn seed_catalog(db: &DatabaseConnection, config: &AppConfig) -> Result<()> {
    let mut seeded_products = 0;
    for entry in &config.products {
        let existing = Product::find()
            .filter(product::Column::Name.eq(&entry.name))
            .one(db)
            .await?;
        if existing.is_some() {
            debug!("Product '{}' already present, skipping", entry.name);
            continue;
        }

        product::ActiveModel {
            name: Set(entry.name.clone()),
            description: Set(entry.description.clone()),
            price: Set(entry.price),
            image_url: Set(entry.image_url.clone()),
            category: Set(entry.category.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        seeded_products += 1;
    }

    let mut seeded_coupons = 0;
    for entry in &config.coupons {
        let code = entry.code.to_uppercase();
        let existing = Coupon::find()
            .filter(coupon::Column::Code.eq(&code))
            .one(db)
            .await?;
        if existing.is_some() {
            debug!("Coupon '{code}' already present, skipping");
            continue;
        }

        let now = Utc::now();
        coupon::ActiveModel {
            code: Set(code),
            name: Set(entry.name.clone()),
            description: Set(None),
            kind: Set(entry.kind),
            value: Set(entry.value),
            minimum_order_amount: Set(entry.minimum_order_amount),
            usage_limit: Set(entry.usage_limit),
            used_count: Set(0),
            is_active: Set(true),
            valid_from: Set(now),
            valid_until: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        seeded_coupons += 1;
    }

    info!("Seeded {seeded_products} products and {seeded_coupons} coupons");
    Ok(())
}
