//! Product entity - Represents a catalog item.
//!
//! Products are created and maintained server-side; the storefront treats
//! them as read-only. Cart and wishlist entries hold value copies of the
//! product at the time it was added, so later price changes are not
//! reflected in existing entries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name shown in the catalog
    pub name: String,
    /// Longer description, searched together with the name
    pub description: String,
    /// Unit price in BRL
    pub price: f64,
    /// URL of the main product image
    pub image_url: String,
    /// Category used for catalog filtering (e.g., "Eletrônicos")
    pub category: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many cart lines
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One product appears in many wishlists
    #[sea_orm(has_many = "super::wishlist::Entity")]
    Wishlists,
    /// One product appears in many order lines
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    /// One product has many reviews
    #[sea_orm(has_many = "super::product_review::Entity")]
    Reviews,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::wishlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wishlists.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::product_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
