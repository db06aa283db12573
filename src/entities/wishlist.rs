//! Wishlist entity - A product saved for later by a signed-in shopper.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wishlist database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlists")]
pub struct Model {
    /// Unique identifier for the wishlist entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity id of the owning shopper
    pub user_id: String,
    /// The saved product
    pub product_id: i64,
    /// When the product was saved
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Wishlist and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each wishlist entry refers to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
