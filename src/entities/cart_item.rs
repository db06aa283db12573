//! Cart item entity - A single line of a signed-in shopper's cart.
//!
//! There is at most one row per (user, product); adding the same product
//! again increments the quantity of the existing row. A quantity of zero or
//! less is never persisted - such updates delete the row instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity id of the owning shopper
    pub user_id: String,
    /// The product this line refers to
    pub product_id: i64,
    /// Number of units, always at least one
    pub quantity: i32,
}

/// Defines relationships between CartItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart line belongs to one product
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
