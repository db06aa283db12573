//! Order item entity - One immutable line of a placed order.
//!
//! `total_price` is `unit_price` times `quantity`, computed by the caller
//! at checkout time from the cart snapshot. Lines are written once with
//! their order and never mutated afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier for the order line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The order this line belongs to
    pub order_id: i64,
    /// The product that was purchased
    pub product_id: i64,
    /// Number of units purchased
    pub quantity: i32,
    /// Price of one unit at the time of purchase
    pub unit_price: f64,
    /// `unit_price * quantity`
    pub total_price: f64,
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// Each line refers to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
