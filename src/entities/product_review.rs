//! Product review entity - A shopper's rating of a product.
//!
//! There is at most one review per (product, user) pair; resubmitting
//! overwrites the earlier review via upsert. `helpful_count` only ever
//! grows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product review database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_reviews")]
pub struct Model {
    /// Unique identifier for the review
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The reviewed product
    pub product_id: i64,
    /// Identity id of the reviewer
    pub user_id: String,
    /// Star rating from 1 to 5
    pub rating: i32,
    /// Optional short headline
    pub title: Option<String>,
    /// Optional free-form review body
    pub comment: Option<String>,
    /// Whether the reviewer bought the product through this store
    pub is_verified_purchase: bool,
    /// Whether the review passed moderation and is shown to shoppers
    pub is_approved: bool,
    /// How many shoppers marked the review as helpful
    pub helpful_count: i32,
    /// When the review was first submitted
    pub created_at: DateTimeUtc,
    /// When the review was last edited
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between ProductReview and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each review refers to one product
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
