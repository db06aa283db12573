//! Order entity - A checkout submission and its lifecycle status.
//!
//! The storefront creates orders and later patches their status; all other
//! transitions (payment, fulfilment) happen in external processing. Line
//! items live in the `order_items` table and are immutable once written.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfilment status of an order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, awaiting confirmation
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed by the store
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Being prepared
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Handed to the carrier
    #[sea_orm(string_value = "shipped")]
    Shipped,
    /// Received by the customer
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Cancelled before delivery
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Payment state of an order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment not yet settled
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payment received
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Payment attempt failed
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Payment returned to the customer
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// Shipping or billing address captured at checkout, stored as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Address {
    /// Street and number
    pub street: String,
    /// City name
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub postal_code: String,
    /// Country name
    pub country: String,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity id of the customer
    pub user_id: String,
    /// Current fulfilment status
    pub status: OrderStatus,
    /// Grand total: item totals minus discount plus shipping
    pub total_amount: f64,
    /// Discount applied from a coupon, zero when none
    pub discount_amount: f64,
    /// Shipping cost charged for this order
    pub shipping_cost: f64,
    /// Coupon code redeemed against this order, if any
    pub coupon_code: Option<String>,
    /// Where the order ships to
    #[sea_orm(column_type = "Json")]
    pub shipping_address: Address,
    /// Billing address when it differs from the shipping one
    #[sea_orm(column_type = "Json", nullable)]
    pub billing_address: Option<Address>,
    /// Payment method chosen by the customer
    pub payment_method: Option<String>,
    /// Current payment state
    pub payment_status: PaymentStatus,
    /// Free-form customer notes
    pub notes: Option<String>,
    /// When the order was submitted
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
