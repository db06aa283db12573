//! Coupon entity - A discount code redeemable at checkout.
//!
//! Coupons are created and deactivated server-side. The storefront only
//! reads them during validation and increments `used_count` when a coupon
//! is applied to an order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a coupon's `value` is turned into a discount amount.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is a percentage of the order subtotal
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// `value` is an absolute amount, clamped to the order subtotal
    #[sea_orm(string_value = "fixed_amount")]
    FixedAmount,
    /// Waives the shipping cost; the subtotal discount is zero
    #[sea_orm(string_value = "free_shipping")]
    FreeShipping,
}

/// Coupon database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    /// Unique identifier for the coupon
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Redemption code, stored uppercase and matched case-insensitively
    #[sea_orm(unique)]
    pub code: String,
    /// Human-readable campaign name
    pub name: String,
    /// Optional longer description shown to shoppers
    pub description: Option<String>,
    /// Discount computation kind
    pub kind: DiscountKind,
    /// Percentage or fixed amount, depending on `kind`
    pub value: f64,
    /// Smallest order subtotal the coupon applies to
    pub minimum_order_amount: f64,
    /// Maximum number of redemptions, unlimited when absent
    pub usage_limit: Option<i32>,
    /// Redemptions so far
    pub used_count: i32,
    /// Whether the coupon can currently be matched at all
    pub is_active: bool,
    /// Start of the validity window
    pub valid_from: DateTimeUtc,
    /// End of the validity window, open-ended when absent
    pub valid_until: Option<DateTimeUtc>,
    /// When the coupon was created
    pub created_at: DateTimeUtc,
    /// When the coupon was last modified
    pub updated_at: DateTimeUtc,
}

/// Coupons have no relationships to other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
