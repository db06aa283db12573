//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart_item;
pub mod coupon;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_review;
pub mod wishlist;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use coupon::{Column as CouponColumn, DiscountKind, Entity as Coupon, Model as CouponModel};
pub use order::{
    Address, Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus,
    PaymentStatus,
};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_review::{
    Column as ProductReviewColumn, Entity as ProductReview, Model as ProductReviewModel,
};
pub use wishlist::{Column as WishlistColumn, Entity as Wishlist, Model as WishlistModel};
