//! Database configuration module for `Vitrine`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{
    CartItem, Coupon, Order, OrderItem, Product, ProductReview, Wishlist, cart_item,
    product_review, wishlist,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/vitrine.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, so the database schema matches the Rust struct definitions.
/// It also creates the unique indexes backing the one-row-per-owner-and-product invariants
/// (cart lines, wishlist entries) and the one-review-per-product-and-user upsert key.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    for mut table in [
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(CartItem),
        schema.create_table_from_entity(Wishlist),
        schema.create_table_from_entity(Coupon),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderItem),
        schema.create_table_from_entity(ProductReview),
    ] {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    for index in [
        unique_index(
            "idx_unique_cart_item_user_product",
            CartItem,
            [cart_item::Column::UserId, cart_item::Column::ProductId],
        ),
        unique_index(
            "idx_unique_wishlist_user_product",
            Wishlist,
            [wishlist::Column::UserId, wishlist::Column::ProductId],
        ),
        unique_index(
            "idx_unique_review_product_user",
            ProductReview,
            [
                product_review::Column::ProductId,
                product_review::Column::UserId,
            ],
        ),
    ] {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

fn unique_index<E, C>(name: &str, table: E, columns: [C; 2]) -> IndexCreateStatement
where
    E: EntityTrait,
    C: sea_orm::ColumnTrait,
{
    let mut index = Index::create();
    index.name(name).table(table).unique().if_not_exists();
    for column in columns {
        index.col(column);
    }
    index.to_owned()
}
