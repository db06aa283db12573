//! Unified error types and result handling for the storefront.

use thiserror::Error;

/// Crate-wide error type covering configuration, persistence, and
/// storefront domain failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing, unreadable, or malformed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// Any failure reported by the database layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure, e.g. while touching the local store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or invalid.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization failure in the local store.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An operation that requires a signed-in shopper was called
    /// without one.
    #[error("User is not authenticated")]
    NotAuthenticated,

    /// A product id did not resolve to a catalog row.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The product id that was looked up
        id: i64,
    },

    /// An order id did not resolve to an order row.
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// The order id that was looked up
        id: i64,
    },

    /// A review id did not resolve to a review row.
    #[error("Review not found: {id}")]
    ReviewNotFound {
        /// The review id that was looked up
        id: i64,
    },

    /// User-supplied input failed validation.
    #[error("Invalid input: {message}")]
    Validation {
        /// Why the input was rejected
        message: String,
    },
}

// Convenience `Result` type
/// Shorthand for `Result<T, Error>` used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
