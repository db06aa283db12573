/// Database configuration and connection management
pub mod database;

/// Database seeding from the store configuration
pub mod seed;

/// Store settings and seed catalog loading from config.toml
pub mod store;

pub use store::{AppConfig, load_app_configuration};
