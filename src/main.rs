//! Storefront bootstrap binary.
//!
//! Prepares the backing store for the storefront services: initializes
//! tracing, loads configuration, connects to the database, creates the
//! schema, seeds the configured catalog, and reports what the store
//! offers.

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vitrine::config;
use vitrine::core::catalog::Catalog;
use vitrine::core::coupon::CouponService;
use vitrine::core::notifications::Notifier;
use vitrine::errors::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the configured catalog (if necessary)
    config::seed::seed_catalog(&db, &app_config)
        .await
        .inspect(|_| info!("Catalog seeded successfully."))
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Bring up the storefront services and report
    let notifier = Notifier::new();
    let mut catalog = Catalog::new(db.clone());
    catalog.load_products().await?;
    let mut coupons = CouponService::new(db, notifier);
    coupons.load_coupons().await?;

    info!(
        "{} is ready: {} products across {} categories, {} active coupons",
        app_config.store.name,
        catalog.products().len(),
        catalog.categories().len(),
        coupons.coupons().len()
    );

    Ok(())
}
