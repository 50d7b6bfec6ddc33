use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotel_booking_api::{
    api::{create_router, AppState},
    config::Config,
    recommender::{Catalog, RecommenderHandle},
    services::auth,
    store::Store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_booking_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Build the recommender; a bad catalog is fatal
    let catalog = Catalog::from_path(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;
    let recommender = RecommenderHandle::build(catalog).context("Failed to build recommender")?;
    tracing::info!(
        catalog_size = recommender.current().len(),
        "Recommender ready"
    );

    // Initialize storage and the optional admin account
    let store = Store::in_memory();
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let admin = auth::seed_admin(&store, email, password)
            .await
            .context("Failed to seed admin account")?;
        tracing::info!(admin_id = %admin.id, "Admin account ready");
    }

    let address = config.bind_address();
    let state = AppState::new(store, recommender, config);
    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
