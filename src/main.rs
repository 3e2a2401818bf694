//! Lotserver - Parking Lot Control Server
//!
//! Main entry point.

use lotserver::{
    allocation_engine::AllocationEngine,
    event_log_service::EventLogService,
    space_inventory::SpaceInventory,
    state::{AppConfig, AppState},
    web_api,
    whitelist_registry::WhitelistRegistry,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lotserver=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lotserver v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        host = %config.host,
        port = config.port,
        normal_spaces = config.normal_spaces,
        package_spaces = config.package_spaces,
        "Configuration loaded"
    );

    // Seed the fixed space pool
    let inventory = SpaceInventory::seed(config.normal_spaces, config.package_spaces);
    tracing::info!(
        total = config.normal_spaces + config.package_spaces,
        "Space inventory seeded"
    );

    // Initialize components
    let whitelist = Arc::new(WhitelistRegistry::new());
    let event_log = Arc::new(EventLogService::new());
    let engine = Arc::new(AllocationEngine::new(
        inventory,
        whitelist.clone(),
        event_log.clone(),
    ));
    tracing::info!("AllocationEngine initialized");

    // Create application state
    let state = AppState {
        config: config.clone(),
        engine,
        whitelist,
        event_log,
    };

    let app = web_api::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
