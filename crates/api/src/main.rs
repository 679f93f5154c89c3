//! Scribe Quest API Server

use engine::{Gamification, GamificationService, ServiceConfig};
use std::sync::Arc;
use store::StateStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("store=debug".parse()?)
                .add_directive("engine=debug".parse()?)
                .add_directive("api=debug".parse()?),
        )
        .init();

    info!("✍️ Starting Scribe Quest API");

    // Load configuration
    let config = common::Config::from_env();
    config.validate()?;

    // Open storage and restore saved progress
    let kv = store::open_file_store(&config.data_dir)?;
    let state_store = StateStore::new(kv)
        .with_key(config.storage_key.clone())
        .with_max_bytes(config.max_state_bytes);
    let controller = Gamification::init(state_store);

    let service_config = ServiceConfig {
        toast_ttl: config.toast_ttl(),
        ..ServiceConfig::default()
    };
    let handle = GamificationService::spawn(controller, service_config);
    match config.toast_ttl() {
        Some(ttl) => info!("🔔 Toasts auto-dismiss after {:?}", ttl),
        None => info!("🔔 Toast auto-dismiss disabled (TOAST_TTL_SECS=0)"),
    }

    // Create app state
    let state = Arc::new(AppState::new(handle));

    let app = routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
