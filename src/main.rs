//! Travel companion server entry point.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use travel_companion::adapters::ai::{GeminiConfig, GeminiOracle};
use travel_companion::adapters::catalog::{MockFlightCatalog, MockHotelCatalog};
use travel_companion::adapters::http::api_routes;
use travel_companion::adapters::storage::{FileSessionStore, InMemorySessionStore};
use travel_companion::application::TurnOrchestrator;
use travel_companion::config::{AppConfig, StorageBackend};
use travel_companion::domain::booking::{flight_spec, hotel_spec, BookingFlowEngine};
use travel_companion::domain::routing::DomainRouter;
use travel_companion::ports::{ExtractionOracle, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "starting travel companion server"
    );

    let oracle: Arc<dyn ExtractionOracle> = Arc::new(GeminiOracle::new(
        GeminiConfig::new(config.ai.gemini_api_key.clone().unwrap_or_default())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?);

    let store: Arc<dyn SessionStore> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("using in-memory session store");
            Arc::new(InMemorySessionStore::new())
        }
        StorageBackend::File => {
            info!(data_dir = %config.storage.data_dir, "using file session store");
            Arc::new(FileSessionStore::new(&config.storage.data_dir).await?)
        }
    };

    let orchestrator = Arc::new(
        TurnOrchestrator::new(
            store,
            DomainRouter::new(oracle.clone()),
            BookingFlowEngine::new(flight_spec(), oracle.clone(), Arc::new(MockFlightCatalog::new())),
            BookingFlowEngine::new(hotel_spec(), oracle, Arc::new(MockHotelCatalog::new())),
        )
        .with_turn_timeout(Duration::from_secs(config.server.request_timeout_secs)),
    );

    let app = api_routes(orchestrator)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr()?;
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
