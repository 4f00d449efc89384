//! Verdant Server - HTTP API for the plant care companion
//!
//! A thin HTTP layer over `verdant-core`: handlers translate between the
//! wire contract and the service layer, and the binary wires the store,
//! the push dispatcher, and the reminder sweep together at startup.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use verdant_core::adapters::{
    DisabledDispatcher, FcmDispatcher, MemoryRepository, MongoRepository,
};
use verdant_core::ports::{PushDispatcher, Repository};
use verdant_core::VerdantContext;

use auth::TokenAuthority;
use config::{Config, StoreKind};
use state::AppState;

pub async fn serve() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    error::expose_error_detail(config.expose_errors());

    let repository: Arc<dyn Repository> = match config.store {
        StoreKind::Mongo => Arc::new(
            MongoRepository::connect(&config.mongo_uri, &config.mongo_db).await?,
        ),
        StoreKind::Memory => {
            warn!("using the in-memory store; data is lost on restart");
            Arc::new(MemoryRepository::new())
        }
    };

    let dispatcher: Arc<dyn PushDispatcher> = match &config.fcm_server_key {
        Some(key) => Arc::new(FcmDispatcher::new(key.clone())?),
        None => {
            warn!("FCM_SERVER_KEY not set; push delivery is disabled");
            Arc::new(DisabledDispatcher)
        }
    };

    let core = Arc::new(VerdantContext::new(repository, dispatcher));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep_handle = core
        .sweep
        .spawn(Duration::from_secs(config.sweep_interval_secs), shutdown_rx);
    info!(
        interval_secs = config.sweep_interval_secs,
        "reminder sweep scheduled"
    );

    let authority = TokenAuthority::new(&config.jwt_secret, config.token_ttl_days);
    let port = config.port;
    let state = AppState {
        core,
        auth: Arc::new(authority),
        config: Arc::new(config),
    };
    let app = routes::build_router(state);

    let address = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the sweep before the process exits so no tick runs against a
    // half-closed store.
    let _ = shutdown_tx.send(true);
    sweep_handle.await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
