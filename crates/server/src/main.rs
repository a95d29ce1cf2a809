use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediabatch_core::{
    create_session_controller, load_config, resolve_config_path, validate_config,
    BatchOrchestrator, Converter, ExportManager, FfmpegConverter, FsCopier,
};
use mediabatch_server::api::create_router;
use mediabatch_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for the session command channel
const SESSION_BUFFER_SIZE: usize = 64;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("mediabatch {}", VERSION);

    let config_path = resolve_config_path();
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // The engine is checked again at the start of every run; a missing
    // binary here only warns so the API stays reachable.
    let converter = Arc::new(FfmpegConverter::new(config.converter.clone()));
    match converter.validate().await {
        Ok(()) => info!("Using converter: {}", converter.name()),
        Err(e) => warn!("Converter unavailable: {}", e),
    }

    let orchestrator = Arc::new(BatchOrchestrator::new(
        config.orchestrator.clone(),
        converter,
    ));
    let exporter = ExportManager::new(
        config.export.clone(),
        Arc::new(FsCopier::new(config.export.clone())),
    );

    let (session, controller) =
        create_session_controller(orchestrator, exporter, SESSION_BUFFER_SIZE);
    let controller_handle = tokio::spawn(controller.run());
    info!("Session controller started");

    let state = Arc::new(AppState::new(config.clone(), session));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router owned the last session handles; the controller exits once
    // they are gone.
    info!("Server shutting down...");
    let _ = controller_handle.await;
    info!("Session controller stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
