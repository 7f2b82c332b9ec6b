use std::sync::Arc;

use kube::Client;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use db_console::api::{AppState, router};
use db_console::config::ConsoleConfig;
use db_console::health::HealthState;
use db_console::platform::{KubeClusterOps, QuotaStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("db_console=info".parse()?)
                .add_directive("kube=info".parse()?),
        )
        .init();

    info!("Starting db-console");

    let config = ConsoleConfig::from_env();
    info!(
        namespace = %config.namespace,
        bind_addr = %config.bind_addr,
        "Loaded configuration"
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let health = Arc::new(HealthState::new());

    let state = Arc::new(AppState {
        platform: Arc::new(KubeClusterOps::new(client)),
        quota: QuotaStore::new(),
        config: config.clone(),
        health: health.clone(),
    });

    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Console listening on {}", config.bind_addr);

    health.set_ready(true).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Console stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
