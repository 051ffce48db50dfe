//! FF1000 HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use ff1000::catalog::{CatalogLoader, JsonLinesLoader};
use ff1000::config::{BayesianConfig, Config};
use ff1000::context::ScoringContext;
use ff1000_server::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;
    let bayesian = BayesianConfig::from_env()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        lambda = bayesian.lambda,
        sigma2 = bayesian.sigma2,
        z = bayesian.z,
        "FF1000 starting"
    );

    let loader = JsonLinesLoader::new(config.require_catalog_path()?.clone())
        .with_expected_dim(config.embedding_dim);
    let catalog = tokio::task::spawn_blocking(move || loader.load()).await??;

    let context = Arc::new(ScoringContext::new(catalog, bayesian)?);
    tracing::info!(
        items = context.catalog().len(),
        dim = context.catalog().dim(),
        "Scoring context ready"
    );

    let app = create_router_with_state(HandlerState::new(context)?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("FF1000 shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
