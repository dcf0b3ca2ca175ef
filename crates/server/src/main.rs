//! Model Server - serves the linear regression and random forest models
//!
//! Loads both model artifacts once at startup and exposes them over HTTP
//! together with a liveness probe and Prometheus metrics.

use anyhow::{Context, Result};
use model_server::{api, config};
use serving_lib::{ModelRegistry, PredictionService, ServingMetrics, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting model-server");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(
        instance = %config.instance_name,
        linear_regression_model = %config.linear_regression_model.display(),
        random_forest_model = %config.random_forest_model.display(),
        "Server configured"
    );

    let logger = StructuredLogger::new(&config.instance_name);

    // Load models; failures leave the slot unavailable but never stop startup
    let registry = Arc::new(ModelRegistry::load(&config.model_paths(), &logger));

    let metrics = ServingMetrics::new();
    for (model, available) in registry.availability() {
        metrics.set_model_available(model, available);
    }

    let service = PredictionService::new(Arc::clone(&registry), logger.clone());
    let app_state = Arc::new(api::AppState::new(service));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    logger.log_startup(SERVER_VERSION, &addr, registry.available_count());

    let shutdown_logger = logger.clone();
    api::serve(listener, app_state, async move {
        let reason = shutdown_signal().await;
        shutdown_logger.log_shutdown(reason);
    })
    .await?;

    info!("Shut down");
    Ok(())
}

/// Wait for Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT received",
        _ = terminate => "SIGTERM received",
    }
}
