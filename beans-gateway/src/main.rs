//! Beans Pipeline Gateway
//!
//! HTTP front door for the beans training pipeline. Each request submits one
//! pipeline job to the managed pipeline service and waits until the job is
//! running or has failed before answering.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod repository;
pub mod service;

use crate::config::Config;
use crate::repository::VertexConnector;
use crate::service::{PipelineRunner, TokioSleeper};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beans_gateway=debug,beans_client=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Beans Pipeline Gateway...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    info!(
        "Loaded configuration: poll_interval={:?}, max_poll_attempts={}, endpoint={}",
        config.poll_interval,
        config.max_poll_attempts,
        config
            .aiplatform_endpoint
            .as_deref()
            .unwrap_or("regional")
    );

    let runner = PipelineRunner::new(
        Arc::new(VertexConnector::new(config.aiplatform_endpoint.clone())),
        Arc::new(TokioSleeper),
        config.poll_settings(),
    );

    // Build router with all API endpoints
    let app = api::create_router(Arc::new(runner));

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
