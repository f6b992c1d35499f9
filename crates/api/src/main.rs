use std::sync::Arc;

use anyhow::Context;

use dscommerce_api::{app, ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dscommerce_observability::init();

    let config = ApiConfig::from_env().context("invalid API configuration")?;
    let services = app::services::build_services(&config).await?;
    let router = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, persistent = config.use_persistent_stores, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}
