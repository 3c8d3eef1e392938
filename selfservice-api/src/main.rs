use anyhow::Context;
use selfservice_api::{
    config::PortalConfig, handlers, logging, openshift::OpenshiftClient, shutdown, AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PortalConfig::load()?;

    let _log_guard = logging::init(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    config.validate()?;

    let client = OpenshiftClient::new(&config.openshift)
        .context("Failed to create OpenShift API client")?;
    info!("Using OpenShift API at {}", config.openshift.api_url);

    let state = Arc::new(AppState::new(Arc::new(client), &config));

    let app = handlers::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Self-service API listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
