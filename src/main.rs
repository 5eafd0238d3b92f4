use std::sync::Arc;
use anyhow::Result;
use dotenv::dotenv;
use tokio::net::TcpListener;
use reqwest::Client as ReqwestClient;

mod api;
mod config;
mod services;
mod types;

use crate::api::routes::create_router;
use crate::config::Config;
use crate::services::client::HttpMarketSource;
use crate::services::refresh::Dashboard;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    dotenv().ok();
    let config = Config::from_env()?;

    let source = Arc::new(HttpMarketSource::new(ReqwestClient::new(), &config));

    let addr = config.bind_addr;
    let dashboard = Arc::new(Dashboard::new(source, config));

    // Load data once at boot, like the page does on first render.
    if let Err(e) = dashboard.start_run().await {
        tracing::error!("Failed to start initial aggregation: {}", e);
    }

    let app = create_router(dashboard);

    tracing::info!("Dashboard listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
