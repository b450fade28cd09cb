use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use stock_selector::server::router;
use stock_selector::settings::Settings;

fn init_logging(default_filter: &str) {
    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init_logging(&settings.log.filter);
    let catalog = Arc::new(settings.filter_catalog()?);
    info!(dimensions = catalog.dimensions.len(), primary = %catalog.primary_table, "filter catalog ready");

    let listener = tokio::net::TcpListener::bind(&settings.server.address).await?;
    info!(address = %settings.server.address, "stock selector listening");
    axum::serve(listener, router(catalog)).await?;
    Ok(())
}
