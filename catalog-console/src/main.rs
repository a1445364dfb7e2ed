//! Catalog console - terminal admin client for the product catalog
//!
//! Three views over the catalog-client controllers: the paginated /
//! searchable product list, and one form screen shared by the create
//! and edit flows. All remote work runs in spawned tasks; the event
//! loop stays interactive throughout.

mod app;
mod ui;

use anyhow::Result;
use catalog_client::{ApiGateway, ClientConfig, StorageConfig, UploadGateway};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let client_config = ClientConfig::from_env();
    let storage_config = StorageConfig::from_env();
    tracing::info!(
        api = %client_config.base_url,
        bucket = %storage_config.bucket,
        region = %storage_config.region,
        "starting catalog console"
    );

    let api = ApiGateway::new(client_config)?;
    let uploads = UploadGateway::new(storage_config).await;

    let terminal = ratatui::init();
    let result = app::App::new(api, uploads).run(terminal).await;
    ratatui::restore();
    result
}

/// Logs go to a file; the alternate screen owns the terminal.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(".", "catalog-console.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}
