//! Hardware Health Diagnostics - Main Entry Point

use api::{init_logging, run_server, Settings, DEFAULT_CONFIG_PATH};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("HWDIAG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = Settings::load(&config_path)?;
    init_logging(&settings.logging)?;

    info!("=== Hardware Health Diagnostics v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Loading baseline and classifier artifacts...");

    run_server(settings).await?;

    Ok(())
}
