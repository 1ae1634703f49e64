use anyhow::Result;
use tracing::info;

use init_probe_healthy::{logging, DependServiceHealthController, ProbeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = ProbeConfig::from_env()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("init-probe starting...");
    info!("discovery service: {}", config.xds.endpoint_uri());
    info!(
        cluster_id = %config.cluster_id,
        depend_services = %config.depend_services,
        "Waiting for dependent services"
    );

    // 3. Connect to the discovery service; a bad address aborts before polling
    let controller = DependServiceHealthController::new(&config)?;

    // 4. Block until every dependency has been discovered
    controller.check().await?;

    info!("init-probe finished, starting service");
    Ok(())
}
