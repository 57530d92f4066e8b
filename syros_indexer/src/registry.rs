//! Heartbeat registration on the shared `agents` topic (§4.6), mirroring
//! the agent's own heartbeat loop with `ServiceType::Indexer`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use syros_core::bus::{self, Bus};
use syros_core::model::{ServiceType, SyrosService};
use syros_core::Result;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

pub async fn start(bus: Arc<dyn Bus>, hostname: String, environment: String) -> Result<JoinHandle<()>> {
    let mut service = SyrosService::new(ServiceType::Indexer, hostname, environment);
    bus::publish(&*bus, "agents", &service).await?;

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            service = service.refreshed();
            if let Err(e) = bus::publish(&*bus, "agents", &service).await {
                warn!("indexer heartbeat publish failed: {}", e);
            }
        }
    });

    Ok(handle)
}
