//! Heartbeat registration on the shared `agents` topic (§4.6).
//!
//! Every process publishes its `SyrosService` record immediately on
//! startup and again every 10 seconds; liveness is inferred downstream
//! by GC aging out records whose `collected_at` stops advancing.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use syros_core::bus::{self, Bus};
use syros_core::model::{ServiceType, SyrosService};
use syros_core::Result;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Publish the initial heartbeat, then spawn a background task that
/// republishes a refreshed copy every [`HEARTBEAT_INTERVAL`].
pub async fn start(bus: Arc<dyn Bus>, hostname: String, environment: String) -> Result<JoinHandle<()>> {
    let mut service = SyrosService::new(ServiceType::Agent, hostname, environment);
    bus::publish(&*bus, "agents", &service).await?;

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            service = service.refreshed();
            if let Err(e) = bus::publish(&*bus, "agents", &service).await {
                warn!("agent heartbeat publish failed: {}", e);
            }
        }
    });

    Ok(handle)
}
