//! Queue-group consumers (§4.4 "Indexer").
//!
//! One `queue_subscribe` per subject, all sharing the configured
//! `CollectorQueue` group name (§6) so horizontally-scaled indexer
//! replicas split the work of a single subject rather than each
//! receiving every message (§4.3, §8 property 7). Every message is
//! handled in its own spawned task so a slow upsert on one message never
//! blocks the receive loop (§4.4/§5); a message that fails to decode or
//! upsert is logged and counted, never re-queued (§4.4/§7 — the next
//! snapshot on the subject supersedes it).

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;

use syros_core::bus::Bus;
use syros_core::metrics::Metrics;
use syros_core::payload::{AgentHeartbeat, ContainerHostPayload, ServiceDiscoveryPayload, VirtualizationPayload};
use syros_core::repository::Repository;
use syros_core::Result;

/// Subscribe to every subject §4.4 assigns the indexer and spawn one
/// receive loop per subject. Returns once every subscription succeeds;
/// the loops themselves run until the process exits.
pub async fn spawn_all(
    bus: Arc<dyn Bus>,
    repo: Arc<dyn Repository>,
    metrics: Arc<Metrics>,
    queue: &str,
) -> Result<Vec<tokio::task::JoinHandle<()>>> {
    let mut handles = Vec::new();
    handles.push(spawn_loop(bus.clone(), repo.clone(), metrics.clone(), "docker", queue, handle_docker).await?);
    handles.push(spawn_loop(bus.clone(), repo.clone(), metrics.clone(), "consul", queue, handle_consul).await?);
    handles.push(spawn_loop(bus.clone(), repo.clone(), metrics.clone(), "vsphere", queue, handle_vsphere).await?);
    handles.push(spawn_loop(bus.clone(), repo.clone(), metrics.clone(), "agents", queue, handle_agents).await?);
    Ok(handles)
}

async fn spawn_loop<F>(
    bus: Arc<dyn Bus>,
    repo: Arc<dyn Repository>,
    metrics: Arc<Metrics>,
    subject: &'static str,
    queue: &str,
    handle: F,
) -> Result<tokio::task::JoinHandle<()>>
where
    F: Fn(Arc<dyn Repository>, Vec<u8>) -> futures::future::BoxFuture<'static, Result<()>> + Send + Sync + 'static,
{
    let mut subscriber = bus
        .queue_subscribe(subject, queue)
        .await
        .map_err(|e| format_err!("subscribe to '{}' failed: {}", subject, e))?;
    let queue = queue.to_string();

    let handle = Arc::new(handle);
    Ok(tokio::spawn(async move {
        while let Some(message) = subscriber.next().await {
            let repo = repo.clone();
            let metrics = metrics.clone();
            let handle = handle.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                let start = Instant::now();
                let result = handle(repo, message.payload.to_vec()).await;
                let status = if result.is_ok() { "200" } else { "500" };
                metrics.observe(subject, &queue, status, start.elapsed().as_secs_f64());
                if let Err(e) = result {
                    error!("indexer handling '{}' message failed: {}", subject, e);
                }
            });
        }
        warn!("indexer subscription on '{}' ended", subject);
    }))
}

fn handle_docker(repo: Arc<dyn Repository>, bytes: Vec<u8>) -> futures::future::BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let payload: ContainerHostPayload = serde_json::from_slice(&bytes)?;
        repo.host_upsert(&payload.host).await?;
        repo.containers_upsert(&payload.containers).await?;
        Ok(())
    })
}

fn handle_consul(repo: Arc<dyn Repository>, bytes: Vec<u8>) -> futures::future::BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let payload: ServiceDiscoveryPayload = serde_json::from_slice(&bytes)?;
        repo.health_checks_upsert(&payload.health_checks).await?;
        Ok(())
    })
}

fn handle_vsphere(repo: Arc<dyn Repository>, bytes: Vec<u8>) -> futures::future::BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let payload: VirtualizationPayload = serde_json::from_slice(&bytes)?;
        repo.vms_upsert(&payload.vms).await?;
        repo.vsphere_hosts_upsert(&payload.hosts).await?;
        repo.datastores_upsert(&payload.data_stores).await?;
        Ok(())
    })
}

fn handle_agents(repo: Arc<dyn Repository>, bytes: Vec<u8>) -> futures::future::BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let heartbeat: AgentHeartbeat = serde_json::from_slice(&bytes)?;
        repo.syros_service_upsert(&heartbeat).await?;
        Ok(())
    })
}
