//! Collector scheduling (§4.2 "Coordinator").
//!
//! One job per collector/endpoint pair, each on its own `CollectInterval`-
//! or `VSphereCollectInterval`-sized tick. A job whose previous tick is
//! still running is skipped rather than queued (Design Notes §9) — an
//! `AtomicBool` in-flight guard per job, checked with `compare_exchange`
//! before the tick body runs. Each tick runs under a deadline equal to its
//! own interval (§5: "runs under a deadline ≤ its collect interval");
//! exceeding it cancels the scrape and counts as status=500. A shared
//! `CancellationToken`, cancelled on `shutdown`, lets every job observe
//! structured cancellation at the top of its next tick rather than
//! relying on a per-collector stop channel (Design Notes §9).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use syros_core::bus::{self, Bus};
use syros_core::metrics::Metrics;
use syros_core::Result;

use crate::collector::{ContainerCollector, ServiceDiscoveryCollector, VirtualizationCollector};

pub struct Coordinator {
    scheduler: JobScheduler,
    shutdown: CancellationToken,
}

impl Coordinator {
    pub async fn new() -> Result<Coordinator> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| format_err!("scheduler init failed: {}", e))?;
        Ok(Coordinator { scheduler, shutdown: CancellationToken::new() })
    }

    /// Register every configured collector endpoint as its own ticking job,
    /// then start the scheduler. Returns once registration is complete;
    /// the scheduler runs in the background until `shutdown`.
    pub async fn start(
        &mut self,
        bus: Arc<dyn Bus>,
        metrics: Arc<Metrics>,
        docker_addresses: &[String],
        consul_addresses: &[String],
        vsphere_address: Option<&str>,
        environment: &str,
        collect_interval_secs: u64,
        vsphere_collect_interval_secs: u64,
        vsphere_include: &str,
        vsphere_exclude: &str,
    ) -> Result<()> {
        for address in docker_addresses {
            let collector = Arc::new(ContainerCollector::new(address.clone(), environment.to_string()));
            let bus_for_job = bus.clone();
            self.add_job("docker", address, collect_interval_secs, bus.clone(), metrics.clone(), move || {
                let collector = collector.clone();
                let bus_for_job = bus_for_job.clone();
                async move {
                    let payload = collector.collect().await?;
                    bus::publish(&*bus_for_job, "docker", &payload).await
                }
            })
            .await?;
        }

        for address in consul_addresses {
            let collector = Arc::new(ServiceDiscoveryCollector::new(address.clone(), environment.to_string()));
            let bus_for_job = bus.clone();
            self.add_job("consul", address, collect_interval_secs, bus.clone(), metrics.clone(), move || {
                let collector = collector.clone();
                let bus_for_job = bus_for_job.clone();
                async move {
                    let payload = collector.collect().await?;
                    bus::publish(&*bus_for_job, "consul", &payload).await
                }
            })
            .await?;
        }

        if let Some(address) = vsphere_address {
            let collector = Arc::new(VirtualizationCollector::new(
                address.to_string(),
                environment.to_string(),
                vsphere_include,
                vsphere_exclude,
            ));
            let bus_for_job = bus.clone();
            self.add_job("vsphere", address, vsphere_collect_interval_secs, bus.clone(), metrics.clone(), move || {
                let collector = collector.clone();
                let bus_for_job = bus_for_job.clone();
                async move {
                    let payload = collector.collect().await?;
                    bus::publish(&*bus_for_job, "vsphere", &payload).await
                }
            })
            .await?;
        }

        self.scheduler.start().await.map_err(|e| format_err!("scheduler start failed: {}", e))?;
        Ok(())
    }

    async fn add_job<F, Fut>(
        &mut self,
        source: &str,
        endpoint: &str,
        interval_secs: u64,
        _bus: Arc<dyn Bus>,
        metrics: Arc<Metrics>,
        run: F,
    ) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let in_flight = Arc::new(AtomicBool::new(false));
        let source = source.to_string();
        let endpoint = endpoint.to_string();
        let schedule = format!("1/{} * * * * *", interval_secs.max(1));
        let deadline = Duration::from_secs(interval_secs.max(1));
        let shutdown = self.shutdown.clone();

        let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
            let in_flight = in_flight.clone();
            let metrics = metrics.clone();
            let source = source.clone();
            let endpoint = endpoint.clone();
            let shutdown = shutdown.clone();
            let run = run();
            Box::pin(async move {
                if shutdown.is_cancelled() {
                    return;
                }
                if in_flight.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
                    metrics.skipped_overlap(&source);
                    warn!("{} tick for '{}' skipped, previous tick still in flight", source, endpoint);
                    return;
                }
                let start = Instant::now();
                let result = tokio::time::timeout(deadline, run).await;
                let elapsed = start.elapsed();
                match result {
                    Ok(Ok(())) => {
                        metrics.observe(&source, &endpoint, "200", elapsed.as_secs_f64());
                    }
                    Ok(Err(e)) => {
                        metrics.observe(&source, &endpoint, "500", elapsed.as_secs_f64());
                        error!("{} collect on '{}' failed: {}", source, endpoint, e);
                    }
                    Err(_) => {
                        metrics.observe(&source, &endpoint, "500", elapsed.as_secs_f64());
                        error!("{} collect on '{}' exceeded its {:?} deadline, cancelled", source, endpoint, deadline);
                    }
                }
                in_flight.store(false, Ordering::SeqCst);
            })
        })
        .map_err(|e| format_err!("job for {} '{}' failed to build: {}", source, endpoint, e))?;

        self.scheduler.add(job).await.map_err(|e| format_err!("job for {} '{}' failed to register: {}", source, endpoint, e))?;
        Ok(())
    }

    /// Signal every collector loop to observe cancellation on its next
    /// tick (Design Notes §9: "model as structured cancellation"), stop
    /// the scheduler, then allow any tick already in flight up to
    /// `deadline` to drain before returning.
    pub async fn shutdown(&mut self, deadline: Duration) -> Result<()> {
        self.shutdown.cancel();
        self.scheduler.shutdown().await.map_err(|e| format_err!("scheduler shutdown failed: {}", e))?;
        tokio::time::sleep(deadline.min(Duration::from_secs(5))).await;
        Ok(())
    }
}
