//! The `Repository` capability (§4.5): upsert-by-identity into a document
//! store, index management, and time-based eviction.
//!
//! Two backends existed in the original source (a MongoDB-flavored one and
//! a RethinkDB-flavored one with change-feed support). Per Design Notes
//! §9 we abstract the capability here and implement it independently per
//! backend, selected at startup by config; the change-feed features the
//! RethinkDB variant fed into a UI are out of scope for this core. Only
//! the MongoDB variant ([`crate::mongo_repository::MongoRepository`]) is
//! implemented; a second backend would implement this same trait.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::model::{Container, Datastore, Host, HealthCheck, SyrosService, Vm};
use crate::Result;

/// All collection names the repository manages (§6).
pub const COLLECTIONS: &[&str] = &[
    "hosts",
    "containers",
    "checks",
    "vsphere_vms",
    "vsphere_hosts",
    "vsphere_datastores",
    "syros_services",
];

#[async_trait]
pub trait Repository: Send + Sync {
    /// Ensure the database and per-collection secondary indexes exist.
    /// Idempotent: safe to call on every startup.
    async fn initialize(&self) -> Result<()>;

    async fn host_upsert(&self, host: &Host) -> Result<()>;

    /// Atomic per row, not per batch: a mid-batch failure leaves prior
    /// rows applied (§4.5).
    async fn containers_upsert(&self, containers: &[Container]) -> Result<()>;

    async fn health_checks_upsert(&self, checks: &[HealthCheck]) -> Result<()>;

    async fn vms_upsert(&self, vms: &[Vm]) -> Result<()>;

    async fn vsphere_hosts_upsert(&self, hosts: &[Vm]) -> Result<()>;

    async fn datastores_upsert(&self, stores: &[Datastore]) -> Result<()>;

    async fn syros_service_upsert(&self, service: &SyrosService) -> Result<()>;

    /// Delete every row in `collection` whose `collected_at` is older than
    /// `now - stale`. Returns the number of rows removed. Uses the
    /// `collected_at` index so a sweep costs O(stale records).
    async fn evict_stale(&self, collection: &str, stale: Duration) -> Result<u64>;
}

/// Run one GC sweep across every managed collection, logging what each
/// sweep removed. Returns the total rows removed.
pub async fn gc_sweep(repo: &dyn Repository, stale: Duration) -> u64 {
    let mut total = 0u64;
    for collection in COLLECTIONS {
        match repo.evict_stale(collection, stale).await {
            Ok(removed) if removed > 0 => {
                info!("repository GC removed {} from {}", removed, collection);
                total += removed;
            }
            Ok(_) => {}
            Err(e) => error!("repository GC for {} failed: {}", collection, e),
        }
    }
    total
}

/// Spawn the periodic background GC task (§4.5:
/// `RunGarbageCollector(collections, interval=60s, stale=DatabaseStale
/// minutes)`). A no-op (no task spawned) when `stale` is zero.
pub fn spawn_gc(
    repo: Arc<dyn Repository>,
    interval: Duration,
    stale: Duration,
) -> Option<tokio::task::JoinHandle<()>> {
    if stale.is_zero() {
        return None;
    }
    info!(
        "starting repository GC, interval {:?}, stale threshold {:?}",
        interval, stale
    );
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            gc_sweep(repo.as_ref(), stale).await;
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, Duration as ChronoDuration, Utc};

    use super::*;

    /// A minimal in-memory [`Repository`] double, keyed the same way the
    /// real Mongo backend is (collection name -> id -> `collected_at`),
    /// so the upsert-idempotence and GC-monotonicity properties (§8,
    /// properties 2 and 6) can be exercised without a live database.
    #[derive(Default)]
    struct FakeRepository {
        collections: Mutex<HashMap<&'static str, HashMap<String, DateTime<Utc>>>>,
    }

    impl FakeRepository {
        fn rows(&self, collection: &str) -> usize {
            self.collections.lock().unwrap().get(collection).map(HashMap::len).unwrap_or(0)
        }

        fn put(&self, collection: &'static str, id: String, collected_at: DateTime<Utc>) {
            self.collections.lock().unwrap().entry(collection).or_default().insert(id, collected_at);
        }
    }

    #[async_trait]
    impl Repository for FakeRepository {
        async fn initialize(&self) -> Result<()> {
            Ok(())
        }

        async fn host_upsert(&self, host: &Host) -> Result<()> {
            self.put("hosts", host.id.clone(), host.collected_at);
            Ok(())
        }

        async fn containers_upsert(&self, containers: &[Container]) -> Result<()> {
            for c in containers {
                self.put("containers", c.id.clone(), c.collected_at);
            }
            Ok(())
        }

        async fn health_checks_upsert(&self, checks: &[HealthCheck]) -> Result<()> {
            for c in checks {
                self.put("checks", c.id.clone(), c.collected_at);
            }
            Ok(())
        }

        async fn vms_upsert(&self, vms: &[Vm]) -> Result<()> {
            for vm in vms {
                self.put("vsphere_vms", vm.id.clone(), vm.collected_at);
            }
            Ok(())
        }

        async fn vsphere_hosts_upsert(&self, hosts: &[Vm]) -> Result<()> {
            for h in hosts {
                self.put("vsphere_hosts", h.id.clone(), h.collected_at);
            }
            Ok(())
        }

        async fn datastores_upsert(&self, stores: &[Datastore]) -> Result<()> {
            for s in stores {
                self.put("vsphere_datastores", s.id.clone(), s.collected_at);
            }
            Ok(())
        }

        async fn syros_service_upsert(&self, service: &SyrosService) -> Result<()> {
            self.put("syros_services", service.id.clone(), service.collected_at);
            Ok(())
        }

        async fn evict_stale(&self, collection: &str, stale: Duration) -> Result<u64> {
            let threshold = Utc::now() - ChronoDuration::from_std(stale).unwrap_or(ChronoDuration::zero());
            let mut collections = self.collections.lock().unwrap();
            let rows = match collections.get_mut(collection) {
                Some(rows) => rows,
                None => return Ok(0),
            };
            let before = rows.len();
            rows.retain(|_, collected_at| *collected_at >= threshold);
            Ok((before - rows.len()) as u64)
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_id() {
        let repo = FakeRepository::default();
        let host = Host::new("alpha", "dev");
        for _ in 0..3 {
            repo.host_upsert(&host).await.unwrap();
        }
        assert_eq!(repo.rows("hosts"), 1);
    }

    #[tokio::test]
    async fn gc_sweep_removes_only_rows_older_than_threshold() {
        let repo = FakeRepository::default();
        let stale_host = Host { collected_at: Utc::now() - ChronoDuration::hours(2), ..Host::new("stale", "dev") };
        let fresh_host = Host::new("fresh", "dev");
        repo.host_upsert(&stale_host).await.unwrap();
        repo.host_upsert(&fresh_host).await.unwrap();

        let removed = gc_sweep(&repo, Duration::from_secs(60 * 60)).await;

        assert_eq!(removed, 1);
        assert_eq!(repo.rows("hosts"), 1);
    }

    #[tokio::test]
    async fn gc_sweep_is_a_no_op_when_nothing_is_stale() {
        let repo = FakeRepository::default();
        repo.host_upsert(&Host::new("fresh", "dev")).await.unwrap();

        let removed = gc_sweep(&repo, Duration::from_secs(60 * 60)).await;

        assert_eq!(removed, 0);
        assert_eq!(repo.rows("hosts"), 1);
    }
}
