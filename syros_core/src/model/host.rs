use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::identity::hash;

/// A container daemon's host-level facts, as scraped by the container
/// collector's `Info` call.
///
/// `id` is derived from `name` alone (`hash(name)`) so that repeated
/// scrapes of the same daemon, from any agent replica, upsert the same
/// row (§3 invariant: identity is a pure function of natural key).
///
/// ```yaml
/// # one row per container daemon
/// name: docker-3.prod.internal
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Host {
    /// `hash(name)`. Primary key.
    pub id: String,
    /// Daemon-reported hostname. The natural key this id is derived from.
    pub name: String,
    pub operating_system: String,
    pub os_type: String,
    pub architecture: String,
    pub kernel_version: String,
    pub driver: String,
    pub server_version: String,
    pub containers: i64,
    pub containers_running: i64,
    pub containers_paused: i64,
    pub containers_stopped: i64,
    pub images: i64,
    pub ncpu: i64,
    pub mem_total: i64,
    pub docker_root_dir: String,
    pub logging_driver: String,
    pub cgroup_driver: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub registries: Vec<String>,
    /// Deployment-realm label attached at emit time by the collector.
    pub environment: String,
    /// Instant of scrape, UTC, set by the collector (§3 invariant:
    /// monotonically non-decreasing per (collector, endpoint)).
    pub collected_at: DateTime<Utc>,
}

impl Host {
    /// Build a `Host` from its natural key; callers fill in the rest.
    pub fn new(name: impl Into<String>, environment: impl Into<String>) -> Host {
        let name = name.into();
        Host {
            id: hash(&name),
            name,
            environment: environment.into(),
            collected_at: Utc::now(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_hash_of_name() {
        let h = Host::new("alpha", "dev");
        assert_eq!(h.id, hash("alpha"));
    }
}
