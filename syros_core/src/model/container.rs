use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A single container, as scraped by `ContainerList` + `ContainerInspect`.
///
/// `id` is the daemon-provided container id (already globally unique and
/// stable across restarts of the daemon, so no hashing is needed here,
/// unlike `Host`/`HealthCheck`/`Vm`). `host_id` links back to the `Host`
/// in the same payload and MUST equal `hash(host.name)` (§3 invariant,
/// §8 property 3).
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Container {
    pub id: String,
    pub host_id: String,
    pub host_name: String,
    pub image: String,
    pub command: String,
    pub state: String,
    pub status: String,
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub name: String,
    pub restart_count: i64,
    pub restart_policy: String,
    pub network_mode: String,
    /// container port -> host port, as reported by the daemon.
    #[serde(default)]
    pub port_bindings: BTreeMap<String, String>,
    /// The single representative host port, chosen by the §4.1.1 algorithm.
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub env: Vec<String>,
    pub created: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub exit_code: i64,
    #[serde(default)]
    pub error: String,
    pub environment: String,
    pub collected_at: DateTime<Utc>,
}
