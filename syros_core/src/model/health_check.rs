use chrono::{DateTime, Utc};

use crate::identity::hash_parts;

/// A single service-discovery health check (e.g. a Consul check).
///
/// `id` is `hash(node + service + check_id)`: the triple that uniquely
/// names a check within the cluster.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HealthCheck {
    pub id: String,
    pub node: String,
    pub service: String,
    pub check_id: String,
    /// e.g. `passing` | `warning` | `critical`.
    pub status: String,
    #[serde(default)]
    pub output: String,
    pub environment: String,
    pub collected_at: DateTime<Utc>,
}

impl HealthCheck {
    pub fn new(
        node: impl Into<String>,
        service: impl Into<String>,
        check_id: impl Into<String>,
        environment: impl Into<String>,
    ) -> HealthCheck {
        let node = node.into();
        let service = service.into();
        let check_id = check_id.into();
        let id = hash_parts(&[&node, &service, &check_id]);
        HealthCheck {
            id,
            node,
            service,
            check_id,
            environment: environment.into(),
            collected_at: Utc::now(),
            ..Default::default()
        }
    }

    /// Attach the check's reported status/output after construction.
    pub fn with_status(mut self, status: impl Into<String>, output: impl Into<String>) -> HealthCheck {
        self.status = status.into();
        self.output = output.into();
        self
    }
}
