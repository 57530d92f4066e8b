use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Read-side release record (§3: "Release / Deployment — read-side
/// only"). Written and read by the deployment-promotion CLI and the HTTP
/// API, both out of scope here (§1); this shape exists so a dependent
/// crate can share it rather than redefine it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Release {
    pub id: String,
    pub ticket_id: String,
    pub name: String,
    pub begin: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub deployments: i64,
    pub environments: String,
}

/// A single service/host promotion within a `Release`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Deployment {
    pub id: String,
    pub release_id: String,
    pub ticket_id: String,
    pub status: String,
    pub service_name: String,
    pub host_name: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    pub image: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub env: Vec<String>,
}
