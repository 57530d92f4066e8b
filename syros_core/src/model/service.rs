use chrono::{DateTime, Utc};

use crate::identity::hash_parts;

/// Which of the three process roles emitted a heartbeat.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Agent,
    Indexer,
    Api,
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::Agent
    }
}

/// The heartbeat record every process (agent, indexer, api) advertises on
/// the shared `agents` topic (§4.6).
///
/// `id = hash(type + hostname)`: the process identity is the pair of
/// "what kind of process" and "on what host", which is stable across
/// restarts of the same deployment slot but distinct per replica.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SyrosService {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ServiceType,
    pub hostname: String,
    pub environment: String,
    pub collected_at: DateTime<Utc>,
}

impl SyrosService {
    pub fn new(kind: ServiceType, hostname: impl Into<String>, environment: impl Into<String>) -> SyrosService {
        let hostname = hostname.into();
        let kind_str = match kind {
            ServiceType::Agent => "agent",
            ServiceType::Indexer => "indexer",
            ServiceType::Api => "api",
        };
        SyrosService {
            id: hash_parts(&[kind_str, &hostname]),
            kind,
            hostname,
            environment: environment.into(),
            collected_at: Utc::now(),
        }
    }

    /// Refresh `collected_at` for the next heartbeat tick, without
    /// changing identity.
    pub fn refreshed(&self) -> SyrosService {
        SyrosService {
            collected_at: Utc::now(),
            ..self.clone()
        }
    }
}
