//! Bus message envelopes (§3, §6). Each payload is a complete snapshot:
//! the consumer upserts every record it contains and never diffs against
//! a prior payload ("snapshot reconciliation", see GLOSSARY).

use crate::model::{Container, Datastore, Host, HealthCheck, SyrosService, Vm};

/// Published on the `docker` subject by the container collector.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ContainerHostPayload {
    pub host: Host,
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// Published on the `consul` subject by the service-discovery collector.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ServiceDiscoveryPayload {
    #[serde(default)]
    pub health_checks: Vec<HealthCheck>,
}

/// Published on the `vsphere` subject by the virtualization collector.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct VirtualizationPayload {
    #[serde(default)]
    pub vms: Vec<Vm>,
    #[serde(default)]
    pub hosts: Vec<Vm>,
    #[serde(default, rename = "data_stores")]
    pub data_stores: Vec<Datastore>,
}

/// Published on the `agents` subject by every process (§4.6).
pub type AgentHeartbeat = SyrosService;
