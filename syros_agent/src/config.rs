use syros_core::env::{comma_list, optional, optional_u64};
use syros_core::Result;

/// Recognized collector configuration options (§6).
#[derive(Debug, Clone, Serialize)]
pub struct AgentConfig {
    pub environment: String,
    pub collect_interval_secs: u64,
    pub vsphere_collect_interval_secs: u64,
    pub docker_api_addresses: Vec<String>,
    pub consul_api_addresses: Vec<String>,
    pub vsphere_api_address: Option<String>,
    pub vsphere_include: String,
    pub vsphere_exclude: String,
    pub nats: String,
    pub log_level: String,
    pub port: u16,
}

impl AgentConfig {
    pub fn from_env() -> Result<AgentConfig> {
        let vsphere_api_address = {
            let v = optional("VSphereApiAddress", "");
            if v.is_empty() { None } else { Some(v) }
        };
        Ok(AgentConfig {
            environment: optional("Environment", "dev"),
            collect_interval_secs: optional_u64("CollectInterval", 10)?,
            vsphere_collect_interval_secs: optional_u64("VSphereCollectInterval", 60)?,
            docker_api_addresses: comma_list(&optional("DockerApiAddresses", "unix:///var/run/docker.sock")),
            consul_api_addresses: comma_list(&optional("ConsulApiAddresses", "")),
            vsphere_api_address,
            vsphere_include: optional("VSphereInclude", ""),
            vsphere_exclude: optional("VSphereExclude", ""),
            nats: optional("Nats", "nats://localhost:4222"),
            log_level: optional("LogLevel", "debug"),
            port: optional_u64("Port", 8886)? as u16,
        })
    }
}
