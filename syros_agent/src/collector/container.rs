//! Container daemon collector (§4.1 "Container collector").
//!
//! Calls `Info` (host metadata), `ContainerList(all=true)` (summaries),
//! then `ContainerInspect` per container. A per-container inspect
//! failure is logged and that record skipped; the rest of the payload is
//! still returned successfully (§4.1 "partial-fetch error").

use std::collections::BTreeMap;
use std::time::Duration;

use bollard::container::ListContainersOptions;
use bollard::Docker;
use chrono::{DateTime, TimeZone, Utc};

use syros_core::model::{Container, Host};
use syros_core::payload::ContainerHostPayload;
use syros_core::{identity::hash, port, Result};

const API_TIMEOUT: Duration = Duration::from_secs(20);

pub struct ContainerCollector {
    pub address: String,
    pub environment: String,
}

impl ContainerCollector {
    pub fn new(address: impl Into<String>, environment: impl Into<String>) -> ContainerCollector {
        ContainerCollector { address: address.into(), environment: environment.into() }
    }

    fn connect(&self) -> Result<Docker> {
        let docker = if let Some(path) = self.address.strip_prefix("unix://") {
            Docker::connect_with_unix(path, API_TIMEOUT.as_secs(), bollard::API_DEFAULT_VERSION)
        } else {
            Docker::connect_with_http(&self.address, API_TIMEOUT.as_secs(), bollard::API_DEFAULT_VERSION)
        };
        docker.map_err(|e| format_err!("docker connect to '{}' failed: {}", self.address, e))
    }

    pub async fn collect(&self) -> Result<ContainerHostPayload> {
        let docker = self.connect()?;

        let info = docker
            .info()
            .await
            .map_err(|e| format_err!("docker info on '{}' failed: {}", self.address, e))?;

        let host_name = info.name.clone().unwrap_or_default();
        let host = map_host(&host_name, &self.environment, &info);

        let options = ListContainersOptions::<String> { all: true, ..Default::default() };
        let summaries = docker
            .list_containers(Some(options))
            .await
            .map_err(|e| format_err!("docker container list on '{}' failed: {}", self.address, e))?;

        let mut containers = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let id = match &summary.id {
                Some(id) => id.clone(),
                None => continue,
            };
            match docker.inspect_container(&id, None).await {
                Ok(inspect) => containers.push(map_container(&host.id, &host_name, &self.environment, &summary, &inspect)),
                Err(e) => warn!("docker inspect {} on '{}' failed, skipping: {}", id, self.address, e),
            }
        }

        debug!("{} collect: {} containers", self.address, containers.len());
        Ok(ContainerHostPayload { host, containers })
    }
}

fn map_host(name: &str, environment: &str, info: &bollard::system::SystemInfo) -> Host {
    Host {
        id: hash(name),
        name: name.to_string(),
        operating_system: info.operating_system.clone().unwrap_or_default(),
        os_type: info.os_type.clone().unwrap_or_default(),
        architecture: info.architecture.clone().unwrap_or_default(),
        kernel_version: info.kernel_version.clone().unwrap_or_default(),
        driver: info.driver.clone().unwrap_or_default(),
        server_version: info.server_version.clone().unwrap_or_default(),
        containers: info.containers.unwrap_or_default(),
        containers_running: info.containers_running.unwrap_or_default(),
        containers_paused: info.containers_paused.unwrap_or_default(),
        containers_stopped: info.containers_stopped.unwrap_or_default(),
        images: info.images.unwrap_or_default(),
        ncpu: info.ncpu.unwrap_or_default(),
        mem_total: info.mem_total.unwrap_or_default(),
        docker_root_dir: info.docker_root_dir.clone().unwrap_or_default(),
        logging_driver: info.logging_driver.clone().unwrap_or_default(),
        cgroup_driver: info.cgroup_driver.clone().map(|d| format!("{:?}", d)).unwrap_or_default(),
        labels: info.labels.clone().unwrap_or_default().into_iter().collect(),
        registries: info
            .registry_config
            .as_ref()
            .and_then(|rc| rc.index_configs.as_ref())
            .map(|idx| idx.keys().cloned().collect())
            .unwrap_or_default(),
        environment: environment.to_string(),
        collected_at: Utc::now(),
    }
}

fn map_container(
    host_id: &str,
    host_name: &str,
    environment: &str,
    summary: &bollard::models::ContainerSummary,
    inspect: &bollard::models::ContainerInspectResponse,
) -> Container {
    let labels: BTreeMap<String, String> = summary
        .labels
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k.replace('.', "_"), v))
        .collect();

    let mut port_bindings = BTreeMap::new();
    if let Some(host_config) = &inspect.host_config {
        if let Some(bindings) = &host_config.port_bindings {
            for (container_port, maybe_bindings) in bindings {
                if let Some(b) = maybe_bindings.as_ref().and_then(|v| v.first()) {
                    if let Some(host_port) = &b.host_port {
                        port_bindings.insert(container_port.clone(), host_port.clone());
                    }
                }
            }
        }
    }

    let env: Vec<String> = inspect
        .config
        .as_ref()
        .and_then(|c| c.env.clone())
        .unwrap_or_default();

    let port = port::select(&port_bindings, &env);

    let state = inspect.state.clone().unwrap_or_default();
    let name = inspect
        .name
        .clone()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();

    Container {
        id: summary.id.clone().unwrap_or_default(),
        host_id: host_id.to_string(),
        host_name: host_name.to_string(),
        image: summary.image.clone().unwrap_or_default(),
        command: summary.command.clone().unwrap_or_default(),
        state: summary.state.clone().unwrap_or_default(),
        status: summary.status.clone().unwrap_or_default(),
        path: inspect.path.clone().unwrap_or_default(),
        args: inspect.args.clone().unwrap_or_default(),
        name,
        restart_count: inspect.restart_count.unwrap_or_default() as i64,
        restart_policy: inspect
            .host_config
            .as_ref()
            .and_then(|hc| hc.restart_policy.as_ref())
            .and_then(|rp| rp.name)
            .map(|n| format!("{:?}", n))
            .unwrap_or_default(),
        network_mode: inspect
            .host_config
            .as_ref()
            .and_then(|hc| hc.network_mode.clone())
            .unwrap_or_default(),
        port_bindings,
        port,
        labels,
        env,
        created: parse_rfc3339(inspect.created.as_deref().unwrap_or_default()),
        started_at: state.started_at.as_deref().map(parse_rfc3339),
        finished_at: state.finished_at.as_deref().map(parse_rfc3339),
        exit_code: state.exit_code.unwrap_or_default(),
        error: state.error.unwrap_or_default(),
        environment: environment.to_string(),
        collected_at: Utc::now(),
    }
}

fn parse_rfc3339(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc.timestamp_opt(0, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timestamp_defaults_to_epoch() {
        assert_eq!(parse_rfc3339(""), Utc.timestamp_opt(0, 0).unwrap());
    }
}
