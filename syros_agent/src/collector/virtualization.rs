//! Virtualization collector (§4.1 "Virtualization collector").
//!
//! Enumerates VMs, hypervisor hosts, and datastores from a vCenter-style
//! REST endpoint, keeping only the names that survive the configured
//! include/exclude glob filter. A single unreachable/erroring endpoint
//! fails the whole tick (original_source/agent/vsphere-job.go treats a
//! vCenter outage as non-fatal to the *process* but fatal to that one
//! collection attempt, so the caller simply logs and skips this tick).

use serde::Deserialize;

use syros_core::model::{Datastore, Vm};
use syros_core::payload::VirtualizationPayload;
use syros_core::Result;

use super::glob::NameFilter;

#[derive(Debug, Deserialize)]
struct RawVm {
    name: String,
    power_state: String,
    guest_os: String,
    #[serde(default)]
    host_name: String,
    #[serde(default)]
    cluster: String,
    #[serde(default)]
    num_cpu: i32,
    #[serde(default)]
    memory_mb: i64,
    #[serde(default)]
    committed_storage_gb: f64,
    #[serde(default)]
    ip_address: String,
}

#[derive(Debug, Deserialize)]
struct RawHost {
    name: String,
    power_state: String,
    #[serde(default)]
    cluster: String,
    #[serde(default)]
    num_cpu: i32,
    #[serde(default)]
    memory_mb: i64,
}

#[derive(Debug, Deserialize)]
struct RawDatastore {
    name: String,
    capacity_gb: f64,
    free_space_gb: f64,
    #[serde(rename = "type")]
    kind: String,
    accessible: bool,
}

pub struct VirtualizationCollector {
    pub address: String,
    pub environment: String,
    filter: NameFilter,
    client: reqwest::Client,
}

impl VirtualizationCollector {
    pub fn new(address: impl Into<String>, environment: impl Into<String>, include: &str, exclude: &str) -> VirtualizationCollector {
        VirtualizationCollector {
            address: address.into(),
            environment: environment.into(),
            filter: NameFilter::new(include, exclude),
            client: reqwest::Client::new(),
        }
    }

    pub async fn collect(&self) -> Result<VirtualizationPayload> {
        let raw_vms: Vec<RawVm> = self.get("/rest/vcenter/vm").await?;
        let raw_hosts: Vec<RawHost> = self.get("/rest/vcenter/host").await?;
        let raw_stores: Vec<RawDatastore> = self.get("/rest/vcenter/datastore").await?;

        let vms = raw_vms
            .into_iter()
            .filter(|v| self.filter.matches(&v.name))
            .map(|v| map_vm(v, &self.environment))
            .collect();

        let hosts = raw_hosts
            .into_iter()
            .filter(|h| self.filter.matches(&h.name))
            .map(|h| map_host(h, &self.environment))
            .collect();

        let data_stores = raw_stores.into_iter().map(|d| map_datastore(d, &self.environment)).collect();

        Ok(VirtualizationPayload { vms, hosts, data_stores })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.address.trim_end_matches('/'), path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format_err!("vsphere GET '{}' failed: {}", url, e))?;

        if !resp.status().is_success() {
            return Err(format_err!("vsphere GET '{}' returned {}", url, resp.status()));
        }

        resp.json().await.map_err(|e| format_err!("vsphere decode from '{}' failed: {}", url, e))
    }
}

fn map_vm(raw: RawVm, environment: &str) -> Vm {
    Vm {
        power_state: raw.power_state,
        guest_os: raw.guest_os,
        host_name: raw.host_name,
        cluster: raw.cluster,
        num_cpu: raw.num_cpu,
        memory_mb: raw.memory_mb,
        committed_storage_gb: raw.committed_storage_gb,
        ip_address: raw.ip_address,
        ..Vm::new(raw.name, environment)
    }
}

fn map_host(raw: RawHost, environment: &str) -> Vm {
    Vm {
        power_state: raw.power_state,
        cluster: raw.cluster,
        num_cpu: raw.num_cpu,
        memory_mb: raw.memory_mb,
        ..Vm::new(raw.name, environment)
    }
}

fn map_datastore(raw: RawDatastore, environment: &str) -> Datastore {
    Datastore {
        capacity_gb: raw.capacity_gb,
        free_space_gb: raw.free_space_gb,
        kind: raw.kind,
        accessible: raw.accessible,
        ..Datastore::new(raw.name, environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_vm_preserves_identity_and_fields() {
        let raw = RawVm {
            name: "prod-web-01".into(),
            power_state: "poweredOn".into(),
            guest_os: "ubuntu64Guest".into(),
            host_name: "esx-01".into(),
            cluster: "prod".into(),
            num_cpu: 4,
            memory_mb: 8192,
            committed_storage_gb: 40.0,
            ip_address: "10.0.0.5".into(),
        };
        let vm = map_vm(raw, "prod");
        assert_eq!(vm.id, syros_core::identity::hash("prod-web-01"));
        assert_eq!(vm.power_state, "poweredOn");
        assert_eq!(vm.memory_mb, 8192);
    }
}
