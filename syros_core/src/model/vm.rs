use chrono::{DateTime, Utc};

use crate::identity::hash;

/// A virtual machine, or the hypervisor host it runs on, enumerated by the
/// virtualization collector.
///
/// Both shapes share an `id = hash(name)` identity and an `environment`/
/// `collected_at` pair; `kind` distinguishes them within the same
/// `vsphere_vms`/`vsphere_hosts` split (§6's collections table keeps them
/// as two collections, so two distinct Rust types would just duplicate
/// fields — the original source likewise shares one shape between its
/// `VSphereVM` and `VSphereHost` mappers).
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Vm {
    pub id: String,
    pub name: String,
    pub power_state: String,
    pub guest_os: String,
    pub host_name: String,
    pub cluster: String,
    pub num_cpu: i32,
    pub memory_mb: i64,
    pub committed_storage_gb: f64,
    pub ip_address: String,
    pub environment: String,
    pub collected_at: DateTime<Utc>,
}

impl Vm {
    pub fn new(name: impl Into<String>, environment: impl Into<String>) -> Vm {
        let name = name.into();
        Vm {
            id: hash(&name),
            name,
            environment: environment.into(),
            collected_at: Utc::now(),
            ..Default::default()
        }
    }
}
