use chrono::{DateTime, Utc};

use crate::identity::hash;

/// A vSphere datastore, enumerated alongside VMs/hosts by the
/// virtualization collector.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Datastore {
    pub id: String,
    pub name: String,
    pub capacity_gb: f64,
    pub free_space_gb: f64,
    pub kind: String,
    pub accessible: bool,
    pub environment: String,
    pub collected_at: DateTime<Utc>,
}

impl Datastore {
    pub fn new(name: impl Into<String>, environment: impl Into<String>) -> Datastore {
        let name = name.into();
        Datastore {
            id: hash(&name),
            name,
            environment: environment.into(),
            collected_at: Utc::now(),
            ..Default::default()
        }
    }
}
