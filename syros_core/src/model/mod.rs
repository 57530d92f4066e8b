//! Persisted entity shapes, one module per collection (mirrors the
//! `structs/` layout of the definitions crate this workspace grew from).

mod container;
mod datastore;
mod health_check;
mod host;
mod release;
mod service;
mod vm;

pub use container::Container;
pub use datastore::Datastore;
pub use health_check::HealthCheck;
pub use host::Host;
pub use release::{Deployment, Release};
pub use service::{ServiceType, SyrosService};
pub use vm::Vm;
