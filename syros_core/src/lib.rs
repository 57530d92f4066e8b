#![allow(non_snake_case)]

//extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate serde;

#[macro_use]
extern crate log;

#[macro_use]
extern crate failure;

pub use failure::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Stable, process-independent identity derivation (hash of a natural key).
pub mod identity;

/// Persisted entity shapes (one module per collection, mirroring `structs/`).
pub mod model;

/// Bus message envelopes (wire shapes published on NATS subjects).
pub mod payload;

/// Port-binding selection algorithm for container collectors.
pub mod port;

/// Environment-variable-driven process configuration, shared shape.
pub mod env;

/// A thin facade over a subject-based pub/sub broker with queue-group semantics.
pub mod bus;

/// The `Repository` capability: upsert + index + GC operations over a document store.
pub mod repository;

/// MongoDB-backed `Repository` implementation.
pub mod mongo_repository;

/// Process-wide request counters / latency histograms.
pub mod metrics;

pub use identity::hash;
pub use model::{
    Container, Datastore, Deployment, Host, HealthCheck, Release, SyrosService, Vm,
};
pub use payload::{AgentHeartbeat, ContainerHostPayload, ServiceDiscoveryPayload, VirtualizationPayload};
pub use repository::Repository;
