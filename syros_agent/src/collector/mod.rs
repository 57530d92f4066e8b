pub mod container;
pub mod glob;
pub mod service_discovery;
pub mod virtualization;

pub use container::ContainerCollector;
pub use service_discovery::ServiceDiscoveryCollector;
pub use virtualization::VirtualizationCollector;
