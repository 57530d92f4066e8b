use syros_core::env::{optional, optional_u64};
use syros_core::Result;

/// Recognized indexer configuration options (§6).
#[derive(Debug, Clone, Serialize)]
pub struct IndexerConfig {
    pub environment: String,
    pub nats: String,
    pub mongo_hosts: String,
    pub database: String,
    pub database_stale_minutes: u64,
    pub collector_queue: String,
    pub log_level: String,
    pub port: u16,
}

impl IndexerConfig {
    pub fn from_env() -> Result<IndexerConfig> {
        Ok(IndexerConfig {
            environment: optional("Environment", "dev"),
            nats: optional("Nats", "nats://localhost:4222"),
            mongo_hosts: optional("MongoDB", "localhost:27017"),
            database: optional("Database", "syros"),
            database_stale_minutes: optional_u64("DatabaseStale", 0)?,
            collector_queue: optional("CollectorQueue", "indexer"),
            log_level: optional("LogLevel", "debug"),
            port: optional_u64("Port", 8887)? as u16,
        })
    }
}
