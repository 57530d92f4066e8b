#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate serde_derive;

mod config;
mod consumer;
mod http;
mod registry;

use std::process;
use std::sync::Arc;
use std::time::Duration;

use syros_core::bus::NatsBus;
use syros_core::metrics::Metrics;
use syros_core::mongo_repository::MongoRepository;
use syros_core::repository::{self, Repository};
use syros_core::Result;

use config::IndexerConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("syros-indexer exiting: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = IndexerConfig::from_env()?;
    std::env::set_var("RUST_LOG", &config.log_level);
    env_logger::init();

    info!("syros-indexer starting up, environment={}", config.environment);

    let repo: Arc<dyn Repository> = Arc::new(MongoRepository::connect(&config.mongo_hosts, &config.database).await?);
    repo.initialize().await?;

    let bus: Arc<dyn syros_core::bus::Bus> = Arc::new(NatsBus::connect(&config.nats).await?);
    let metrics = Arc::new(Metrics::new("syros_indexer"));
    let config = Arc::new(config);

    let hostname = hostname_or_unknown();
    let heartbeat = registry::start(bus.clone(), hostname, config.environment.clone()).await?;

    let gc = repository::spawn_gc(
        repo.clone(),
        Duration::from_secs(60),
        Duration::from_secs(config.database_stale_minutes * 60),
    );

    let consumers = consumer::spawn_all(bus.clone(), repo.clone(), metrics.clone(), &config.collector_queue).await?;

    let app = http::router(config.clone(), metrics.clone());
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("syros-indexer listening on :{}", config.port);

    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("http server stopped: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received, draining");
        }
    }

    heartbeat.abort();
    if let Some(gc) = gc {
        gc.abort();
    }
    for consumer in consumers {
        consumer.abort();
    }

    Ok(())
}

fn hostname_or_unknown() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler installs");
    let mut sigint = signal(SignalKind::interrupt()).expect("sigint handler installs");
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
}
