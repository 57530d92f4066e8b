#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate serde_derive;

mod collector;
mod config;
mod coordinator;
mod http;
mod registry;

use std::process;
use std::sync::Arc;
use std::time::Duration;

use syros_core::bus::NatsBus;
use syros_core::metrics::Metrics;
use syros_core::Result;

use config::AgentConfig;
use coordinator::Coordinator;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("syros-agent exiting: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AgentConfig::from_env()?;
    std::env::set_var("RUST_LOG", &config.log_level);
    env_logger::init();

    info!("syros-agent starting up, environment={}", config.environment);

    let bus: Arc<dyn syros_core::bus::Bus> = Arc::new(NatsBus::connect(&config.nats).await?);
    let metrics = Arc::new(Metrics::new("syros_agent"));
    let config = Arc::new(config);

    let hostname = hostname_or_unknown();
    let heartbeat = registry::start(bus.clone(), hostname, config.environment.clone()).await?;

    let mut coordinator = Coordinator::new().await?;
    coordinator
        .start(
            bus.clone(),
            metrics.clone(),
            &config.docker_api_addresses,
            &config.consul_api_addresses,
            config.vsphere_api_address.as_deref(),
            &config.environment,
            config.collect_interval_secs,
            config.vsphere_collect_interval_secs,
            &config.vsphere_include,
            &config.vsphere_exclude,
        )
        .await?;

    let app = http::router(config.clone(), metrics.clone());
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("syros-agent listening on :{}", config.port);

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
    coordinator.shutdown(Duration::from_secs(5)).await?;

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
