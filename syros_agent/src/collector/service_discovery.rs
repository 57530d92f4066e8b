//! Service-discovery collector (§4.1 "ServiceDiscovery collector").
//!
//! Enumerates health checks across the cluster via the discovery
//! backend's HTTP API and annotates each with `environment`.

use serde::Deserialize;

use syros_core::model::HealthCheck;
use syros_core::payload::ServiceDiscoveryPayload;
use syros_core::Result;

#[derive(Debug, Deserialize)]
struct RawCheck {
    #[serde(rename = "Node")]
    node: String,
    #[serde(rename = "ServiceName")]
    service_name: String,
    #[serde(rename = "CheckID")]
    check_id: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(default, rename = "Output")]
    output: String,
}

pub struct ServiceDiscoveryCollector {
    pub address: String,
    pub environment: String,
    client: reqwest::Client,
}

impl ServiceDiscoveryCollector {
    pub fn new(address: impl Into<String>, environment: impl Into<String>) -> ServiceDiscoveryCollector {
        ServiceDiscoveryCollector {
            address: address.into(),
            environment: environment.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn collect(&self) -> Result<ServiceDiscoveryPayload> {
        let url = format!("{}/v1/health/state/any", self.address.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format_err!("consul checks GET '{}' failed: {}", url, e))?;

        if !resp.status().is_success() {
            return Err(format_err!("consul checks GET '{}' returned {}", url, resp.status()));
        }

        let raw: Vec<RawCheck> = resp
            .json()
            .await
            .map_err(|e| format_err!("consul checks decode from '{}' failed: {}", url, e))?;

        let health_checks = raw
            .into_iter()
            .map(|c| HealthCheck::new(c.node, c.service_name, c.check_id, self.environment.clone()).with_status(c.status, c.output))
            .collect();

        Ok(ServiceDiscoveryPayload { health_checks })
    }
}
