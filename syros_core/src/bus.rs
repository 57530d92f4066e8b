//! A thin facade over a subject-based pub/sub broker (§4.3).
//!
//! Two publish modes are used by callers: [`Bus::publish_bytes`] for
//! already-encoded payloads, and the free function [`publish`] for typed
//! values that get JSON-encoded first. Both produce identical bytes on
//! the wire, so a typed subscriber decodes a raw-published message and
//! vice versa, as long as they share a schema.
//!
//! Subscriptions use queue-group semantics: the broker load-balances a
//! subject's messages across every subscriber sharing a queue name. This
//! is the mechanism the indexer relies on to horizontally scale (§4.3,
//! §8 property 7).

use async_trait::async_trait;
use serde::Serialize;

use crate::Result;

#[async_trait]
pub trait Bus: Send + Sync {
    /// Publish an already-encoded payload on `subject`.
    async fn publish_bytes(&self, subject: &str, payload: Vec<u8>) -> Result<()>;

    /// Subscribe to `subject` as a member of queue group `queue`. Each
    /// message on the subject is delivered to exactly one subscriber
    /// within the group.
    async fn queue_subscribe(&self, subject: &str, queue: &str) -> Result<async_nats::Subscriber>;
}

/// JSON-encode `value` and publish it on `subject`.
pub async fn publish<T>(bus: &dyn Bus, subject: &str, value: &T) -> Result<()>
where
    T: Serialize + Sync,
{
    let bytes = serde_json::to_vec(value)?;
    bus.publish_bytes(subject, bytes).await
}

/// A [`Bus`] backed by a real NATS connection.
pub struct NatsBus {
    client: async_nats::Client,
}

impl NatsBus {
    /// Connect using a comma-delimited server list, per §6's `Nats` option.
    pub async fn connect(addrs: &str) -> Result<NatsBus> {
        let client = async_nats::connect(addrs)
            .await
            .map_err(|e| format_err!("nats connection to '{}' failed: {}", addrs, e))?;
        Ok(NatsBus { client })
    }

    /// Close the underlying connection, draining any buffered publishes.
    pub async fn close(self) -> Result<()> {
        self.client
            .drain()
            .await
            .map_err(|e| format_err!("nats drain failed: {}", e))?;
        Ok(())
    }
}

#[async_trait]
impl Bus for NatsBus {
    async fn publish_bytes(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| format_err!("nats publish to '{}' failed: {}", subject, e))?;
        Ok(())
    }

    async fn queue_subscribe(&self, subject: &str, queue: &str) -> Result<async_nats::Subscriber> {
        self.client
            .queue_subscribe(subject.to_string(), queue.to_string())
            .await
            .map_err(|e| format_err!("nats queue_subscribe '{}'/'{}' failed: {}", subject, queue, e))
    }
}
