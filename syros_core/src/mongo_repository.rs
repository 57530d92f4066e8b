//! MongoDB-backed [`Repository`] implementation.

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::{Duration as ChronoDuration, Utc};
use mongodb::options::{ClientOptions, IndexOptions, ReplaceOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::model::{Container, Datastore, Host, HealthCheck, SyrosService, Vm};
use crate::repository::Repository;
use crate::Result;

/// Connection pool + database handle (§4.5: "owns a connection pool").
///
/// `mongodb::Client` is itself a handle around a pooled connection set
/// and is cheap to clone/share, matching the teacher's one-session-per-
/// process convention for its HTTP/vault clients.
pub struct MongoRepository {
    db: Database,
}

impl MongoRepository {
    /// Connect using a comma-delimited server list and database name, per
    /// §6's `MongoDB`/`Database` options.
    pub async fn connect(hosts: &str, database: &str) -> Result<MongoRepository> {
        let uri = if hosts.starts_with("mongodb://") || hosts.starts_with("mongodb+srv://") {
            hosts.to_string()
        } else {
            format!("mongodb://{}", hosts)
        };
        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|e| format_err!("mongodb connection string '{}' invalid: {}", uri, e))?;
        options.app_name = Some("syros".to_string());
        let client = Client::with_options(options)
            .map_err(|e| format_err!("mongodb client init failed: {}", e))?;
        Ok(MongoRepository { db: client.database(database) })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    async fn ensure_index(&self, collection: &str, field: &str) -> Result<()> {
        let model = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().build())
            .build();
        self.collection(collection)
            .create_index(model)
            .await
            .map_err(|e| format_err!("mongodb index {}.{} failed: {}", collection, field, e))?;
        Ok(())
    }

    async fn upsert_one<T: serde::Serialize>(&self, collection: &str, id: &str, entity: &T) -> Result<()> {
        let mut doc = bson::to_document(entity)
            .map_err(|e| format_err!("mongodb encode for {} failed: {}", collection, e))?;
        doc.remove("id");
        doc.insert("_id", id);
        self.collection(collection)
            .replace_one(doc! { "_id": id }, doc)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await
            .map_err(|e| format_err!("mongodb upsert into {} failed: {}", collection, e))?;
        Ok(())
    }
}

#[async_trait]
impl Repository for MongoRepository {
    async fn initialize(&self) -> Result<()> {
        self.ensure_index("hosts", "environment").await?;
        self.ensure_index("hosts", "collected_at").await?;
        self.ensure_index("containers", "host_id").await?;
        self.ensure_index("containers", "environment").await?;
        self.ensure_index("containers", "collected_at").await?;
        self.ensure_index("checks", "host_id").await?;
        self.ensure_index("checks", "environment").await?;
        self.ensure_index("checks", "collected_at").await?;
        self.ensure_index("vsphere_vms", "environment").await?;
        self.ensure_index("vsphere_vms", "collected_at").await?;
        self.ensure_index("vsphere_hosts", "environment").await?;
        self.ensure_index("vsphere_hosts", "collected_at").await?;
        self.ensure_index("vsphere_datastores", "environment").await?;
        self.ensure_index("vsphere_datastores", "collected_at").await?;
        self.ensure_index("syros_services", "environment").await?;
        self.ensure_index("syros_services", "collected_at").await?;
        Ok(())
    }

    async fn host_upsert(&self, host: &Host) -> Result<()> {
        self.upsert_one("hosts", &host.id, host).await
    }

    async fn containers_upsert(&self, containers: &[Container]) -> Result<()> {
        // Atomic per row: a failure on one container does not roll back
        // ones already applied (§4.5).
        for c in containers {
            if let Err(e) = self.upsert_one("containers", &c.id, c).await {
                error!("container {} upsert failed: {}", c.id, e);
            }
        }
        Ok(())
    }

    async fn health_checks_upsert(&self, checks: &[HealthCheck]) -> Result<()> {
        for c in checks {
            if let Err(e) = self.upsert_one("checks", &c.id, c).await {
                error!("health check {} upsert failed: {}", c.id, e);
            }
        }
        Ok(())
    }

    async fn vms_upsert(&self, vms: &[Vm]) -> Result<()> {
        for vm in vms {
            if let Err(e) = self.upsert_one("vsphere_vms", &vm.id, vm).await {
                error!("vm {} upsert failed: {}", vm.id, e);
            }
        }
        Ok(())
    }

    async fn vsphere_hosts_upsert(&self, hosts: &[Vm]) -> Result<()> {
        for h in hosts {
            if let Err(e) = self.upsert_one("vsphere_hosts", &h.id, h).await {
                error!("vsphere host {} upsert failed: {}", h.id, e);
            }
        }
        Ok(())
    }

    async fn datastores_upsert(&self, stores: &[Datastore]) -> Result<()> {
        for s in stores {
            if let Err(e) = self.upsert_one("vsphere_datastores", &s.id, s).await {
                error!("datastore {} upsert failed: {}", s.id, e);
            }
        }
        Ok(())
    }

    async fn syros_service_upsert(&self, service: &SyrosService) -> Result<()> {
        self.upsert_one("syros_services", &service.id, service).await
    }

    async fn evict_stale(&self, collection: &str, stale: Duration) -> Result<u64> {
        let threshold = Utc::now() - ChronoDuration::from_std(stale).unwrap_or(ChronoDuration::zero());
        let bson_threshold: bson::DateTime = threshold.into();
        let result = self
            .collection(collection)
            .delete_many(doc! { "collected_at": { "$lt": bson_threshold } })
            .await
            .map_err(|e| format_err!("mongodb GC delete on {} failed: {}", collection, e))?;
        Ok(result.deleted_count)
    }
}
