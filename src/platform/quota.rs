//! Quota store
//!
//! Reads the namespace `ResourceQuota` object and adapts it into the quota
//! items the gate consumes. Values are cached for the process lifetime and
//! refreshed on demand.

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::crd::quantity::{parse_cpu_millis, parse_memory_mib, parse_storage_gib};
use crate::platform::client::{ClusterOps, RESOURCE_QUOTA};
use crate::reconcile::error::{Error, Result};
use crate::reconcile::quota::{QuotaItem, QuotaKind};

/// Process-lifetime cache of the account quota.
#[derive(Default)]
pub struct QuotaStore {
    cached: RwLock<Option<Vec<QuotaItem>>>,
}

impl QuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached quota, loading it on first use.
    ///
    /// A missing quota object means the namespace is unmetered; the gate
    /// is disabled and an empty item list is cached.
    pub async fn get<C: ClusterOps + ?Sized>(
        &self,
        platform: &C,
        namespace: &str,
        quota_name: &str,
    ) -> Result<Vec<QuotaItem>> {
        if let Some(items) = self.cached.read().await.as_ref() {
            return Ok(items.clone());
        }
        self.refresh(platform, namespace, quota_name).await
    }

    /// Re-read the quota object and replace the cache.
    pub async fn refresh<C: ClusterOps + ?Sized>(
        &self,
        platform: &C,
        namespace: &str,
        quota_name: &str,
    ) -> Result<Vec<QuotaItem>> {
        let items = match platform.fetch(&RESOURCE_QUOTA, namespace, quota_name).await {
            Ok(doc) => adapt_resource_quota(&doc)?,
            Err(Error::NotFound(_)) => {
                warn!(namespace, quota_name, "No resource quota found, quota gate disabled");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        debug!(namespace, items = items.len(), "Loaded quota");
        *self.cached.write().await = Some(items.clone());
        Ok(items)
    }
}

/// Adapt a `ResourceQuota` document into gate items.
///
/// Limits-class keys take precedence over requests-class keys for cpu and
/// memory; storage only exists as a requests-class key.
pub fn adapt_resource_quota(doc: &Value) -> Result<Vec<QuotaItem>> {
    let status = &doc["status"];
    let hard = &status["hard"];
    let used = &status["used"];

    let mut items = Vec::new();

    for (kind, keys) in [
        (QuotaKind::Cpu, ["limits.cpu", "requests.cpu"].as_slice()),
        (QuotaKind::Memory, ["limits.memory", "requests.memory"].as_slice()),
        (QuotaKind::Storage, ["requests.storage"].as_slice()),
    ] {
        let Some(key) = keys.iter().find(|k| hard.get(**k).is_some()) else {
            continue;
        };

        let limit = parse_quota_value(kind, &hard[*key])?;
        let consumed = match used.get(*key) {
            Some(value) => parse_quota_value(kind, value)?,
            None => 0.0,
        };

        items.push(QuotaItem {
            kind,
            used: consumed,
            limit,
        });
    }

    Ok(items)
}

/// Normalize one quota quantity into gate units (cores / GiB).
fn parse_quota_value(kind: QuotaKind, value: &Value) -> Result<f64> {
    let quantity = value
        .as_str()
        .ok_or_else(|| Error::InvalidQuantity(format!("quota value is not a string: {value}")))?;

    let normalized = match kind {
        QuotaKind::Cpu => parse_cpu_millis(quantity)? as f64 / 1000.0,
        QuotaKind::Memory => parse_memory_mib(quantity)? as f64 / 1024.0,
        QuotaKind::Storage => parse_storage_gib(quantity)? as f64,
    };
    Ok(normalized)
}
