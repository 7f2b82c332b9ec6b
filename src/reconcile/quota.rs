//! Quota gate: precondition check run before any pipeline invocation
//!
//! The gate is a pure function of the desired totals, the previous totals
//! (when editing), and the account's per-resource quota. It reports the
//! first exceeded resource kind, or `None` when the request fits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reconcile::detector::ResourceSpec;

/// Resource dimensions tracked by the quota.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuotaKind {
    Cpu,
    Memory,
    Storage,
}

impl fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaKind::Cpu => write!(f, "cpu"),
            QuotaKind::Memory => write!(f, "memory"),
            QuotaKind::Storage => write!(f, "storage"),
        }
    }
}

/// One quota dimension: consumption so far against the account ceiling.
/// Units: cores for cpu, GiB for memory and storage.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq)]
pub struct QuotaItem {
    #[serde(rename = "type")]
    pub kind: QuotaKind,
    pub used: f64,
    pub limit: f64,
}

/// Aggregate consumption of a resource-spec list, replica-weighted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResourceTotals {
    /// Cores
    pub cpu: f64,
    /// GiB
    pub memory: f64,
    /// GiB
    pub storage: f64,
}

impl ResourceTotals {
    fn get(&self, kind: QuotaKind) -> f64 {
        match kind {
            QuotaKind::Cpu => self.cpu,
            QuotaKind::Memory => self.memory,
            QuotaKind::Storage => self.storage,
        }
    }
}

/// Sum the replica-weighted consumption of a resource-spec list.
pub fn resource_totals(resources: &[ResourceSpec]) -> ResourceTotals {
    resources.iter().fold(ResourceTotals::default(), |mut acc, r| {
        let replicas = r.replicas as f64;
        acc.cpu += r.cpu as f64 / 1000.0 * replicas;
        acc.memory += r.memory as f64 / 1024.0 * replicas;
        acc.storage += r.storage as f64 * replicas;
        acc
    })
}

/// Check the desired allocation against the quota.
///
/// For edits, `previous` holds the allocation currently in effect; the
/// projected usage is the desired total minus the previous total, so an
/// edit that shrinks a resource never trips that dimension. Returns the
/// first exceeded kind in quota order.
pub fn check_quota(
    desired: &[ResourceSpec],
    previous: Option<&[ResourceSpec]>,
    quota: &[QuotaItem],
) -> Option<QuotaKind> {
    let mut request = resource_totals(desired);

    if let Some(previous) = previous {
        let used = resource_totals(previous);
        request.cpu -= used.cpu;
        request.memory -= used.memory;
        request.storage -= used.storage;
    }

    quota
        .iter()
        .find(|item| item.used + request.get(item.kind) > item.limit)
        .map(|item| item.kind)
}
