//! Resource change detection for database edits
//!
//! Compares two immutable resource-spec snapshots (desired vs live) and
//! produces one typed change record per differing field. Classification of
//! a field into an operation category is a total mapping with an explicit
//! default arm, so the detector can never fail.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::OperationKind;

/// Resource allocation of one logical database component.
///
/// Units are fixed: millicores, MiB, GiB. Component names are unique
/// within one database instance.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
pub struct ResourceSpec {
    pub name: String,
    /// Millicores
    pub cpu: i64,
    /// MiB
    pub memory: i64,
    pub replicas: i32,
    /// GiB
    pub storage: i64,
}

/// The scalar fields compared between desired and live specs.
///
/// An explicit enumeration, compared one by one; nothing is derived from
/// struct layout or field iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceField {
    Cpu,
    Memory,
    Replicas,
    Storage,
}

/// Comparison order for change records of one component.
pub const COMPARED_FIELDS: [ResourceField; 4] = [
    ResourceField::Cpu,
    ResourceField::Memory,
    ResourceField::Replicas,
    ResourceField::Storage,
];

/// Map a changed field to its operation category.
///
/// Total over `ResourceField`; the default arm covers storage and any
/// field added later.
pub fn classify(field: ResourceField) -> OperationKind {
    match field {
        ResourceField::Cpu | ResourceField::Memory => OperationKind::VerticalScaling,
        ResourceField::Replicas => OperationKind::HorizontalScaling,
        _ => OperationKind::VolumeExpansion,
    }
}

/// One detected difference: which component, and what category of
/// operation fixes it. Consumed immediately by the request builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: OperationKind,
    pub component: String,
}

/// Result of one detection pass.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    /// One record per differing field per matched component, in input order
    pub records: Vec<ChangeRecord>,

    /// Desired components with no live counterpart. These produce no
    /// change records; callers surface them instead of silently dropping
    /// them.
    pub unmatched: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Diff the desired resource list against the live one.
///
/// For each desired entry, the first live entry with the same name that is
/// not wholly equal is compared field by field; every differing field
/// yields one record. A component with both cpu and replicas changed
/// yields two records. Records are not deduplicated per component.
pub fn detect_changes(desired: &[ResourceSpec], live: &[ResourceSpec]) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for want in desired {
        let Some(have) = live.iter().find(|l| l.name == want.name && *l != want) else {
            if !live.iter().any(|l| l.name == want.name) {
                changes.unmatched.push(want.name.clone());
            }
            continue;
        };

        for field in COMPARED_FIELDS {
            let differs = match field {
                ResourceField::Cpu => want.cpu != have.cpu,
                ResourceField::Memory => want.memory != have.memory,
                ResourceField::Replicas => want.replicas != have.replicas,
                ResourceField::Storage => want.storage != have.storage,
            };
            if differs {
                changes.records.push(ChangeRecord {
                    kind: classify(field),
                    component: want.name.clone(),
                });
            }
        }
    }

    changes
}
