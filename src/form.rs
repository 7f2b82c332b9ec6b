//! Edit form model shared by the API boundary and the reconciliation core
//!
//! A `DbEditForm` is the desired state a caller submits: the database type,
//! the per-component resource allocations, the termination policy, and the
//! optional auto-backup schedule. The same form drives both creation and
//! edit-reconciliation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crd::TerminationPolicy;
use crate::reconcile::detector::ResourceSpec;

/// Database engines the console can provision.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DbType {
    ApecloudMysql,
    Postgresql,
    Mongodb,
    Redis,
    Kafka,
}

impl DbType {
    /// Valid component names for this database type. Form resources are
    /// filtered to this set before diffing.
    pub fn components(&self) -> &'static [&'static str] {
        match self {
            DbType::ApecloudMysql => &["mysql"],
            DbType::Postgresql => &["postgresql"],
            DbType::Mongodb => &["mongodb"],
            DbType::Redis => &["redis", "redis-sentinel"],
            DbType::Kafka => &["kafka-server", "kafka-broker", "kafka-exporter"],
        }
    }

    /// Whether the platform supports scheduled backups for this engine.
    pub fn supports_auto_backup(&self) -> bool {
        !matches!(self, DbType::Kafka)
    }

    /// Cluster definition the platform provisions this engine from.
    pub fn cluster_definition(&self) -> &'static str {
        match self {
            DbType::ApecloudMysql => "apecloud-mysql",
            DbType::Postgresql => "postgresql",
            DbType::Mongodb => "mongodb",
            DbType::Redis => "redis",
            DbType::Kafka => "kafka",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cluster_definition())
    }
}

/// Desired state for one database instance as submitted by a caller.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DbEditForm {
    pub db_name: String,

    pub db_type: DbType,

    /// Engine version reference (e.g. "ac-mysql-8.0.30")
    pub db_version: String,

    #[serde(default)]
    pub termination_policy: TerminationPolicy,

    /// Desired allocation per component; names must be unique and belong
    /// to the database type
    pub resources: Vec<ResourceSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_backup: Option<AutoBackupForm>,
}

impl DbEditForm {
    /// Desired resources restricted to the components valid for the type.
    pub fn valid_resources(&self) -> Vec<ResourceSpec> {
        let components = self.db_type.components();
        self.resources
            .iter()
            .filter(|r| components.contains(&r.name.as_str()))
            .cloned()
            .collect()
    }

    /// Look up the desired spec for one component.
    pub fn resource_for(&self, component: &str) -> Option<&ResourceSpec> {
        self.resources.iter().find(|r| r.name == component)
    }
}

/// Requested backup cadence.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    Hour,
    Day,
    Week,
}

/// Retention unit for completed backups.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RetentionUnit {
    Days,
    Weeks,
    Months,
}

impl RetentionUnit {
    /// Suffix used in the platform's TTL strings ("7d", "2w", "1m").
    pub fn suffix(&self) -> &'static str {
        match self {
            RetentionUnit::Days => "d",
            RetentionUnit::Weeks => "w",
            RetentionUnit::Months => "m",
        }
    }
}

/// Desired auto-backup schedule from the edit form.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoBackupForm {
    pub enabled: bool,

    pub frequency: BackupFrequency,

    /// Days of week (0 = Sunday) when frequency is weekly
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub week: Vec<u8>,

    #[serde(default)]
    pub hour: u8,

    #[serde(default)]
    pub minute: u8,

    /// Retention amount, interpreted with `retention_unit`
    pub retention_value: u32,

    pub retention_unit: RetentionUnit,
}

/// Reference to an existing backup to restore from on creation.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupItem {
    pub name: String,
}
