use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// BackupPolicy holds the scheduled-backup configuration for one cluster.
///
/// The console rewrites the whole schedule/retention section whenever
/// auto-backup is enabled in an edit; it never patches individual fields.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "dataprotection.kubeblocks.io",
    version = "v1alpha1",
    kind = "BackupPolicy",
    plural = "backuppolicies",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct BackupPolicySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<BackupRetention>,

    pub schedule: BackupSchedule,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupRetention {
    /// Time-to-live for completed backups (e.g. "7d")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupSchedule {
    /// Full datafile backup schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datafile: Option<SchedulePolicy>,
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePolicy {
    /// Standard five-field cron expression
    pub cron_expression: String,

    pub enable: bool,
}
