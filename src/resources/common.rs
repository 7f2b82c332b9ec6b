//! Shared constants and helpers for generated platform documents

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

/// API group of the cluster and operation-request resources
pub const APPS_GROUP: &str = "apps.kubeblocks.io";

/// API group of the backup-policy resource
pub const DATAPROTECTION_GROUP: &str = "dataprotection.kubeblocks.io";

/// API version shared by both groups
pub const API_VERSION: &str = "v1alpha1";

pub const CLUSTER_KIND: &str = "Cluster";
pub const CLUSTER_PLURAL: &str = "clusters";

pub const OPS_REQUEST_KIND: &str = "OpsRequest";
pub const OPS_REQUEST_PLURAL: &str = "opsrequests";

pub const BACKUP_POLICY_KIND: &str = "BackupPolicy";
pub const BACKUP_POLICY_PLURAL: &str = "backuppolicies";

/// Field manager name for server-side apply
pub const FIELD_MANAGER: &str = "db-console";

/// Name of the backup policy object the operator creates per cluster.
pub fn backup_policy_name(db_name: &str, definition: &str) -> String {
    format!("{db_name}-{definition}-backup-policy")
}

/// Standard labels stamped on every document the console creates.
pub fn standard_labels(db_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app.kubernetes.io/instance".to_string(), db_name.to_string()),
        (
            "app.kubernetes.io/managed-by".to_string(),
            FIELD_MANAGER.to_string(),
        ),
    ])
}

/// Owner reference binding a derived document to its cluster.
///
/// Garbage collection of account objects follows the cluster's lifetime
/// once the generated uid is known.
pub fn cluster_owner_reference(db_name: &str, uid: &str) -> OwnerReference {
    OwnerReference {
        api_version: format!("{APPS_GROUP}/{API_VERSION}"),
        kind: CLUSTER_KIND.to_string(),
        name: db_name.to_string(),
        uid: uid.to_string(),
        controller: Some(true),
        block_owner_deletion: Some(false),
    }
}
