//! Account documents for a database instance
//!
//! Each cluster gets a ServiceAccount plus a Role/RoleBinding pair so the
//! operator's workloads can read their own pods and publish events. The
//! documents are first submitted without an owner, then re-submitted bound
//! to the cluster's generated uid so they are garbage-collected with it.

use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{PolicyRule, Role, RoleBinding, RoleRef, Subject};
use kube::core::ObjectMeta;
use serde_json::Value;

use crate::form::DbEditForm;
use crate::reconcile::error::Result;
use crate::resources::common::{cluster_owner_reference, standard_labels};

/// Build the account document set for a database instance.
///
/// With `uid` present, every document carries an owner reference to the
/// created cluster.
pub fn build_account_docs(form: &DbEditForm, uid: Option<&str>) -> Result<Vec<Value>> {
    let name = form.db_name.clone();
    let metadata = ObjectMeta {
        name: Some(name.clone()),
        labels: Some(standard_labels(&name)),
        owner_references: uid.map(|uid| vec![cluster_owner_reference(&name, uid)]),
        ..Default::default()
    };

    let service_account = ServiceAccount {
        metadata: metadata.clone(),
        ..Default::default()
    };

    let role = Role {
        metadata: metadata.clone(),
        rules: Some(vec![
            PolicyRule {
                api_groups: Some(vec!["".to_string()]),
                resources: Some(vec!["pods".to_string(), "pods/log".to_string()]),
                verbs: vec!["get".to_string(), "list".to_string(), "watch".to_string()],
                ..Default::default()
            },
            PolicyRule {
                api_groups: Some(vec!["".to_string()]),
                resources: Some(vec!["events".to_string()]),
                verbs: vec!["create".to_string(), "patch".to_string()],
                ..Default::default()
            },
        ]),
    };

    let role_binding = RoleBinding {
        metadata,
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "Role".to_string(),
            name: name.clone(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name,
            ..Default::default()
        }]),
    };

    Ok(vec![
        serde_json::to_value(&service_account)?,
        serde_json::to_value(&role)?,
        serde_json::to_value(&role_binding)?,
    ])
}
