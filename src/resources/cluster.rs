//! Cluster document generation for the creation path

use std::collections::BTreeMap;

use kube::core::ObjectMeta;

use crate::crd::quantity::{format_cpu, format_memory, format_storage};
use crate::crd::{
    Cluster, ClusterComponentSpec, ClusterSpec, ResourceList, ResourceRequirements,
    StorageQuantity, VolumeClaimSpec, VolumeClaimTemplate, VolumeResourceRequests,
};
use crate::form::{BackupItem, DbEditForm};
use crate::reconcile::detector::ResourceSpec;
use crate::resources::common::standard_labels;

/// Annotation instructing the operator to seed the new cluster from an
/// existing backup.
const RESTORE_FROM_BACKUP_ANNOTATION: &str = "kubeblocks.io/restore-from-backup";

/// Build the cluster custom resource for a create request.
///
/// Requests are set equal to limits so the adapted live state reads back
/// exactly what the form asked for.
pub fn build_cluster_resource(
    form: &DbEditForm,
    backup_info: Option<&BackupItem>,
    storage_class: Option<&str>,
) -> Cluster {
    let component_specs = form
        .valid_resources()
        .iter()
        .map(|resource| component_spec(resource, storage_class))
        .collect();

    let mut annotations = BTreeMap::new();
    if let Some(backup) = backup_info {
        // The operator expects a per-component map keyed by the first
        // component of the definition.
        let component = form.db_type.components()[0];
        let restore = serde_json::json!({ component: { "name": backup.name } });
        annotations.insert(RESTORE_FROM_BACKUP_ANNOTATION.to_string(), restore.to_string());
    }

    Cluster {
        metadata: ObjectMeta {
            name: Some(form.db_name.clone()),
            labels: Some(standard_labels(&form.db_name)),
            annotations: (!annotations.is_empty()).then_some(annotations),
            ..Default::default()
        },
        spec: ClusterSpec {
            cluster_definition_ref: form.db_type.cluster_definition().to_string(),
            cluster_version_ref: form.db_version.clone(),
            termination_policy: form.termination_policy,
            component_specs,
        },
        status: None,
    }
}

fn component_spec(resource: &ResourceSpec, storage_class: Option<&str>) -> ClusterComponentSpec {
    let allocation = ResourceList {
        cpu: Some(format_cpu(resource.cpu)),
        memory: Some(format_memory(resource.memory)),
    };

    ClusterComponentSpec {
        name: resource.name.clone(),
        component_def_ref: resource.name.clone(),
        replicas: resource.replicas,
        resources: Some(ResourceRequirements {
            limits: Some(allocation.clone()),
            requests: Some(allocation),
        }),
        volume_claim_templates: vec![VolumeClaimTemplate {
            name: "data".to_string(),
            spec: VolumeClaimSpec {
                access_modes: vec!["ReadWriteOnce".to_string()],
                storage_class_name: storage_class.map(str::to_string),
                resources: VolumeResourceRequests {
                    requests: StorageQuantity {
                        storage: format_storage(resource.storage),
                    },
                },
            },
        }],
    }
}
