//! Operation-request document generation
//!
//! One `OpsRequest` per change record: a vertical-scaling request carries
//! the component's desired cpu and memory, a horizontal-scaling request the
//! desired replica count, a volume-expansion request the desired storage
//! size of the data volume.

use kube::core::ObjectMeta;

use crate::crd::quantity::{format_cpu, format_memory, format_storage};
use crate::crd::{
    HorizontalScalingEntry, OperationKind, OpsRequest, OpsRequestSpec, ResourceList,
    VerticalScalingEntry, VolumeClaimExpansion, VolumeExpansionEntry,
};
use crate::form::DbEditForm;
use crate::reconcile::error::{Error, Result};
use crate::resources::common::standard_labels;

/// Succeeded requests are garbage-collected by the operator after this many seconds.
const OPS_TTL_SECONDS: i32 = 30;

/// Build one operation-request document for a classified change.
///
/// `ordinal` disambiguates names when one edit produces several requests
/// of the same kind (cpu and memory both changed, two vertical-scaling
/// documents).
pub fn build_ops_request(
    form: &DbEditForm,
    component: &str,
    kind: OperationKind,
    ordinal: usize,
) -> Result<OpsRequest> {
    let resource = form.resource_for(component).ok_or_else(|| {
        Error::Validation(format!("component {component:?} missing from edit form"))
    })?;

    let mut spec = OpsRequestSpec {
        cluster_ref: form.db_name.clone(),
        op_type: kind,
        ttl_seconds_after_succeed: Some(OPS_TTL_SECONDS),
        vertical_scaling: None,
        horizontal_scaling: None,
        volume_expansion: None,
    };

    match kind {
        OperationKind::VerticalScaling => {
            let allocation = ResourceList {
                cpu: Some(format_cpu(resource.cpu)),
                memory: Some(format_memory(resource.memory)),
            };
            spec.vertical_scaling = Some(vec![VerticalScalingEntry {
                component_name: component.to_string(),
                requests: allocation.clone(),
                limits: allocation,
            }]);
        }
        OperationKind::HorizontalScaling => {
            spec.horizontal_scaling = Some(vec![HorizontalScalingEntry {
                component_name: component.to_string(),
                replicas: resource.replicas,
            }]);
        }
        OperationKind::VolumeExpansion => {
            spec.volume_expansion = Some(vec![VolumeExpansionEntry {
                component_name: component.to_string(),
                volume_claim_templates: vec![VolumeClaimExpansion {
                    name: "data".to_string(),
                    storage: format_storage(resource.storage),
                }],
            }]);
        }
    }

    Ok(OpsRequest {
        metadata: ObjectMeta {
            name: Some(ops_request_name(&form.db_name, kind, ordinal)),
            labels: Some(standard_labels(&form.db_name)),
            ..Default::default()
        },
        spec,
    })
}

fn ops_request_name(db_name: &str, kind: OperationKind, ordinal: usize) -> String {
    let stamp = chrono::Utc::now().format("%y%m%d%H%M%S");
    format!("{db_name}-{}-{stamp}-{ordinal}", kind.short_name())
}
