use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cluster::ResourceList;

/// OpsRequest is one declarative scaling instruction submitted to the
/// cluster operator. Exactly one of the scaling sections is populated,
/// matching `spec.type`.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[kube(
    group = "apps.kubeblocks.io",
    version = "v1alpha1",
    kind = "OpsRequest",
    plural = "opsrequests",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct OpsRequestSpec {
    /// Name of the target cluster
    pub cluster_ref: String,

    #[serde(rename = "type")]
    pub op_type: OperationKind,

    /// Seconds the operator keeps a succeeded request before garbage collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_succeed: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_scaling: Option<Vec<VerticalScalingEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_scaling: Option<Vec<HorizontalScalingEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_expansion: Option<Vec<VolumeExpansionEntry>>,
}

/// The closed set of operation categories the console can request.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq, Hash)]
pub enum OperationKind {
    VerticalScaling,
    HorizontalScaling,
    VolumeExpansion,
}

impl OperationKind {
    /// Lowercase form used in generated resource names.
    pub fn short_name(&self) -> &'static str {
        match self {
            OperationKind::VerticalScaling => "verticalscaling",
            OperationKind::HorizontalScaling => "horizontalscaling",
            OperationKind::VolumeExpansion => "volumeexpansion",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::VerticalScaling => write!(f, "VerticalScaling"),
            OperationKind::HorizontalScaling => write!(f, "HorizontalScaling"),
            OperationKind::VolumeExpansion => write!(f, "VolumeExpansion"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerticalScalingEntry {
    pub component_name: String,
    pub requests: ResourceList,
    pub limits: ResourceList,
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalScalingEntry {
    pub component_name: String,
    pub replicas: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeExpansionEntry {
    pub component_name: String,
    pub volume_claim_templates: Vec<VolumeClaimExpansion>,
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeClaimExpansion {
    /// Volume claim template name (the data volume is "data")
    pub name: String,

    /// New storage quantity (e.g. "10Gi")
    pub storage: String,
}
