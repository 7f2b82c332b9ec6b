//! Live-state adaptation
//!
//! Turns a fetched `Cluster` document into the immutable `ResourceSpec`
//! snapshot the detector compares against. The adapted list carries only
//! the fields the console manages; everything else in the document stays
//! with the operator.

use crate::crd::quantity::{parse_cpu_millis, parse_memory_mib, parse_storage_gib};
use crate::crd::{Cluster, ClusterComponentSpec};
use crate::reconcile::detector::ResourceSpec;
use crate::reconcile::error::Result;

/// Volume claim template holding the component's data
const DATA_VOLUME: &str = "data";

/// Extract the live resource-spec list from a fetched cluster document.
pub fn live_resources(cluster: &Cluster) -> Result<Vec<ResourceSpec>> {
    cluster
        .spec
        .component_specs
        .iter()
        .map(adapt_component)
        .collect()
}

fn adapt_component(component: &ClusterComponentSpec) -> Result<ResourceSpec> {
    // Limits are authoritative on this platform; requests are kept equal
    // to limits by the builder, so either works as a fallback.
    let resource_list = component
        .resources
        .as_ref()
        .and_then(|r| r.limits.as_ref().or(r.requests.as_ref()));

    let cpu = match resource_list.and_then(|l| l.cpu.as_deref()) {
        Some(quantity) => parse_cpu_millis(quantity)?,
        None => 0,
    };
    let memory = match resource_list.and_then(|l| l.memory.as_deref()) {
        Some(quantity) => parse_memory_mib(quantity)?,
        None => 0,
    };

    let data_volume = component
        .volume_claim_templates
        .iter()
        .find(|v| v.name == DATA_VOLUME)
        .or_else(|| component.volume_claim_templates.first());
    let storage = match data_volume {
        Some(volume) => parse_storage_gib(&volume.spec.resources.requests.storage)?,
        None => 0,
    };

    Ok(ResourceSpec {
        name: component.name.clone(),
        cpu,
        memory,
        replicas: component.replicas,
        storage,
    })
}
