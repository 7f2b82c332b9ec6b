//! External collaborators: the cluster platform client and the quota store.

pub mod client;
pub mod quota;

pub use client::{ApplyMode, CLUSTER, ClusterOps, GvrRef, KubeClusterOps, RESOURCE_QUOTA};
pub use quota::QuotaStore;
