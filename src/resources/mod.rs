//! Generators for the documents the console submits to the platform:
//! cluster and account documents on creation, operation requests on edit,
//! backup-policy documents for schedule reconciliation.

pub mod account;
pub mod backup;
pub mod cluster;
pub mod common;
pub mod ops;

pub use account::build_account_docs;
pub use backup::build_backup_policy;
pub use cluster::build_cluster_resource;
pub use ops::build_ops_request;
