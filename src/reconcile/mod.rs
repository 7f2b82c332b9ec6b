//! Edit-reconciliation core: change detection, operation classification,
//! policy reconciliation, quota gating, and pipeline orchestration.

pub mod adapt;
pub mod detector;
pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod quota;
pub mod validation;

pub use adapt::live_resources;
pub use detector::{ChangeRecord, ChangeSet, ResourceField, ResourceSpec, classify, detect_changes};
pub use error::{Error, Result};
pub use orchestrator::{
    CreateOutcome, EditOutcome, EditPhase, apply_create, apply_edit,
};
pub use policy::{PolicyOutcome, reconcile_policies, update_backup_policy};
pub use quota::{QuotaItem, QuotaKind, check_quota, resource_totals};
pub use validation::{MAX_REPLICAS, MIN_REPLICAS, validate_form};
