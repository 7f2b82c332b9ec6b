pub mod api;
pub mod config;
pub mod crd;
pub mod form;
pub mod health;
pub mod platform;
pub mod reconcile;
pub mod resources;

pub use api::{AppState, router};
pub use config::ConsoleConfig;
pub use crd::{BackupPolicy, Cluster, OperationKind, OpsRequest, TerminationPolicy};
pub use form::{AutoBackupForm, BackupItem, DbEditForm, DbType};
pub use health::{HealthState, Metrics};
pub use platform::{ApplyMode, ClusterOps, GvrRef, KubeClusterOps, QuotaStore};
pub use reconcile::{
    ChangeRecord, ChangeSet, CreateOutcome, EditOutcome, EditPhase, Error, PolicyOutcome,
    Result, apply_create, apply_edit, check_quota, detect_changes,
};
