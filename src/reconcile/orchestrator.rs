//! Edit and create orchestration
//!
//! The edit pipeline is a fixed sequence: fetch the live document, diff it
//! against the desired form, build one operation request per change,
//! submit the batch, reconcile auxiliary policies, report the outcome.
//! Each step depends on the previous one's result; nothing runs in
//! parallel and nothing is retried. A failure aborts the remaining steps
//! and an already-submitted batch stays in effect — the cluster operator
//! is expected to be idempotent per request.

use std::fmt;

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::crd::Cluster;
use crate::form::{BackupItem, DbEditForm};
use crate::platform::client::{ApplyMode, CLUSTER, ClusterOps};
use crate::reconcile::adapt::live_resources;
use crate::reconcile::detector::detect_changes;
use crate::reconcile::error::{Error, Result};
use crate::reconcile::policy::{PolicyOutcome, reconcile_policies, update_backup_policy};
use crate::resources::account::build_account_docs;
use crate::resources::cluster::build_cluster_resource;
use crate::resources::ops::build_ops_request;

/// Pipeline phases of one edit invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditPhase {
    Fetching,
    Comparing,
    Submitting,
    ReconcilingPolicy,
    Done,
    Failed,
}

impl EditPhase {
    /// Successor phase on the success path; `Done` and `Failed` are
    /// terminal.
    pub fn next(&self) -> Option<EditPhase> {
        match self {
            EditPhase::Fetching => Some(EditPhase::Comparing),
            EditPhase::Comparing => Some(EditPhase::Submitting),
            EditPhase::Submitting => Some(EditPhase::ReconcilingPolicy),
            EditPhase::ReconcilingPolicy => Some(EditPhase::Done),
            EditPhase::Done | EditPhase::Failed => None,
        }
    }
}

impl fmt::Display for EditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditPhase::Fetching => write!(f, "Fetching"),
            EditPhase::Comparing => write!(f, "Comparing"),
            EditPhase::Submitting => write!(f, "Submitting"),
            EditPhase::ReconcilingPolicy => write!(f, "ReconcilingPolicy"),
            EditPhase::Done => write!(f, "Done"),
            EditPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Result of a completed edit pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// Number of operation requests submitted (zero is a valid outcome)
    pub submitted_ops: usize,

    pub policy: PolicyOutcome,
}

/// Result of a completed create pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOutcome {
    /// Uid generated by the platform for the new cluster
    pub uid: String,
}

/// Run the edit pipeline for an existing database.
#[instrument(skip(platform, form), fields(name = %form.db_name, namespace))]
pub async fn apply_edit<C: ClusterOps + ?Sized>(
    platform: &C,
    namespace: &str,
    form: &DbEditForm,
) -> Result<EditOutcome> {
    let doc = step(EditPhase::Fetching, fetch_cluster(platform, namespace, &form.db_name).await)?;
    let cluster: Cluster = step(EditPhase::Fetching, serde_json::from_value(doc).map_err(Error::from))?;

    let live = step(EditPhase::Comparing, live_resources(&cluster))?;
    let live_termination = cluster.spec.termination_policy;
    let desired = form.valid_resources();
    let changes = detect_changes(&desired, &live);

    if !changes.unmatched.is_empty() {
        // Newly-added components are not expressible as operation
        // requests; they are surfaced here rather than silently dropped.
        warn!(
            components = ?changes.unmatched,
            "Desired components have no live counterpart and were not diffed"
        );
    }

    info!(
        changes = changes.records.len(),
        unmatched = changes.unmatched.len(),
        "Detected resource changes"
    );

    let submitted_ops = changes.records.len();
    if !changes.is_empty() {
        let docs = changes
            .records
            .iter()
            .enumerate()
            .map(|(ordinal, record)| {
                let ops = build_ops_request(form, &record.component, record.kind, ordinal)?;
                Ok(serde_json::to_value(&ops)?)
            })
            .collect::<Result<Vec<Value>>>()?;

        step(
            EditPhase::Submitting,
            platform.apply(namespace, &docs, ApplyMode::Create).await,
        )?;
    }

    let policy = step(
        EditPhase::ReconcilingPolicy,
        reconcile_policies(platform, namespace, form, live_termination).await,
    )?;

    info!(submitted_ops, "Edit pipeline complete");
    Ok(EditOutcome {
        submitted_ops,
        policy,
    })
}

/// Run the creation pipeline for a new database.
///
/// The account documents are submitted twice: once before the cluster
/// exists, then re-bound to the generated uid so they share its lifetime.
/// No diffing occurs on creation.
#[instrument(skip(platform, form, backup_info, storage_class), fields(name = %form.db_name, namespace))]
pub async fn apply_create<C: ClusterOps + ?Sized>(
    platform: &C,
    namespace: &str,
    form: &DbEditForm,
    backup_info: Option<&BackupItem>,
    storage_class: Option<&str>,
) -> Result<CreateOutcome> {
    let mut docs = build_account_docs(form, None)?;
    let cluster = build_cluster_resource(form, backup_info, storage_class);
    docs.push(serde_json::to_value(&cluster)?);

    platform.apply(namespace, &docs, ApplyMode::Create).await?;

    let created = fetch_cluster(platform, namespace, &form.db_name).await?;
    let uid = created["metadata"]["uid"]
        .as_str()
        .ok_or(Error::MissingObjectKey("metadata.uid"))?
        .to_string();

    let bound_docs = build_account_docs(form, Some(&uid))?;
    platform
        .apply(namespace, &bound_docs, ApplyMode::Replace)
        .await?;

    if form.db_type.supports_auto_backup()
        && form.auto_backup.as_ref().is_some_and(|b| b.enabled)
    {
        update_backup_policy(platform, namespace, form).await?;
    }

    info!(uid = %uid, "Created database cluster");
    Ok(CreateOutcome { uid })
}

async fn fetch_cluster<C: ClusterOps + ?Sized>(
    platform: &C,
    namespace: &str,
    name: &str,
) -> Result<Value> {
    platform.fetch(&CLUSTER, namespace, name).await
}

/// Annotate a step failure with the phase it happened in. The pipeline
/// transitions to `Failed` and the error propagates unchanged.
fn step<T>(phase: EditPhase, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(phase = %phase, error = %e, "Edit pipeline failed");
    }
    result
}
