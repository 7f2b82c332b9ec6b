//! Auxiliary policy reconciliation
//!
//! Two checks, independent of resource changes:
//!
//! 1. Backup policy: the desired schedule is always converted and
//!    submitted as a replacement whenever auto-backup is enabled — an
//!    unconditional overwrite, not a diff.
//! 2. Termination policy: compared live vs desired by inequality; drift is
//!    fixed with a single JSON-patch replace.
//!
//! Both run only for backup-capable database types, and the termination
//! check only runs after the backup update succeeded. That nesting couples
//! two unrelated policies; it is the shipped behavior and is preserved
//! as-is (see DESIGN.md).

use json_patch::{Patch as JsonPatch, PatchOperation, ReplaceOperation};
use jsonptr::PointerBuf;
use tracing::{debug, info};

use crate::crd::TerminationPolicy;
use crate::form::DbEditForm;
use crate::platform::client::{ApplyMode, CLUSTER, ClusterOps};
use crate::reconcile::error::Result;
use crate::resources::backup::build_backup_policy;

/// What the policy pass actually did, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub backup_updated: bool,
    pub termination_patched: bool,
}

/// Reconcile backup and termination policy for an edited database.
pub async fn reconcile_policies<C: ClusterOps + ?Sized>(
    platform: &C,
    namespace: &str,
    form: &DbEditForm,
    live_termination: TerminationPolicy,
) -> Result<PolicyOutcome> {
    let mut outcome = PolicyOutcome::default();

    if !form.db_type.supports_auto_backup() {
        debug!(db_type = %form.db_type, "Engine does not support scheduled backups, skipping policy pass");
        return Ok(outcome);
    }

    let auto_backup_enabled = form.auto_backup.as_ref().is_some_and(|b| b.enabled);
    if !auto_backup_enabled {
        debug!("Auto-backup not requested, skipping policy pass");
        return Ok(outcome);
    }

    update_backup_policy(platform, namespace, form).await?;
    outcome.backup_updated = true;

    if live_termination != form.termination_policy {
        patch_termination_policy(platform, namespace, &form.db_name, form.termination_policy)
            .await?;
        outcome.termination_patched = true;
    }

    Ok(outcome)
}

/// Submit the desired backup policy as a whole-document replacement.
pub async fn update_backup_policy<C: ClusterOps + ?Sized>(
    platform: &C,
    namespace: &str,
    form: &DbEditForm,
) -> Result<()> {
    let policy = build_backup_policy(form)?;
    let doc = serde_json::to_value(&policy)?;

    platform.apply(namespace, &[doc], ApplyMode::Replace).await?;
    info!(name = %form.db_name, "Updated backup policy");
    Ok(())
}

/// Replace the cluster's termination policy with a single patch operation.
async fn patch_termination_policy<C: ClusterOps + ?Sized>(
    platform: &C,
    namespace: &str,
    db_name: &str,
    desired: TerminationPolicy,
) -> Result<()> {
    let patch = JsonPatch(vec![PatchOperation::Replace(ReplaceOperation {
        path: PointerBuf::from_tokens(["spec", "terminationPolicy"]),
        value: serde_json::to_value(desired)?,
    })]);

    platform.patch_json(&CLUSTER, namespace, db_name, patch).await?;
    info!(name = %db_name, policy = %desired, "Patched termination policy");
    Ok(())
}
