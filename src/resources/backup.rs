//! Backup-policy document generation
//!
//! Converts the auto-backup form into the full backup-policy document the
//! platform consumes. The whole schedule/retention section is rewritten on
//! every update; there is no field-level patching of a live policy.

use kube::core::ObjectMeta;

use crate::crd::{
    BackupPolicy, BackupPolicySpec, BackupRetention, BackupSchedule, SchedulePolicy,
};
use crate::form::{AutoBackupForm, BackupFrequency, DbEditForm};
use crate::reconcile::error::{Error, Result};
use crate::resources::common::{backup_policy_name, standard_labels};

/// Build the replacement backup-policy document for a database.
pub fn build_backup_policy(form: &DbEditForm) -> Result<BackupPolicy> {
    let backup = form
        .auto_backup
        .as_ref()
        .ok_or_else(|| Error::Validation("auto-backup not requested".to_string()))?;

    let name = backup_policy_name(&form.db_name, form.db_type.cluster_definition());

    Ok(BackupPolicy {
        metadata: ObjectMeta {
            name: Some(name),
            labels: Some(standard_labels(&form.db_name)),
            ..Default::default()
        },
        spec: BackupPolicySpec {
            retention: Some(BackupRetention {
                ttl: Some(retention_ttl(backup)),
            }),
            schedule: BackupSchedule {
                datafile: Some(SchedulePolicy {
                    cron_expression: cron_expression(backup),
                    enable: backup.enabled,
                }),
            },
        },
    })
}

/// Five-field cron expression for the requested cadence.
fn cron_expression(backup: &AutoBackupForm) -> String {
    match backup.frequency {
        BackupFrequency::Hour => format!("{} * * * *", backup.minute),
        BackupFrequency::Day => format!("{} {} * * *", backup.minute, backup.hour),
        BackupFrequency::Week => {
            let days = if backup.week.is_empty() {
                "*".to_string()
            } else {
                backup
                    .week
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            };
            format!("{} {} * * {}", backup.minute, backup.hour, days)
        }
    }
}

/// Platform TTL string, e.g. "7d".
fn retention_ttl(backup: &AutoBackupForm) -> String {
    format!("{}{}", backup.retention_value, backup.retention_unit.suffix())
}
