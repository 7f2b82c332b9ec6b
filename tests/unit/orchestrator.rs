//! Edit and create pipeline scenarios with a mock platform

use db_console::crd::TerminationPolicy;
use db_console::platform::ApplyMode;
use db_console::reconcile::{Error, apply_create, apply_edit};

use crate::fixtures::{MockPlatform, daily_backup, live_cluster_doc, mysql_form, seed_cluster};

const NS: &str = "ns-test";

#[tokio::test]
async fn test_no_changes_submits_nothing() {
    let platform = MockPlatform::new();
    let form = mysql_form(1000, 1024, 1, 3);
    seed_cluster(&platform, &form);

    let outcome = apply_edit(&platform, NS, &form).await.unwrap();

    assert_eq!(outcome.submitted_ops, 0);
    assert!(platform.applied_docs().is_empty());
    assert_eq!(platform.patch_count(), 0);
}

#[tokio::test]
async fn test_single_scale_up_submits_one_request() {
    let platform = MockPlatform::new();
    seed_cluster(&platform, &mysql_form(1000, 1024, 1, 3));

    let desired = mysql_form(2000, 1024, 1, 3);
    let outcome = apply_edit(&platform, NS, &desired).await.unwrap();

    assert_eq!(outcome.submitted_ops, 1);

    let docs = platform.applied_docs();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["kind"], "OpsRequest");
    assert_eq!(docs[0]["spec"]["type"], "VerticalScaling");
    assert_eq!(docs[0]["spec"]["clusterRef"], "mydb");
    assert_eq!(
        docs[0]["spec"]["verticalScaling"][0]["limits"]["cpu"],
        "2000m"
    );

    let batches = platform.applied.lock().unwrap();
    assert_eq!(batches[0].mode, ApplyMode::Create);
}

#[tokio::test]
async fn test_multi_field_change_submits_batch() {
    let platform = MockPlatform::new();
    seed_cluster(&platform, &mysql_form(1000, 1024, 1, 3));

    let desired = mysql_form(2000, 1024, 3, 3);
    let outcome = apply_edit(&platform, NS, &desired).await.unwrap();

    assert_eq!(outcome.submitted_ops, 2);

    // Both documents are part of one batch, submitted before success is
    // reported.
    let batches = platform.applied.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let types: Vec<&str> = batches[0]
        .docs
        .iter()
        .map(|d| d["spec"]["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"VerticalScaling"));
    assert!(types.contains(&"HorizontalScaling"));
}

#[tokio::test]
async fn test_missing_cluster_fails_with_not_found() {
    let platform = MockPlatform::new();
    let form = mysql_form(1000, 1024, 1, 3);

    let result = apply_edit(&platform, NS, &form).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(platform.applied_docs().is_empty());
}

#[tokio::test]
async fn test_submitted_batch_survives_policy_failure() {
    let platform = MockPlatform::new();
    let mut live = mysql_form(1000, 1024, 1, 3);
    live.termination_policy = TerminationPolicy::Delete;
    seed_cluster(&platform, &live);

    // cpu change plus termination drift plus backup enabled: the pipeline
    // submits the ops batch and the backup policy, then the termination
    // patch fails.
    let mut desired = mysql_form(2000, 1024, 1, 3);
    desired.termination_policy = TerminationPolicy::WipeOut;
    desired.auto_backup = Some(daily_backup());
    platform.set_fail_patch(true);

    let result = apply_edit(&platform, NS, &desired).await;
    assert!(result.is_err());

    // No rollback: the operation request and backup policy stay applied.
    let kinds = platform.applied_kinds();
    assert!(kinds.contains(&"OpsRequest".to_string()));
    assert!(kinds.contains(&"BackupPolicy".to_string()));
}

#[tokio::test]
async fn test_edit_with_backup_reconciles_policies() {
    let platform = MockPlatform::new();
    seed_cluster(&platform, &mysql_form(1000, 1024, 1, 3));

    let mut desired = mysql_form(1000, 1024, 1, 3);
    desired.auto_backup = Some(daily_backup());

    let outcome = apply_edit(&platform, NS, &desired).await.unwrap();

    assert_eq!(outcome.submitted_ops, 0);
    assert!(outcome.policy.backup_updated);
    assert!(!outcome.policy.termination_patched);
    assert_eq!(platform.applied_kinds(), vec!["BackupPolicy".to_string()]);
}

#[tokio::test]
async fn test_create_binds_account_to_generated_uid() {
    let platform = MockPlatform::new();
    let form = mysql_form(1000, 1024, 1, 3);

    // The fetch after creation returns the platform-assigned uid.
    platform.insert("clusters", "mydb", live_cluster_doc(&form, Some("uid-123")));

    let outcome = apply_create(&platform, NS, &form, None, None).await.unwrap();
    assert_eq!(outcome.uid, "uid-123");

    let batches = platform.applied.lock().unwrap();
    assert_eq!(batches.len(), 2);

    // First batch: account documents plus the cluster, created together.
    assert_eq!(batches[0].mode, ApplyMode::Create);
    let kinds: Vec<&str> = batches[0]
        .docs
        .iter()
        .map(|d| d["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["ServiceAccount", "Role", "RoleBinding", "Cluster"]);

    // Second batch: account documents re-submitted bound to the uid.
    assert_eq!(batches[1].mode, ApplyMode::Replace);
    for doc in &batches[1].docs {
        assert_eq!(doc["metadata"]["ownerReferences"][0]["uid"], "uid-123");
    }
}

#[tokio::test]
async fn test_create_with_backup_submits_policy() {
    let platform = MockPlatform::new();
    let mut form = mysql_form(1000, 1024, 1, 3);
    form.auto_backup = Some(daily_backup());

    platform.insert("clusters", "mydb", live_cluster_doc(&form, Some("uid-123")));

    apply_create(&platform, NS, &form, None, None).await.unwrap();

    let kinds = platform.applied_kinds();
    assert_eq!(kinds.last().map(String::as_str), Some("BackupPolicy"));
}

#[tokio::test]
async fn test_create_failure_propagates() {
    let platform = MockPlatform::new();
    platform.set_fail_apply(true);

    let form = mysql_form(1000, 1024, 1, 3);
    let result = apply_create(&platform, NS, &form, None, None).await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
