//! Shared fixtures: a mock platform client and form builders

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use json_patch::Patch as JsonPatch;
use serde_json::Value;

use db_console::crd::TerminationPolicy;
use db_console::form::{AutoBackupForm, BackupFrequency, DbEditForm, DbType, RetentionUnit};
use db_console::platform::{ApplyMode, ClusterOps, GvrRef};
use db_console::reconcile::detector::ResourceSpec;
use db_console::reconcile::{Error, Result};
use db_console::resources::build_cluster_resource;

/// One recorded apply call
pub struct AppliedBatch {
    pub mode: ApplyMode,
    pub docs: Vec<Value>,
}

/// One recorded JSON-patch call
pub struct RecordedPatch {
    pub name: String,
    pub patch: JsonPatch,
}

/// In-memory platform client recording every call.
#[derive(Default)]
pub struct MockPlatform {
    /// (plural, name) -> document returned by fetch
    pub objects: Mutex<HashMap<(String, String), Value>>,
    pub applied: Mutex<Vec<AppliedBatch>>,
    pub patched: Mutex<Vec<RecordedPatch>>,
    pub fail_apply: Mutex<bool>,
    pub fail_patch: Mutex<bool>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, plural: &str, name: &str, doc: Value) {
        self.objects
            .lock()
            .unwrap()
            .insert((plural.to_string(), name.to_string()), doc);
    }

    pub fn set_fail_apply(&self, fail: bool) {
        *self.fail_apply.lock().unwrap() = fail;
    }

    pub fn set_fail_patch(&self, fail: bool) {
        *self.fail_patch.lock().unwrap() = fail;
    }

    /// All documents applied so far, flattened across batches.
    pub fn applied_docs(&self) -> Vec<Value> {
        self.applied
            .lock()
            .unwrap()
            .iter()
            .flat_map(|batch| batch.docs.clone())
            .collect()
    }

    pub fn applied_kinds(&self) -> Vec<String> {
        self.applied_docs()
            .iter()
            .map(|doc| doc["kind"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn patch_count(&self) -> usize {
        self.patched.lock().unwrap().len()
    }
}

#[async_trait]
impl ClusterOps for MockPlatform {
    async fn fetch(&self, gvr: &GvrRef, _namespace: &str, name: &str) -> Result<Value> {
        self.objects
            .lock()
            .unwrap()
            .get(&(gvr.plural.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{}/{name}", gvr.plural)))
    }

    async fn apply(&self, _namespace: &str, docs: &[Value], mode: ApplyMode) -> Result<()> {
        if *self.fail_apply.lock().unwrap() {
            return Err(Error::Transport("injected apply failure".to_string()));
        }
        self.applied.lock().unwrap().push(AppliedBatch {
            mode,
            docs: docs.to_vec(),
        });
        Ok(())
    }

    async fn patch_json(
        &self,
        _gvr: &GvrRef,
        _namespace: &str,
        name: &str,
        patch: JsonPatch,
    ) -> Result<Value> {
        if *self.fail_patch.lock().unwrap() {
            return Err(Error::Transport("injected patch failure".to_string()));
        }
        self.patched.lock().unwrap().push(RecordedPatch {
            name: name.to_string(),
            patch,
        });
        Ok(Value::Null)
    }
}

pub fn resource(name: &str, cpu: i64, memory: i64, replicas: i32, storage: i64) -> ResourceSpec {
    ResourceSpec {
        name: name.to_string(),
        cpu,
        memory,
        replicas,
        storage,
    }
}

/// A single-component mysql form.
pub fn mysql_form(cpu: i64, memory: i64, replicas: i32, storage: i64) -> DbEditForm {
    DbEditForm {
        db_name: "mydb".to_string(),
        db_type: DbType::ApecloudMysql,
        db_version: "ac-mysql-8.0.30".to_string(),
        termination_policy: TerminationPolicy::Delete,
        resources: vec![resource("mysql", cpu, memory, replicas, storage)],
        auto_backup: None,
    }
}

/// Daily auto-backup at 02:30 retained for a week.
pub fn daily_backup() -> AutoBackupForm {
    AutoBackupForm {
        enabled: true,
        frequency: BackupFrequency::Day,
        week: vec![],
        hour: 2,
        minute: 30,
        retention_value: 7,
        retention_unit: RetentionUnit::Days,
    }
}

/// Serialize a form into the live cluster document a fetch would return.
pub fn live_cluster_doc(form: &DbEditForm, uid: Option<&str>) -> Value {
    let cluster = build_cluster_resource(form, None, None);
    let mut doc = serde_json::to_value(&cluster).unwrap();
    if let Some(uid) = uid {
        doc["metadata"]["uid"] = Value::String(uid.to_string());
    }
    doc
}

/// Seed the mock with a live cluster matching the given form.
pub fn seed_cluster(platform: &MockPlatform, form: &DbEditForm) {
    platform.insert("clusters", &form.db_name, live_cluster_doc(form, Some("uid-live")));
}
