//! Cluster platform client
//!
//! The reconciliation core talks to the platform through the `ClusterOps`
//! trait: fetch one custom-resource document, apply a batch of serialized
//! documents, or apply a JSON patch. The kube-backed implementation works
//! over dynamic objects so one client covers every document kind the
//! console produces.

use async_trait::async_trait;
use json_patch::Patch as JsonPatch;
use kube::api::{Patch, PatchParams, PostParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

use crate::reconcile::error::{Error, Result};
use crate::resources::common::{
    API_VERSION, APPS_GROUP, BACKUP_POLICY_KIND, BACKUP_POLICY_PLURAL, CLUSTER_KIND,
    CLUSTER_PLURAL, DATAPROTECTION_GROUP, FIELD_MANAGER, OPS_REQUEST_KIND, OPS_REQUEST_PLURAL,
};

/// Group/version/plural coordinates of a resource the console touches.
#[derive(Clone, Copy, Debug)]
pub struct GvrRef {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
}

/// The database cluster resource
pub const CLUSTER: GvrRef = GvrRef {
    group: APPS_GROUP,
    version: API_VERSION,
    kind: CLUSTER_KIND,
    plural: CLUSTER_PLURAL,
};

/// The namespace resource-quota object backing the quota gate
pub const RESOURCE_QUOTA: GvrRef = GvrRef {
    group: "",
    version: "v1",
    kind: "ResourceQuota",
    plural: "resourcequotas",
};

/// How a document batch is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyMode {
    /// Create new objects; fails if one already exists
    Create,
    /// Overwrite existing objects (server-side apply)
    Replace,
}

/// External interface to the cluster platform.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Fetch one namespaced custom-resource document.
    async fn fetch(&self, gvr: &GvrRef, namespace: &str, name: &str) -> Result<Value>;

    /// Submit a batch of serialized documents.
    async fn apply(&self, namespace: &str, docs: &[Value], mode: ApplyMode) -> Result<()>;

    /// Apply a JSON patch to one document.
    async fn patch_json(
        &self,
        gvr: &GvrRef,
        namespace: &str,
        name: &str,
        patch: JsonPatch,
    ) -> Result<Value>;
}

/// Kube-backed platform client.
#[derive(Clone)]
pub struct KubeClusterOps {
    client: Client,
}

impl KubeClusterOps {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn dynamic_api(&self, gvr: &GvrRef, namespace: &str) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk(gvr.group, gvr.version, gvr.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, gvr.plural);
        Api::namespaced_with(self.client.clone(), namespace, &resource)
    }

    /// Resolve the API coordinates of a serialized document from its
    /// apiVersion/kind. Only the kinds the console generates are routable.
    fn doc_gvr(doc: &Value) -> Result<GvrRef> {
        let api_version = doc["apiVersion"]
            .as_str()
            .ok_or(Error::MissingObjectKey("apiVersion"))?;
        let kind = doc["kind"].as_str().ok_or(Error::MissingObjectKey("kind"))?;

        let gvr = match (api_version, kind) {
            ("apps.kubeblocks.io/v1alpha1", CLUSTER_KIND) => CLUSTER,
            ("apps.kubeblocks.io/v1alpha1", OPS_REQUEST_KIND) => GvrRef {
                group: APPS_GROUP,
                version: API_VERSION,
                kind: OPS_REQUEST_KIND,
                plural: OPS_REQUEST_PLURAL,
            },
            ("dataprotection.kubeblocks.io/v1alpha1", BACKUP_POLICY_KIND) => GvrRef {
                group: DATAPROTECTION_GROUP,
                version: API_VERSION,
                kind: BACKUP_POLICY_KIND,
                plural: BACKUP_POLICY_PLURAL,
            },
            ("v1", "ServiceAccount") => GvrRef {
                group: "",
                version: "v1",
                kind: "ServiceAccount",
                plural: "serviceaccounts",
            },
            ("rbac.authorization.k8s.io/v1", "Role") => GvrRef {
                group: "rbac.authorization.k8s.io",
                version: "v1",
                kind: "Role",
                plural: "roles",
            },
            ("rbac.authorization.k8s.io/v1", "RoleBinding") => GvrRef {
                group: "rbac.authorization.k8s.io",
                version: "v1",
                kind: "RoleBinding",
                plural: "rolebindings",
            },
            _ => {
                return Err(Error::Validation(format!(
                    "cannot route document {api_version}/{kind}"
                )));
            }
        };
        Ok(gvr)
    }
}

#[async_trait]
impl ClusterOps for KubeClusterOps {
    async fn fetch(&self, gvr: &GvrRef, namespace: &str, name: &str) -> Result<Value> {
        let api = self.dynamic_api(gvr, namespace);

        let object = api.get(name).await.map_err(|e| match e {
            kube::Error::Api(response) if response.code == 404 => {
                Error::NotFound(format!("{}/{name}", gvr.plural))
            }
            other => Error::Kube(other),
        })?;

        Ok(serde_json::to_value(&object)?)
    }

    async fn apply(&self, namespace: &str, docs: &[Value], mode: ApplyMode) -> Result<()> {
        for doc in docs {
            let gvr = Self::doc_gvr(doc)?;
            let object: DynamicObject = serde_json::from_value(doc.clone())?;
            let name = object
                .metadata
                .name
                .clone()
                .ok_or(Error::MissingObjectKey("metadata.name"))?;
            let api = self.dynamic_api(&gvr, namespace);

            match mode {
                ApplyMode::Create => {
                    api.create(&PostParams::default(), &object).await?;
                }
                ApplyMode::Replace => {
                    let params = PatchParams::apply(FIELD_MANAGER).force();
                    api.patch(&name, &params, &Patch::Apply(&object)).await?;
                }
            }
            debug!(kind = gvr.kind, name = %name, ?mode, "Applied document");
        }

        Ok(())
    }

    async fn patch_json(
        &self,
        gvr: &GvrRef,
        namespace: &str,
        name: &str,
        patch: JsonPatch,
    ) -> Result<Value> {
        let api = self.dynamic_api(gvr, namespace);

        let object = api
            .patch(name, &PatchParams::default(), &Patch::Json::<()>(patch))
            .await?;
        debug!(kind = gvr.kind, name = %name, "Patched document");

        Ok(serde_json::to_value(&object)?)
    }
}
