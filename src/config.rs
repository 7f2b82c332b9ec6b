//! Runtime configuration from environment variables

use tracing::warn;

/// Console configuration. Every value has a default so the binary runs
/// unconfigured in a dev cluster.
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Namespace holding the managed clusters
    pub namespace: String,

    /// Storage class for new data volumes; the platform default applies
    /// when unset
    pub storage_class: Option<String>,

    /// Name of the `ResourceQuota` object backing the quota gate
    pub quota_name: String,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let namespace = std::env::var("TARGET_NAMESPACE").unwrap_or_else(|_| {
            warn!("TARGET_NAMESPACE not set, using 'default'");
            "default".to_string()
        });

        let storage_class = std::env::var("STORAGE_CLASSNAME").ok();

        let quota_name =
            std::env::var("QUOTA_NAME").unwrap_or_else(|_| "quota".to_string());

        Self {
            bind_addr,
            namespace,
            storage_class,
            quota_name,
        }
    }
}
