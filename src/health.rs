//! Health endpoints and Prometheus metrics
//!
//! Provides:
//! - `/healthz` - liveness probe
//! - `/readyz` - readiness probe
//! - `/metrics` - Prometheus metrics

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Labels for per-cluster metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ClusterLabels {
    pub namespace: String,
    pub name: String,
}

impl prometheus_client::encoding::EncodeLabelSet for ClusterLabels {
    fn encode(
        &self,
        mut encoder: prometheus_client::encoding::LabelSetEncoder,
    ) -> Result<(), std::fmt::Error> {
        use prometheus_client::encoding::EncodeLabel;
        ("namespace", self.namespace.as_str()).encode(encoder.encode_label())?;
        ("name", self.name.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Shared metrics state
pub struct Metrics {
    /// Operation requests submitted per cluster
    pub ops_submitted_total: Family<ClusterLabels, Counter>,
    /// Failed edit/create pipelines per cluster
    pub pipeline_failures_total: Family<ClusterLabels, Counter>,
    /// Duration of the edit/create pipeline in seconds
    pub pipeline_duration_seconds: Family<ClusterLabels, Histogram>,

    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let ops_submitted_total = Family::<ClusterLabels, Counter>::default();
        registry.register(
            "db_console_ops_submitted",
            "Total number of operation requests submitted",
            ops_submitted_total.clone(),
        );

        let pipeline_failures_total = Family::<ClusterLabels, Counter>::default();
        registry.register(
            "db_console_pipeline_failures",
            "Total number of failed edit/create pipelines",
            pipeline_failures_total.clone(),
        );

        let pipeline_duration_seconds =
            Family::<ClusterLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.01, 2.0, 12))
            });
        registry.register(
            "db_console_pipeline_duration_seconds",
            "Duration of the edit/create pipeline in seconds",
            pipeline_duration_seconds.clone(),
        );

        Self {
            ops_submitted_total,
            pipeline_failures_total,
            pipeline_duration_seconds,
            registry,
        }
    }

    /// Record a completed pipeline.
    pub fn record_pipeline(&self, namespace: &str, name: &str, ops: usize, duration_secs: f64) {
        let labels = ClusterLabels {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.ops_submitted_total
            .get_or_create(&labels)
            .inc_by(ops as u64);
        self.pipeline_duration_seconds
            .get_or_create(&labels)
            .observe(duration_secs);
    }

    /// Record a failed pipeline.
    pub fn record_failure(&self, namespace: &str, name: &str) {
        let labels = ClusterLabels {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };
        self.pipeline_failures_total.get_or_create(&labels).inc();
    }

    /// Encode metrics to Prometheus text format.
    ///
    /// Returns an empty string if encoding fails (should never happen with
    /// valid metrics).
    fn encode(&self) -> String {
        let mut buffer = String::new();
        if let Err(e) = encode(&mut buffer, &self.registry) {
            tracing::error!("Failed to encode metrics: {}", e);
            return String::new();
        }
        buffer
    }
}

/// Shared state for the health endpoints
pub struct HealthState {
    /// Whether the console is ready (connected to the platform API)
    pub ready: RwLock<bool>,
    pub metrics: Metrics,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            ready: RwLock::new(false),
            metrics: Metrics::new(),
        }
    }

    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    pub async fn is_ready(&self) -> bool {
        *self.ready.read().await
    }
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(State(state): State<Arc<HealthState>>) -> Response {
    if state.is_ready().await {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

async fn metrics(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let body = state.metrics.encode();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// Router serving the health and metrics endpoints.
pub fn router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}
