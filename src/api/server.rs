//! HTTP API boundary
//!
//! One endpoint creates or edits a database depending on `isEdit`; the
//! response is a flat message on success and a `{code, error}` pair on
//! failure. Validation and quota failures are caught before the pipeline
//! starts; everything the pipeline itself raises collapses to a generic
//! server error.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ConsoleConfig;
use crate::form::{BackupItem, DbEditForm};
use crate::health::{self, HealthState};
use crate::platform::client::{CLUSTER, ClusterOps};
use crate::platform::quota::QuotaStore;
use crate::reconcile::adapt::live_resources;
use crate::reconcile::detector::ResourceSpec;
use crate::reconcile::error::Error;
use crate::reconcile::orchestrator::{apply_create, apply_edit};
use crate::reconcile::quota::check_quota;
use crate::reconcile::validation::validate_form;

/// Shared state for the API handlers
pub struct AppState {
    pub platform: Arc<dyn ClusterOps>,
    pub quota: QuotaStore,
    pub config: ConsoleConfig,
    pub health: Arc<HealthState>,
}

/// Create-or-edit request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDatabaseRequest {
    pub db_form: DbEditForm,
    pub is_edit: bool,
    #[serde(default)]
    pub backup_info: Option<BackupItem>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
}

#[derive(Debug, Serialize)]
struct QuotaResponse {
    quota: Vec<crate::reconcile::quota::QuotaItem>,
}

/// Build the console router, health endpoints included.
pub fn router(state: Arc<AppState>) -> Router {
    let health_state = state.health.clone();
    Router::new()
        .route("/api/v1/databases", post(apply_database))
        .route("/api/v1/quota", get(get_quota))
        .with_state(state)
        .merge(health::router(health_state))
}

/// Create or edit a database cluster.
async fn apply_database(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ApplyDatabaseRequest>,
) -> Response {
    let form = &request.db_form;
    let namespace = &state.config.namespace;

    if let Err(e) = validate_form(form) {
        warn!(name = %form.db_name, error = %e, "Rejected invalid form");
        return error_response(StatusCode::BAD_REQUEST, &e);
    }

    match quota_gate(&state, form, request.is_edit).await {
        Ok(()) => {}
        Err(e @ Error::QuotaExceeded(_)) => {
            warn!(name = %form.db_name, error = %e, "Rejected by quota gate");
            return error_response(StatusCode::FORBIDDEN, &e);
        }
        Err(e) => {
            error!(name = %form.db_name, error = %e, "Quota lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e);
        }
    }

    let started = Instant::now();
    let result = if request.is_edit {
        apply_edit(state.platform.as_ref(), namespace, form)
            .await
            .map(|outcome| {
                (
                    outcome.submitted_ops,
                    format!(
                        "Successfully submitted {} change requests",
                        outcome.submitted_ops
                    ),
                )
            })
    } else {
        apply_create(
            state.platform.as_ref(),
            namespace,
            form,
            request.backup_info.as_ref(),
            state.config.storage_class.as_deref(),
        )
        .await
        .map(|_| (0, "success create db".to_string()))
    };

    match result {
        Ok((ops, message)) => {
            state.health.metrics.record_pipeline(
                namespace,
                &form.db_name,
                ops,
                started.elapsed().as_secs_f64(),
            );
            info!(name = %form.db_name, ops, "Request handled");
            (StatusCode::OK, Json(MessageResponse { message })).into_response()
        }
        Err(e) => {
            state.health.metrics.record_failure(namespace, &form.db_name);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

/// Report the account quota (cached, loaded on first use).
async fn get_quota(State(state): State<Arc<AppState>>) -> Response {
    let result = state
        .quota
        .get(
            state.platform.as_ref(),
            &state.config.namespace,
            &state.config.quota_name,
        )
        .await;

    match result {
        Ok(quota) => (StatusCode::OK, Json(QuotaResponse { quota })).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load quota");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

/// Run the quota gate ahead of the pipeline.
///
/// For edits, the projected usage is discounted by what the instance
/// already consumes; a cluster that cannot be fetched yet is treated as
/// consuming nothing and the pipeline reports the real failure.
async fn quota_gate(state: &AppState, form: &DbEditForm, is_edit: bool) -> Result<(), Error> {
    let quota = state
        .quota
        .get(
            state.platform.as_ref(),
            &state.config.namespace,
            &state.config.quota_name,
        )
        .await?;

    if quota.is_empty() {
        return Ok(());
    }

    let previous: Option<Vec<ResourceSpec>> = if is_edit {
        match state
            .platform
            .fetch(&CLUSTER, &state.config.namespace, &form.db_name)
            .await
        {
            Ok(doc) => Some(live_resources(&serde_json::from_value(doc)?)?),
            Err(Error::NotFound(_)) => None,
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    let desired = form.valid_resources();
    match check_quota(&desired, previous.as_deref(), &quota) {
        Some(kind) => Err(Error::QuotaExceeded(kind)),
        None => Ok(()),
    }
}

fn error_response(status: StatusCode, error: &Error) -> Response {
    (
        status,
        Json(ErrorResponse {
            code: status.as_u16(),
            error: error.to_string(),
        }),
    )
        .into_response()
}
