//! Error types for the edit/create pipeline

use thiserror::Error;

use crate::reconcile::quota::QuotaKind;

/// Error variants are named after the failure class rather than the failing
/// call site, mirroring the boundary taxonomy: not-found and transport
/// errors abort the pipeline, validation and quota errors are caught before
/// it starts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Missing object key: {0}")]
    MissingObjectKey(&'static str),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} exceeds quota")]
    QuotaExceeded(QuotaKind),
}

impl Error {
    /// Whether the failure was caused by the caller's input rather than the
    /// platform. User errors never reach the pipeline; everything else is a
    /// pipeline failure reported as a generic server error.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::QuotaExceeded(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
