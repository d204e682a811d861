//! Handler errors and their wire shape.
//!
//! Every error body is the same envelope: `{"error": <kind>, "message": ...}`.
//! Store failures are logged with their real cause and leave the process as
//! a generic 500; callers never see internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::db::StoreError;

/// Ownership refusals share one user-facing message.
pub const FORBIDDEN_MESSAGE: &str = "You're not allowed to do that!";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The caller is authenticated but does not own the record.
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    /// No record with the given id.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// The store failed underneath us.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));
        (status, body).into_response()
    }
}
