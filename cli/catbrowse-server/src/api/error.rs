use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catbrowse_catalog::{BreedId, CatalogError, InvalidQueryError, UpstreamError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;

/// A plain json error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse<'a> {
    /// Message to explain failure
    pub message: &'a str,
    /// Underlying cause, if it is safe to share
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQueryError),
    /// The query string did not deserialize at all, e.g. a repeated key.
    #[error(transparent)]
    MalformedQuery(#[from] QueryRejection),
    #[error("breed '{0}' not found")]
    NotFound(BreedId),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Upstream(e) => ApiError::Upstream(e),
            CatalogError::InvalidQuery(e) => ApiError::InvalidQuery(e),
            CatalogError::NotFound(id) => ApiError::NotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, status = ?e.status(), "breed provider request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "error querying the breed provider",
                    Some(e.to_string()),
                )
            },
            ApiError::InvalidQuery(e) => {
                (StatusCode::BAD_REQUEST, "invalid query", Some(e.to_string()))
            },
            ApiError::MalformedQuery(e) => {
                (StatusCode::BAD_REQUEST, "invalid query", Some(e.body_text()))
            },
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "breed not found", None),
            ApiError::Auth(e) => {
                tracing::debug!(error = %e, "rejecting unauthenticated request");
                (StatusCode::UNAUTHORIZED, "unauthorized", None)
            },
        };

        (status, Json(ErrorResponse { message, detail })).into_response()
    }
}
