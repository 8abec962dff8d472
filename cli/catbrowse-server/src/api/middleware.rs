use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use crate::auth::{AuthError, TokenVerifier};

/// Rejects requests without a valid `Authorization: Bearer` token and
/// attaches the verified [crate::auth::Principal] to the rest.
#[tracing::instrument(skip_all)]
pub(in crate::api) async fn require_auth(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::UnsupportedScheme)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::UnsupportedScheme)?;

    let principal = verifier.verify(token)?;
    tracing::trace!(subject = %principal.subject, "authenticated request");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
