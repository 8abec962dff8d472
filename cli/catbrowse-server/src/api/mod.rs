use std::sync::Arc;

use axum::Router;
use catbrowse_catalog::BreedCatalog;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;

// Routes
mod breeds;
mod health;

// Misc
pub mod error;
mod middleware;

#[cfg(test)]
mod tests;

pub use breeds::{ImageParams, ListParams, SearchParams};

/// Path prefix of all catalog routes.
pub const API_PREFIX: &str = "/api/cats";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<BreedCatalog>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(catalog: BreedCatalog, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            verifier,
        }
    }
}

/// The complete service, with request tracing on the catalog routes.
pub fn router(state: AppState) -> Router {
    let auth = axum::middleware::from_fn_with_state(
        state.verifier.clone(),
        middleware::require_auth,
    );

    Router::new()
        .nest(API_PREFIX, breeds::router().layer(auth))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // attached last so health checks are neither traced nor authenticated
        .merge(health::router())
}
