//! HTTP aggregation service for the breed catalog.

pub mod api;
pub mod auth;
pub mod config;
pub mod logger;

pub use api::{AppState, router};
pub use auth::{AuthError, JwtVerifier, Principal, TokenVerifier};
pub use config::ServerConfig;
