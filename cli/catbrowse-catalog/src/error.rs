//! Error handling for catalog operations.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::BreedId;

/// A call to the breed provider failed.
///
/// The pipeline never returns partial results when this is raised.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("breed provider responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to reach breed provider")]
    Transport(#[source] reqwest::Error),
    #[error("breed provider did not respond within {0:?}")]
    Timeout(Duration),
    #[error("invalid breed provider url")]
    Url(#[source] url::ParseError),
    #[error("{0}")]
    Other(String),
}

impl UpstreamError {
    /// Status code reported by the provider, if it responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

/// Input rejected before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidQueryError {
    #[error("'{0}' is not a valid sort mode, expected one of az, za, pop")]
    UnknownSort(String),
    #[error("limit {value} is outside of 1..={max}")]
    LimitOutOfRange { value: u32, max: u8 },
    #[error("'{name}' must be a positive integer, found '{value}'")]
    NotAPositiveInteger { name: &'static str, value: String },
    #[error("'{name}' must be an integer, found '{value}'")]
    NotAnInteger { name: &'static str, value: String },
    #[error("a breed id is required")]
    MissingId,
}

/// Errors of the catalog facade.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQueryError),
    #[error("breed '{0}' not found")]
    NotFound(BreedId),
}
