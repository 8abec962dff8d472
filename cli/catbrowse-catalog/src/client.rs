//! HTTP client for the breed provider.

use std::fmt::Debug;

use enum_dispatch::enum_dispatch;
use reqwest::header::{self, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use crate::mock::MockUpstream;
use crate::types::{BreedId, RawBreed, RawImage};

const API_KEY_HEADER: &str = "x-api-key";

// ---------------------------------------------------------------------------
// Upstream trait
// ---------------------------------------------------------------------------

/// The subset of the provider API the catalog relies on.
///
/// Every call is a single request without retries. Any non-success response
/// is reported as [UpstreamError::Status].
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait UpstreamTrait {
    /// Fetch the complete, unfiltered breed collection.
    async fn fetch_collection(&self) -> Result<Vec<RawBreed>, UpstreamError>;

    /// Let the provider search breeds by name.
    async fn search_collection(&self, term: &str) -> Result<Vec<RawBreed>, UpstreamError>;

    /// Fetch up to `limit` random images of a breed.
    async fn fetch_images(
        &self,
        breed_id: &BreedId,
        limit: u8,
    ) -> Result<Vec<RawImage>, UpstreamError>;
}

/// Either the HTTP client for the actual provider,
/// or a mock for testing.
#[derive(Debug)]
#[enum_dispatch(UpstreamTrait)]
pub enum Upstream {
    Http(HttpUpstream),
    Mock(MockUpstream),
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// A client for the breed provider.
pub struct HttpUpstream {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl Debug for HttpUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUpstream")
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpUpstream {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!(%url, "sending breed provider request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            };
            debug!(%status, "breed provider returned an error");
            return Err(UpstreamError::Status { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.config.request_timeout())
        } else {
            UpstreamError::Transport(err)
        }
    }
}

impl UpstreamTrait for HttpUpstream {
    #[instrument(skip_all)]
    async fn fetch_collection(&self) -> Result<Vec<RawBreed>, UpstreamError> {
        let url = build_url(&self.config.base_url, "/breeds", std::iter::empty())?;
        let breeds: Vec<RawBreed> = self.get_json(url).await?;
        debug!(n_breeds = breeds.len(), "received breed collection");
        Ok(breeds)
    }

    #[instrument(skip(self))]
    async fn search_collection(&self, term: &str) -> Result<Vec<RawBreed>, UpstreamError> {
        let url = build_url(&self.config.base_url, "/breeds/search", [("q", term)])?;
        self.get_json(url).await
    }

    #[instrument(skip_all, fields(breed_id = %breed_id, limit = limit))]
    async fn fetch_images(
        &self,
        breed_id: &BreedId,
        limit: u8,
    ) -> Result<Vec<RawImage>, UpstreamError> {
        let limit = limit.to_string();
        let url = build_url(&self.config.base_url, "/images/search", [
            ("limit", limit.as_str()),
            ("breed_ids", breed_id.as_str()),
            ("order", "RANDOM"),
        ])?;
        self.get_json(url).await
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Join `path` onto `base` and append the non-empty query parameters.
///
/// Parameters with empty values are left out entirely.
pub fn build_url<'a>(
    base: &str,
    path: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
        .map_err(UpstreamError::Url)?;

    let params = params
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect::<Vec<_>>();

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

/// Build HTTP client with the provider key and timeouts.
fn build_http_client(config: &UpstreamConfig) -> Result<reqwest::Client, UpstreamError> {
    let mut headers = HeaderMap::new();

    if let Some(key) = &config.api_key {
        headers.insert(
            header::HeaderName::from_static(API_KEY_HEADER),
            header::HeaderValue::from_str(key).map_err(|e| UpstreamError::Other(e.to_string()))?,
        );
    }

    debug!(
        base_url = %config.base_url,
        has_api_key = config.api_key.is_some(),
        "building breed provider HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout());

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| UpstreamError::Other(e.to_string()))
}
