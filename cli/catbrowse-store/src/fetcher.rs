//! Loading result pages from the catalog service.

use std::future::Future;
use std::time::Duration;

use catbrowse_catalog::{Query, ResultPage};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "error loading breeds";

const QUERY_PATH: &str = "/api/cats/breeds";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Error body returned by the catalog service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog service responded with {status}")]
    Status {
        status: StatusCode,
        body: Option<ErrorBody>,
    },
    #[error("could not reach the catalog service")]
    Transport(#[source] reqwest::Error),
    #[error("invalid catalog service url")]
    Url(#[source] url::ParseError),
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// A single human readable line describing the failure.
    pub fn user_message(&self) -> String {
        if let FetchError::Status {
            body: Some(ErrorBody {
                message: Some(message),
                ..
            }),
            ..
        } = self
        {
            if !message.trim().is_empty() {
                return message.clone();
            }
        }

        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Something that can load a page of results for a query.
pub trait QueryFetcher: Send + Sync {
    fn fetch_page(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<ResultPage, FetchError>> + Send;
}

/// Calls the query endpoint of the catalog service.
pub struct HttpQueryFetcher {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpQueryFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpQueryFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpQueryFetcher {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }
}

impl QueryFetcher for HttpQueryFetcher {
    #[instrument(skip_all, fields(page = query.page.get(), sort = %query.sort))]
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage, FetchError> {
        let url = query_url(&self.base_url, query).map_err(FetchError::Url)?;
        debug!(%url, "requesting result page");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ErrorBody>(&text).ok();
            debug!(%status, ?body, "catalog service returned an error");
            return Err(FetchError::Status { status, body });
        }

        response.json().await.map_err(FetchError::Transport)
    }
}

/// URL of the query endpoint for `query`, leaving out empty parameters.
pub fn query_url(base_url: &str, query: &Query) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}{QUERY_PATH}", base_url.trim_end_matches('/')))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.page_size.to_string())
            .append_pair("sort", query.sort.as_str());

        let term = query.search_term.trim();
        if !term.is_empty() {
            pairs.append_pair("q", term);
        }
        if !query.breed_ids.is_empty() {
            let ids = query
                .breed_ids
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(",");
            pairs.append_pair("breedIds", &ids);
        }
    }
    Ok(url)
}
