use catbrowse_catalog::{Query, ResultPage};

/// Load status of a [crate::QueryStore].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of the store, as seen by consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub query: Query,
    pub status: Status,
    /// Message of the most recent failed fetch, cleared when a new fetch
    /// starts.
    pub last_error: Option<String>,
    /// The most recently loaded page, kept while a new one is loading.
    pub last_page: Option<ResultPage>,
}
