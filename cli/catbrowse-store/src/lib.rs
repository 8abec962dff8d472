//! Client side state for browsing the breed catalog.
//!
//! [QueryStore] holds the current query parameters and the last loaded
//! page, and refetches through a [QueryFetcher] whenever a parameter
//! changes.

mod debounce;
mod fetcher;
mod state;
mod store;

pub use debounce::{DEFAULT_DEBOUNCE, debounce_distinct};
pub use fetcher::{
    ErrorBody,
    FetchError,
    GENERIC_ERROR_MESSAGE,
    HttpQueryFetcher,
    QueryFetcher,
    query_url,
};
pub use state::{QueryState, Status};
pub use store::QueryStore;
