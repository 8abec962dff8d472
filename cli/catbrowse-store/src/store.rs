//! The client side query state machine.
//!
//! Every mutator performs exactly one transition to [Status::Loading] and
//! one fetch. Fetches may overlap when mutators are called concurrently;
//! only the most recently started one is allowed to settle the state.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use catbrowse_catalog::{BreedId, PageSize, Query, SortMode};
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::debounce::debounce_distinct;
use crate::fetcher::QueryFetcher;
use crate::state::{QueryState, Status};

pub struct QueryStore<F> {
    fetcher: F,
    state: watch::Sender<QueryState>,
    generation: AtomicU64,
}

impl<F: std::fmt::Debug> std::fmt::Debug for QueryStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore")
            .field("fetcher", &self.fetcher)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<F: QueryFetcher> QueryStore<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_query(fetcher, Query::default())
    }

    /// A store starting from `query` instead of the defaults.
    pub fn with_query(fetcher: F, query: Query) -> Self {
        let (state, _) = watch::channel(QueryState {
            query,
            ..Default::default()
        });
        Self {
            fetcher,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Current snapshot of the state.
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Receive every state transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Fetch the page for the current query without changing it.
    pub async fn load(&self) {
        self.update(|_| {}).await
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.update(move |query| {
            query.search_term = term;
            query.page = NonZeroU32::MIN;
        })
        .await
    }

    pub async fn set_sort(&self, sort: SortMode) {
        self.update(move |query| {
            query.sort = sort;
            query.page = NonZeroU32::MIN;
        })
        .await
    }

    pub async fn set_selected_ids(&self, ids: impl IntoIterator<Item = BreedId>) {
        let ids = ids.into_iter().collect();
        self.update(move |query| {
            query.breed_ids = ids;
            query.page = NonZeroU32::MIN;
        })
        .await
    }

    /// Move to another page, keeping every other parameter.
    pub async fn set_page(&self, page: NonZeroU32) {
        self.update(move |query| query.page = page).await
    }

    pub async fn set_page_size(&self, page_size: PageSize) {
        self.update(move |query| {
            query.page_size = page_size;
            query.page = NonZeroU32::MIN;
        })
        .await
    }

    /// Reset search term, selection, sort and page. The page size is kept.
    pub async fn clear_all(&self) {
        self.update(|query| {
            *query = Query {
                page_size: query.page_size,
                ..Query::default()
            };
        })
        .await
    }

    /// Apply search terms typed into a text field.
    ///
    /// Terms are used once `window` passed without further input and only
    /// if they differ from the previously used term. Returns when `input`
    /// ends and all resulting fetches have settled.
    pub async fn drive_search_input<S>(&self, input: S, window: Duration)
    where
        S: Stream<Item = String>,
    {
        debounce_distinct(input, window)
            .for_each_concurrent(None, |term| self.set_search_term(term))
            .await
    }

    #[instrument(skip_all)]
    async fn update(&self, mutate: impl FnOnce(&mut Query)) {
        // the generation is taken under the channel's lock together with the
        // query it belongs to
        let mut started = (0, Query::default());
        self.state.send_modify(|state| {
            mutate(&mut state.query);
            state.status = Status::Loading;
            state.last_error = None;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            started = (generation, state.query.clone());
        });
        let (generation, query) = started;

        debug!(generation, ?query, "fetching result page");
        let result = self.fetcher.fetch_page(&query).await;

        self.state.send_if_modified(|state| {
            let latest = self.generation.load(Ordering::SeqCst);
            if latest != generation {
                debug!(generation, latest, "discarding stale result page");
                return false;
            }
            match result {
                Ok(page) => {
                    state.last_page = Some(page);
                    state.status = Status::Success;
                },
                Err(err) => {
                    debug!(error = %err, "fetching result page failed");
                    state.last_error = Some(err.user_message());
                    state.status = Status::Error;
                },
            }
            true
        });
    }
}
