//! Breed catalog aggregation.
//!
//! This crate provides:
//! - the breed provider client with a mock for testing
//! - normalization of provider breeds into the shapes served to clients
//! - the query pipeline (filter, sort, paginate) and image enrichment
//! - [BreedCatalog], combining the above into the service operations
//!
//! ## Usage
//!
//! ```ignore
//! use catbrowse_catalog::{BreedCatalog, HttpUpstream, Query, Upstream, UpstreamConfig};
//!
//! let config = UpstreamConfig::default();
//! let timeout = config.enrichment_timeout();
//! let catalog = BreedCatalog::new(Upstream::Http(HttpUpstream::new(config)?), timeout);
//! let page = catalog.run_query(&Query::default()).await?;
//! ```

mod catalog;
mod client;
mod config;
mod enrich;
mod error;
pub mod mock;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use catalog::BreedCatalog;
pub use client::{HttpUpstream, Upstream, UpstreamTrait, build_url};
pub use config::{DEFAULT_UPSTREAM_URL, UpstreamConfig};
pub use enrich::enrich_page;
pub use error::{CatalogError, InvalidQueryError, UpstreamError};
pub use types::{
    Breed,
    BreedId,
    BreedImage,
    BreedOption,
    BreedTableRow,
    ImageLimit,
    PageSize,
    Query,
    ResultPage,
    SortMode,
};
