//! Catalog interaction types.
//!
//! Raw types mirror what the breed provider returns; the remaining types
//! are the shapes the aggregation service hands out to its clients.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::str::FromStr;

use derive_more::{AsRef, Display, From};
use serde::{Deserialize, Serialize};

use crate::error::InvalidQueryError;

// ---------------------------------------------------------------------------
// Upstream types
// ---------------------------------------------------------------------------

/// Stable, provider assigned breed identifier, e.g. `abys`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Display, From, Serialize, Deserialize,
)]
#[as_ref(forward)]
#[from(String, &str)]
#[serde(transparent)]
pub struct BreedId(String);

impl BreedId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWeight {
    pub metric: Option<String>,
    pub imperial: Option<String>,
}

/// A breed as returned by the provider.
///
/// Only the fields we forward are modelled, anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBreed {
    pub id: BreedId,
    pub name: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub temperament: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub life_span: Option<String>,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
    #[serde(default)]
    pub alt_names: Option<String>,
    #[serde(default)]
    pub weight: Option<RawWeight>,

    #[serde(default)]
    pub intelligence: Option<u8>,
    #[serde(default)]
    pub affection_level: Option<u8>,
    #[serde(default)]
    pub energy_level: Option<u8>,
    #[serde(default)]
    pub adaptability: Option<u8>,
    #[serde(default)]
    pub child_friendly: Option<u8>,
    #[serde(default)]
    pub dog_friendly: Option<u8>,
    #[serde(default)]
    pub stranger_friendly: Option<u8>,
    #[serde(default)]
    pub rare: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

// ---------------------------------------------------------------------------
// Normalized types
// ---------------------------------------------------------------------------

/// A catalog item as handed out by the aggregation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: BreedId,
    pub name: String,
    /// Short display line derived from temperament or origin.
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub origin: Option<String>,
    pub temperament: Option<String>,
    pub description: Option<String>,
    pub life_span: Option<String>,
    pub wikipedia_url: Option<String>,
    pub alt_names: Option<String>,
    pub weight_metric: Option<String>,

    pub intelligence: Option<u8>,
    pub affection_level: Option<u8>,
    pub energy_level: Option<u8>,
    pub adaptability: Option<u8>,
    pub child_friendly: Option<u8>,
    pub dog_friendly: Option<u8>,
    pub stranger_friendly: Option<u8>,
    pub rare: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedImage {
    pub id: String,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<RawImage> for BreedImage {
    fn from(raw: RawImage) -> Self {
        Self {
            id: raw.id,
            url: raw.url,
            width: raw.width,
            height: raw.height,
        }
    }
}

/// An entry of the breed selection filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedOption {
    pub id: BreedId,
    pub label: String,
}

/// The reduced set of fields shown in the comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedTableRow {
    pub id: BreedId,
    pub name: String,
    pub origin: Option<String>,
    pub intelligence: Option<u8>,
    pub affection_level: Option<u8>,
    pub energy_level: Option<u8>,
    pub child_friendly: Option<u8>,
    pub dog_friendly: Option<u8>,
    pub rare: Option<u8>,
    pub life_span: Option<String>,
    pub weight_metric: Option<String>,
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// A positive limit with a default and an upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedLimit<const DEFAULT: u8, const MAX: u8>(u8);

/// Page size of the breed list.
pub type PageSize = BoundedLimit<9, 27>;
/// Number of images fetched for a single breed.
pub type ImageLimit = BoundedLimit<10, 20>;

impl<const DEFAULT: u8, const MAX: u8> BoundedLimit<DEFAULT, MAX> {
    /// Accepts only values within `1..=MAX`.
    pub fn new(value: u32) -> Result<Self, InvalidQueryError> {
        match u8::try_from(value) {
            Ok(v) if (1..=MAX).contains(&v) => Ok(Self(v)),
            _ => Err(InvalidQueryError::LimitOutOfRange { value, max: MAX }),
        }
    }

    /// Clamps any value into `1..=MAX`.
    pub fn clamped(value: u64) -> Self {
        Self(value.clamp(1, MAX as u64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl<const DEFAULT: u8, const MAX: u8> Default for BoundedLimit<DEFAULT, MAX> {
    fn default() -> Self {
        Self(DEFAULT)
    }
}

impl<const DEFAULT: u8, const MAX: u8> std::fmt::Display for BoundedLimit<DEFAULT, MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "az")]
    NameAscending,
    #[serde(rename = "za")]
    NameDescending,
    #[serde(rename = "pop")]
    Popularity,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::NameAscending => "az",
            SortMode::NameDescending => "za",
            SortMode::Popularity => "pop",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = InvalidQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "az" => Ok(SortMode::NameAscending),
            "za" => Ok(SortMode::NameDescending),
            "pop" => Ok(SortMode::Popularity),
            other => Err(InvalidQueryError::UnknownSort(other.to_string())),
        }
    }
}

/// Parameters of a single catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Case-insensitive substring matched against name, origin and
    /// temperament.
    pub search_term: String,
    /// Restrict results to these ids, empty means no restriction.
    pub breed_ids: BTreeSet<BreedId>,
    pub sort: SortMode,
    /// 1-based page number.
    pub page: NonZeroU32,
    pub page_size: PageSize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            breed_ids: BTreeSet::new(),
            sort: SortMode::default(),
            page: NonZeroU32::MIN,
            page_size: PageSize::default(),
        }
    }
}

impl Query {
    /// Offset of the first item of the requested page.
    pub fn offset(&self) -> usize {
        (self.page.get() as usize - 1).saturating_mul(self.page_size.get() as usize)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "data")]
    pub items: Vec<Breed>,
    /// Number of matches before pagination.
    pub total: u64,
    pub page: u32,
    #[serde(rename = "limit")]
    pub page_size: u8,
}
