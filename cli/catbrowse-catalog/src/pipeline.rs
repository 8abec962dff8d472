//! Filtering, sorting and pagination of the breed collection.
//!
//! Every stage is total and deterministic: the same collection and query
//! always select the same page.

use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};
use tracing::trace;

use crate::types::{Breed, Query, RawBreed, SortMode};

/// The requested page, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub items: Vec<Breed>,
    /// Number of matches before pagination.
    pub total: u64,
}

/// Filter, sort and paginate `collection` according to `query`.
///
/// Only the breeds on the requested page are normalized.
pub fn select(collection: &[RawBreed], query: &Query) -> Selection {
    let term = query.search_term.trim().to_lowercase();

    let mut matches = collection
        .iter()
        .filter(|breed| term.is_empty() || search_haystack(breed).contains(&term))
        .filter(|breed| query.breed_ids.is_empty() || query.breed_ids.contains(&breed.id))
        .collect::<Vec<_>>();

    let total = matches.len() as u64;

    // `sort_by` is stable, equal keys keep their collection order
    match query.sort {
        SortMode::NameAscending => matches.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::NameDescending => matches.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortMode::Popularity => matches.sort_by(|a, b| {
            popularity(b)
                .cmp(&popularity(a))
                .then_with(|| compare_names(&a.name, &b.name))
        }),
    }

    let items = matches
        .into_iter()
        .skip(query.offset())
        .take(query.page_size.get() as usize)
        .map(Breed::from)
        .collect::<Vec<_>>();

    trace!(total, n_items = items.len(), "selected page");
    Selection { items, total }
}

/// Lowercased `name origin temperament`, missing fields as empty strings.
fn search_haystack(breed: &RawBreed) -> String {
    format!(
        "{} {} {}",
        breed.name,
        breed.origin.as_deref().unwrap_or_default(),
        breed.temperament.as_deref().unwrap_or_default()
    )
    .to_lowercase()
}

/// Root locale collator comparing base letters and accents, but not case.
static NAME_COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Secondary);
    Collator::try_new(Default::default(), options)
        .inspect_err(|err| tracing::warn!(%err, "no collation data, names sort by code point"))
        .ok()
});

/// Locale-aware, case-insensitive name order, ties broken by the exact
/// spelling.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let collated = match NAME_COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    };
    collated.then_with(|| a.cmp(b))
}

/// Sum of intelligence and affection, missing ratings count as 0.
pub fn popularity(breed: &RawBreed) -> u16 {
    breed.intelligence.unwrap_or(0) as u16 + breed.affection_level.unwrap_or(0) as u16
}
