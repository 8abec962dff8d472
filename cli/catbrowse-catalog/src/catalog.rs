//! The catalog operations served by the aggregation service.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::client::{Upstream, UpstreamTrait};
use crate::enrich::enrich_page;
use crate::error::{CatalogError, InvalidQueryError, UpstreamError};
use crate::pipeline::{compare_names, select};
use crate::types::{
    Breed,
    BreedId,
    BreedImage,
    BreedOption,
    BreedTableRow,
    ImageLimit,
    Query,
    ResultPage,
};

/// Read-only view of the breed provider.
///
/// Every operation fetches fresh data, nothing is cached between calls.
#[derive(Debug)]
pub struct BreedCatalog {
    upstream: Upstream,
    enrichment_timeout: Duration,
}

impl BreedCatalog {
    pub fn new(upstream: Upstream, enrichment_timeout: Duration) -> Self {
        Self {
            upstream,
            enrichment_timeout,
        }
    }

    /// Fetch the collection, select the requested page and attach images
    /// to the breeds on it.
    ///
    /// Fails only if the collection itself cannot be fetched.
    #[instrument(skip_all, fields(
        search_term = %query.search_term,
        n_ids = query.breed_ids.len(),
        sort = %query.sort,
        page = query.page.get(),
        page_size = query.page_size.get(),
    ))]
    pub async fn run_query(&self, query: &Query) -> Result<ResultPage, UpstreamError> {
        let collection = self.upstream.fetch_collection().await?;
        let selection = select(&collection, query);
        debug!(
            total = selection.total,
            n_items = selection.items.len(),
            "enriching page"
        );
        let items = enrich_page(&self.upstream, selection.items, self.enrichment_timeout).await;

        Ok(ResultPage {
            items,
            total: selection.total,
            page: query.page.get(),
            page_size: query.page_size.get(),
        })
    }

    /// All breeds as filter options, ordered by name.
    #[instrument(skip_all)]
    pub async fn options(&self) -> Result<Vec<BreedOption>, UpstreamError> {
        let mut options = self
            .upstream
            .fetch_collection()
            .await?
            .iter()
            .map(BreedOption::from)
            .collect::<Vec<_>>();
        options.sort_by(|a, b| compare_names(&a.label, &b.label));
        Ok(options)
    }

    /// A single breed, without image.
    #[instrument(skip(self))]
    pub async fn breed(&self, id: &str) -> Result<Breed, CatalogError> {
        let id = parse_breed_id(id)?;
        self.upstream
            .fetch_collection()
            .await?
            .iter()
            .find(|breed| breed.id == id)
            .map(Breed::from)
            .ok_or(CatalogError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn breed_images(
        &self,
        id: &str,
        limit: ImageLimit,
    ) -> Result<Vec<BreedImage>, CatalogError> {
        let id = parse_breed_id(id)?;
        let images = self.upstream.fetch_images(&id, limit.get()).await?;
        Ok(images.into_iter().map(BreedImage::from).collect())
    }

    /// Provider side name search, without images.
    ///
    /// A blank term matches nothing and makes no request.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Breed>, UpstreamError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let breeds = self.upstream.search_collection(term).await?;
        Ok(breeds.iter().map(Breed::from).collect())
    }

    #[instrument(skip_all)]
    pub async fn table(&self) -> Result<Vec<BreedTableRow>, UpstreamError> {
        let breeds = self.upstream.fetch_collection().await?;
        Ok(breeds.iter().map(BreedTableRow::from).collect())
    }
}

fn parse_breed_id(id: &str) -> Result<BreedId, InvalidQueryError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(InvalidQueryError::MissingId);
    }
    Ok(BreedId::from(id))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::num::NonZeroU32;

    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    use super::*;
    use crate::mock::{MockCall, MockResponse, MockUpstream, raw_breed};
    use crate::types::{PageSize, RawImage};

    fn catalog(mock: &MockUpstream) -> BreedCatalog {
        BreedCatalog::new(Upstream::Mock(mock.clone()), Duration::from_secs(5))
    }

    fn breeds() -> Vec<crate::types::RawBreed> {
        vec![
            raw_breed("siam", "Siamese"),
            raw_breed("abys", "Abyssinian"),
            raw_breed("beng", "Bengal"),
            raw_breed("pers", "Persian"),
        ]
    }

    #[tokio::test]
    async fn run_query_enriches_only_the_page() {
        let mock = MockUpstream::with_collection(breeds());
        let query = Query {
            page_size: PageSize::new(2).unwrap(),
            ..Default::default()
        };

        let page = catalog(&mock).run_query(&query).await.unwrap();

        assert_eq!(page.total, 4);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 2);
        assert_eq!(
            page.items.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            ["Abyssinian", "Bengal"]
        );
        assert!(page.items.iter().all(|b| b.image.is_some()));

        let mut requested = mock.image_requests();
        requested.sort();
        assert_eq!(requested, [BreedId::from("abys"), BreedId::from("beng")]);
    }

    #[tokio::test]
    async fn run_query_fails_on_collection_error() {
        let mock = MockUpstream::new();
        mock.set_collection(MockResponse::Error {
            status: 500,
            body: "down".to_string(),
        });

        let err = catalog(&mock)
            .run_query(&Query::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(mock.image_requests().is_empty());
    }

    #[tokio::test]
    async fn run_query_keeps_items_when_one_image_fails() {
        let mock = MockUpstream::with_collection(breeds());
        mock.set_images(&BreedId::from("beng"), MockResponse::Error {
            status: 503,
            body: String::new(),
        });

        let page = catalog(&mock).run_query(&Query::default()).await.unwrap();
        assert_eq!(page.items.len(), 4);
        let missing = page
            .items
            .iter()
            .filter(|b| b.image.is_none())
            .map(|b| b.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(missing, ["beng"]);
    }

    #[tokio::test]
    async fn run_query_is_idempotent() {
        let mock = MockUpstream::with_collection(breeds());
        let catalog = catalog(&mock);
        let query = Query {
            breed_ids: BTreeSet::from([BreedId::from("pers"), BreedId::from("siam")]),
            page: NonZeroU32::MIN,
            ..Default::default()
        };
        let first = catalog.run_query(&query).await.unwrap();
        let second = catalog.run_query(&query).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn options_are_sorted_by_label() {
        let mock = MockUpstream::with_collection(breeds());
        let options = catalog(&mock).options().await.unwrap();
        assert_eq!(
            options.iter().map(|o| o.label.as_str()).collect::<Vec<_>>(),
            ["Abyssinian", "Bengal", "Persian", "Siamese"]
        );
        assert!(mock.image_requests().is_empty());
    }

    #[tokio::test]
    async fn breed_lookup() {
        let mock = MockUpstream::with_collection(breeds());
        let catalog = catalog(&mock);

        let breed = catalog.breed("beng").await.unwrap();
        assert_eq!(breed.name, "Bengal");
        assert_eq!(breed.image, None);

        assert!(matches!(
            catalog.breed("nope").await,
            Err(CatalogError::NotFound(id)) if id.as_str() == "nope"
        ));
    }

    /// Blank ids are rejected before any request is made
    #[tokio::test]
    async fn blank_id_is_invalid() {
        let mock = MockUpstream::with_collection(breeds());
        let catalog = catalog(&mock);

        assert!(matches!(
            catalog.breed("  ").await,
            Err(CatalogError::InvalidQuery(InvalidQueryError::MissingId))
        ));
        assert!(matches!(
            catalog.breed_images("", ImageLimit::default()).await,
            Err(CatalogError::InvalidQuery(InvalidQueryError::MissingId))
        ));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn breed_images_use_limit() {
        let mock = MockUpstream::new();
        let images = (0..15)
            .map(|n| RawImage {
                id: format!("img{n}"),
                url: format!("https://cdn.example.com/{n}.jpg"),
                width: None,
                height: None,
            })
            .collect();
        mock.set_images(&BreedId::from("abys"), MockResponse::Ok(images));

        let images = catalog(&mock)
            .breed_images("abys", ImageLimit::default())
            .await
            .unwrap();
        assert_eq!(images.len(), 10);
        assert_eq!(mock.calls(), [MockCall::FetchImages(BreedId::from("abys"), 10)]);
    }

    #[tokio::test]
    async fn blank_search_makes_no_request() {
        let mock = MockUpstream::new();
        let results = catalog(&mock).search("   ").await.unwrap();
        assert!(results.is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn search_trims_term() {
        let mock = MockUpstream::new();
        mock.set_search(MockResponse::Ok(vec![raw_breed("siam", "Siamese")]));
        let results = catalog(&mock).search(" sia ").await.unwrap();
        assert_eq!(results[0].id.as_str(), "siam");
        assert_eq!(mock.calls(), [MockCall::SearchCollection("sia".to_string())]);
    }

    #[tokio::test]
    async fn table_rows() {
        let mock = MockUpstream::with_collection(breeds());
        let rows = catalog(&mock).table().await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].id.as_str(), "siam");
    }
}
