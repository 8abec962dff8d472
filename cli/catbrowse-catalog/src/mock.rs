//! An upstream that serves canned responses without HTTP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::client::UpstreamTrait;
use crate::error::UpstreamError;
use crate::types::{BreedId, RawBreed, RawImage};

// Arc allows seeding and inspecting the mock after it was moved into a catalog
type MockField<T> = Arc<Mutex<T>>;

/// A canned provider response.
#[derive(Debug, Clone)]
pub enum MockResponse<T> {
    Ok(T),
    /// The provider answered with a non-success status.
    Error { status: u16, body: String },
    /// The provider never answers.
    Hang,
}

/// A request the mock has served, in order of arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    FetchCollection,
    SearchCollection(String),
    FetchImages(BreedId, u8),
}

/// An upstream that can be seeded with mock responses.
///
/// Clones share their responses and call log.
#[derive(Debug, Clone, Default)]
pub struct MockUpstream {
    collection: MockField<Option<MockResponse<Vec<RawBreed>>>>,
    search: MockField<Option<MockResponse<Vec<RawBreed>>>>,
    images: MockField<HashMap<BreedId, MockResponse<Vec<RawImage>>>>,
    calls: MockField<Vec<MockCall>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose collection is `breeds`, each with a single image.
    pub fn with_collection(breeds: Vec<RawBreed>) -> Self {
        let mock = Self::new();
        for breed in &breeds {
            mock.set_images(&breed.id, MockResponse::Ok(vec![image_for(&breed.id)]));
        }
        mock.set_collection(MockResponse::Ok(breeds));
        mock
    }

    pub fn set_collection(&self, response: MockResponse<Vec<RawBreed>>) {
        *self.collection.lock().expect("couldn't acquire mock lock") = Some(response);
    }

    pub fn set_search(&self, response: MockResponse<Vec<RawBreed>>) {
        *self.search.lock().expect("couldn't acquire mock lock") = Some(response);
    }

    /// Breeds without a seeded image response get an empty image list.
    pub fn set_images(&self, breed_id: &BreedId, response: MockResponse<Vec<RawImage>>) {
        self.images
            .lock()
            .expect("couldn't acquire mock lock")
            .insert(breed_id.clone(), response);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("couldn't acquire mock lock").clone()
    }

    /// Ids of all breeds an image was requested for.
    pub fn image_requests(&self) -> Vec<BreedId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::FetchImages(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.calls
            .lock()
            .expect("couldn't acquire mock lock")
            .push(call);
    }
}

async fn respond<T>(response: Option<MockResponse<T>>, what: &str) -> Result<T, UpstreamError> {
    match response {
        Some(MockResponse::Ok(value)) => Ok(value),
        Some(MockResponse::Error { status, body }) => {
            let status = StatusCode::from_u16(status)
                .map_err(|_| UpstreamError::Other(format!("invalid mock status code {status}")))?;
            Err(UpstreamError::Status { status, body })
        },
        Some(MockResponse::Hang) => futures::future::pending().await,
        None => Err(UpstreamError::Other(format!("no mock response for {what}"))),
    }
}

impl UpstreamTrait for MockUpstream {
    async fn fetch_collection(&self) -> Result<Vec<RawBreed>, UpstreamError> {
        self.record(MockCall::FetchCollection);
        let response = self
            .collection
            .lock()
            .expect("couldn't acquire mock lock")
            .clone();
        respond(response, "the breed collection").await
    }

    async fn search_collection(&self, term: &str) -> Result<Vec<RawBreed>, UpstreamError> {
        self.record(MockCall::SearchCollection(term.to_string()));
        let response = self.search.lock().expect("couldn't acquire mock lock").clone();
        respond(response, "a breed search").await
    }

    async fn fetch_images(
        &self,
        breed_id: &BreedId,
        limit: u8,
    ) -> Result<Vec<RawImage>, UpstreamError> {
        self.record(MockCall::FetchImages(breed_id.clone(), limit));
        let response = self
            .images
            .lock()
            .expect("couldn't acquire mock lock")
            .get(breed_id)
            .cloned()
            .unwrap_or(MockResponse::Ok(Vec::new()));
        let images = respond(Some(response), "breed images").await?;
        Ok(images.into_iter().take(limit as usize).collect())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A minimal provider breed.
pub fn raw_breed(id: &str, name: &str) -> RawBreed {
    RawBreed {
        id: BreedId::from(id),
        name: name.to_string(),
        origin: None,
        temperament: None,
        description: None,
        life_span: None,
        wikipedia_url: None,
        alt_names: None,
        weight: None,
        intelligence: None,
        affection_level: None,
        energy_level: None,
        adaptability: None,
        child_friendly: None,
        dog_friendly: None,
        stranger_friendly: None,
        rare: None,
    }
}

/// The image [MockUpstream::with_collection] seeds for a breed.
pub fn image_for(breed_id: &BreedId) -> RawImage {
    RawImage {
        id: format!("{breed_id}-img"),
        url: format!("https://cdn.example.com/{breed_id}.jpg"),
        width: Some(1200),
        height: Some(800),
    }
}
