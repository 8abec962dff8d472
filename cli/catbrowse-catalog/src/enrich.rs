//! Best-effort image enrichment of a result page.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::client::UpstreamTrait;
use crate::types::{Breed, BreedId};

/// Number of images requested per breed during enrichment.
const IMAGES_PER_BREED: u8 = 1;

/// Attach one representative image to every breed of a page.
///
/// All lookups run concurrently and the call returns once every lookup has
/// settled. A lookup that fails, finds nothing or exceeds `timeout` leaves
/// that breed without image and does not affect any other breed.
#[instrument(skip_all, fields(n_items = items.len()))]
pub async fn enrich_page(
    upstream: &impl UpstreamTrait,
    items: Vec<Breed>,
    timeout: Duration,
) -> Vec<Breed> {
    let lookups = items.into_iter().map(|mut breed| async move {
        breed.image = lookup_image(upstream, &breed.id, timeout).await;
        breed
    });
    join_all(lookups).await
}

async fn lookup_image(
    upstream: &impl UpstreamTrait,
    breed_id: &BreedId,
    timeout: Duration,
) -> Option<String> {
    match tokio::time::timeout(timeout, upstream.fetch_images(breed_id, IMAGES_PER_BREED)).await {
        Ok(Ok(images)) => {
            let url = images.into_iter().next().map(|image| image.url);
            if url.is_none() {
                debug!(%breed_id, "no image found for breed");
            }
            url
        },
        Ok(Err(err)) => {
            debug!(%breed_id, error = %err, "image lookup failed");
            None
        },
        Err(_) => {
            warn!(%breed_id, ?timeout, "image lookup timed out");
            None
        },
    }
}
