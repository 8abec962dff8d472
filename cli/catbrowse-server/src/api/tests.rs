use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use catbrowse_catalog::mock::{MockCall, MockResponse, MockUpstream, raw_breed};
use catbrowse_catalog::{BreedCatalog, BreedId, Upstream};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::auth::JwtVerifier;
use crate::auth::tests::{SECRET, valid_token};

const NAMES: [(&str, &str); 5] = [
    ("siam", "Siamese"),
    ("abys", "Abyssinian"),
    ("beng", "Bengal"),
    ("pers", "Persian"),
    ("manx", "Manx"),
];

fn seeded_mock() -> MockUpstream {
    MockUpstream::with_collection(NAMES.iter().map(|(id, name)| raw_breed(id, name)).collect())
}

fn make_app(mock: &MockUpstream) -> Router {
    let catalog = BreedCatalog::new(Upstream::Mock(mock.clone()), Duration::from_secs(5));
    router(AppState::new(catalog, Arc::new(JwtVerifier::new(SECRET))))
}

async fn get(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let res = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&body).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    });
    (status, value)
}

async fn get_authorized(app: Router, uri: &str) -> (StatusCode, Value) {
    get(app, uri, Some(&valid_token())).await
}

fn names(page: &Value) -> Vec<&str> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_needs_no_token() {
    let (status, body) = get(make_app(&seeded_mock()), "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("healthy"));
}

/// Unauthenticated requests never reach the provider
#[tokio::test]
async fn catalog_routes_require_token() {
    let mock = seeded_mock();
    for uri in [
        "/api/cats/breeds",
        "/api/cats/breeds/options",
        "/api/cats/breeds/abys",
        "/api/cats/breeds-table",
    ] {
        let (status, body) = get(make_app(&mock), uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, json!({ "message": "unauthorized" }));

        let (status, _) = get(make_app(&mock), uri, Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn list_uses_defaults() {
    let (status, body) = get_authorized(make_app(&seeded_mock()), "/api/cats/breeds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 9);
    assert_eq!(names(&body), ["Abyssinian", "Bengal", "Manx", "Persian", "Siamese"]);
    assert_eq!(body["data"][0]["image"], "https://cdn.example.com/abys.jpg");
}

#[tokio::test]
async fn list_sorts_and_paginates() {
    let (status, body) = get_authorized(
        make_app(&seeded_mock()),
        "/api/cats/breeds?page=2&limit=2&sort=za",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 2);
    assert_eq!(names(&body), ["Manx", "Bengal"]);
}

#[tokio::test]
async fn list_filters_by_ids_and_term() {
    let app = make_app(&seeded_mock());
    let (_, body) = get_authorized(app, "/api/cats/breeds?breedIds=abys,pers,siam&q=AN").await;
    assert_eq!(body["total"], 2);
    assert_eq!(names(&body), ["Abyssinian", "Persian"]);
}

#[tokio::test]
async fn list_clamps_limit() {
    let (status, body) =
        get_authorized(make_app(&seeded_mock()), "/api/cats/breeds?limit=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 27);
}

#[tokio::test]
async fn list_rejects_malformed_input_before_fetching() {
    let mock = seeded_mock();
    for uri in [
        "/api/cats/breeds?page=0",
        "/api/cats/breeds?page=-1",
        "/api/cats/breeds?limit=lots",
        "/api/cats/breeds?sort=newest",
    ] {
        let (status, body) = get_authorized(make_app(&mock), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "invalid query");
        assert!(body["detail"].is_string(), "{uri}: {body}");
    }
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn undecodable_query_string_gets_error_body() {
    let mock = seeded_mock();
    for uri in [
        "/api/cats/breeds?page=1&page=2",
        "/api/cats/breeds/search?q=a&q=b",
        "/api/cats/breeds/abys/images?limit=1&limit=2",
    ] {
        let (status, body) = get_authorized(make_app(&mock), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "invalid query", "{uri}");
        let detail = body["detail"].as_str().unwrap_or_default();
        assert!(detail.contains("duplicate field"), "{uri}: {body}");
    }
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let mock = MockUpstream::new();
    mock.set_collection(MockResponse::Error {
        status: 500,
        body: "internal error".to_string(),
    });

    let (status, body) = get_authorized(make_app(&mock), "/api/cats/breeds").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "error querying the breed provider");
    assert!(
        body["detail"].as_str().unwrap().contains("internal error"),
        "{body}"
    );
}

/// A failing image lookup only drops that breed's image
#[tokio::test]
async fn image_failure_keeps_page() {
    let mock = seeded_mock();
    mock.set_images(&BreedId::from("beng"), MockResponse::Error {
        status: 429,
        body: String::new(),
    });

    let (status, body) = get_authorized(make_app(&mock), "/api/cats/breeds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"][1]["id"], "beng");
    assert!(body["data"][1].get("image").is_none());
    assert!(body["data"][0]["image"].is_string());
}

#[tokio::test]
async fn options_are_sorted() {
    let (status, body) =
        get_authorized(make_app(&seeded_mock()), "/api/cats/breeds/options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], json!({ "id": "abys", "label": "Abyssinian" }));
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn breed_by_id() {
    let mock = seeded_mock();
    let (status, body) = get_authorized(make_app(&mock), "/api/cats/breeds/pers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Persian");

    let (status, body) = get_authorized(make_app(&mock), "/api/cats/breeds/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "breed not found" }));
}

#[tokio::test]
async fn breed_images_clamp_limit() {
    let mock = seeded_mock();
    let (status, body) =
        get_authorized(make_app(&mock), "/api/cats/breeds/abys/images?limit=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["url"], "https://cdn.example.com/abys.jpg");
    assert_eq!(mock.calls(), [MockCall::FetchImages(BreedId::from("abys"), 20)]);
}

#[tokio::test]
async fn search_forwards_term() {
    let mock = MockUpstream::new();
    mock.set_search(MockResponse::Ok(vec![raw_breed("sfol", "Scottish Fold")]));

    let (status, body) =
        get_authorized(make_app(&mock), "/api/cats/breeds/search?q=scottish%20fold").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "sfol");
    assert_eq!(mock.calls(), [MockCall::SearchCollection(
        "scottish fold".to_string()
    )]);

    let (_, body) = get_authorized(make_app(&mock), "/api/cats/breeds/search").await;
    assert_eq!(body, json!([]));
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn table_rows() {
    let (status, body) = get_authorized(make_app(&seeded_mock()), "/api/cats/breeds-table").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["id"], "siam");
    assert!(body[0].get("weight_metric").is_some());
}
