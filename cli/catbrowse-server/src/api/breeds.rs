use std::num::NonZeroU32;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use catbrowse_catalog::{
    Breed,
    BreedId,
    BreedImage,
    BreedOption,
    BreedTableRow,
    ImageLimit,
    InvalidQueryError,
    PageSize,
    ResultPage,
    SortMode,
};
use serde::Deserialize;

use super::AppState;
use super::error::ApiError;

pub(in crate::api) fn router() -> Router<AppState> {
    Router::new()
        .route("/breeds", get(list_breeds))
        .route("/breeds/options", get(breed_options))
        .route("/breeds/search", get(search_breeds))
        .route("/breeds/{id}", get(get_breed))
        .route("/breeds/{id}/images", get(breed_images))
        .route("/breeds-table", get(breeds_table))
}

/// Raw query string of the list endpoint.
///
/// Everything is taken as text so malformed values are reported with our
/// own error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "breedIds")]
    pub breed_ids: Option<String>,
}

impl TryFrom<ListParams> for catbrowse_catalog::Query {
    type Error = InvalidQueryError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let page = match non_blank(params.page.as_deref()) {
            None => NonZeroU32::MIN,
            Some(value) => value
                .parse::<NonZeroU32>()
                .map_err(|_| InvalidQueryError::NotAPositiveInteger {
                    name: "page",
                    value: value.to_string(),
                })?,
        };

        let page_size = match non_blank(params.limit.as_deref()) {
            None => PageSize::default(),
            Some(value) => PageSize::clamped(parse_limit(value)?),
        };

        let sort = match non_blank(params.sort.as_deref()) {
            None => SortMode::default(),
            Some(value) => value.parse()?,
        };

        let breed_ids = params
            .breed_ids
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(BreedId::from)
            .collect();

        Ok(catbrowse_catalog::Query {
            search_term: params.q.unwrap_or_default(),
            breed_ids,
            sort,
            page,
            page_size,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageParams {
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a limit that will be clamped, negative values count as zero.
fn parse_limit(value: &str) -> Result<u64, InvalidQueryError> {
    value
        .parse::<i64>()
        .map(|n| n.max(0) as u64)
        .map_err(|_| InvalidQueryError::NotAnInteger {
            name: "limit",
            value: value.to_string(),
        })
}

#[tracing::instrument(skip(state))]
async fn list_breeds(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ResultPage>, ApiError> {
    let Query(params) = params?;
    let query = catbrowse_catalog::Query::try_from(params)?;
    let page = state.catalog.run_query(&query).await?;
    Ok(Json(page))
}

async fn breed_options(State(state): State<AppState>) -> Result<Json<Vec<BreedOption>>, ApiError> {
    Ok(Json(state.catalog.options().await?))
}

#[tracing::instrument(skip(state))]
async fn search_breeds(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Breed>>, ApiError> {
    let Query(SearchParams { q }) = params?;
    Ok(Json(state.catalog.search(&q).await?))
}

#[tracing::instrument(skip(state))]
async fn get_breed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Breed>, ApiError> {
    Ok(Json(state.catalog.breed(&id).await?))
}

#[tracing::instrument(skip(state))]
async fn breed_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<ImageParams>, QueryRejection>,
) -> Result<Json<Vec<BreedImage>>, ApiError> {
    let Query(params) = params?;
    let limit = match non_blank(params.limit.as_deref()) {
        None => ImageLimit::default(),
        Some(value) => ImageLimit::clamped(parse_limit(value)?),
    };
    Ok(Json(state.catalog.breed_images(&id, limit).await?))
}

async fn breeds_table(
    State(state): State<AppState>,
) -> Result<Json<Vec<BreedTableRow>>, ApiError> {
    Ok(Json(state.catalog.table().await?))
}
