use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;
use service_core::error::AppError;

use crate::models::{SearchParams, SearchQuery, SearchResponse};
use crate::startup::AppState;

/// `GET /api/restaurants?lat=..&lng=..[&radius=..][&keyword=..]`
#[tracing::instrument(skip(state, params))]
pub async fn search_restaurants(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
    let query = SearchQuery::try_from(params)?;

    let response = state.search.run(&query).await?;
    Ok(Json(response))
}
