use super::Place;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// Raw query string of `GET /api/restaurants`. Everything arrives as text so
/// that missing and malformed values produce the same JSON error shape.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub keyword: Option<String>,
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "lng must be between -180 and 180"))]
    pub lng: f64,
    /// Meters. `None` means the configured default.
    #[validate(range(min = 1, max = 50000, message = "radius must be between 1 and 50000"))]
    pub radius: Option<u32>,
    pub keyword: Option<String>,
}

impl TryFrom<SearchParams> for SearchQuery {
    type Error = AppError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let query = SearchQuery {
            lat: parse_coordinate("lat", params.lat.as_deref())?,
            lng: parse_coordinate("lng", params.lng.as_deref())?,
            radius: parse_radius(params.radius.as_deref())?,
            keyword: params.keyword,
        };
        query.validate()?;
        Ok(query)
    }
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("{} is required", name)))?;

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AppError::BadRequest(anyhow::anyhow!(
            "{} must be a number, got '{}'",
            name,
            raw
        ))),
    }
}

fn parse_radius(raw: Option<&str>) -> Result<Option<u32>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
            AppError::BadRequest(anyhow::anyhow!(
                "radius must be a whole number of meters, got '{}'",
                value
            ))
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ZERO_RESULTS")]
    ZeroResults,
}

/// Success body: `{"status": "OK" | "ZERO_RESULTS", "results": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub results: Vec<Place>,
}

impl SearchResponse {
    pub fn from_results(results: Vec<Place>) -> Self {
        let status = if results.is_empty() {
            SearchStatus::ZeroResults
        } else {
            SearchStatus::Ok
        };
        Self { status, results }
    }
}
