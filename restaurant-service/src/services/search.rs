//! Request pipeline: places lookup, optional semantic filter, merge.

use super::merger::merge;
use super::places::{LookupError, NearbySearch, PlacesClient};
use super::providers::gemini::GeminiTextProvider;
use super::semantic_filter::{self, FilterOutcome, SemanticFilter, SkipReason};
use crate::config::RestaurantConfig;
use crate::models::{Place, SearchQuery, SearchResponse};
use metrics::counter;
use reqwest::Client;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;

/// Stateless between requests; clones share the connection pool and config.
#[derive(Clone)]
pub struct RestaurantSearch {
    config: Arc<RestaurantConfig>,
    http: Client,
    places: PlacesClient,
}

impl RestaurantSearch {
    pub fn new(config: RestaurantConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("restaurant-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
            })?;

        let places = PlacesClient::new(http.clone(), config.places.clone());

        Ok(Self {
            config: Arc::new(config),
            http,
            places,
        })
    }

    pub async fn run(&self, query: &SearchQuery) -> Result<SearchResponse, AppError> {
        if !self.places.is_configured() {
            counter!("restaurant_lookups_total", "outcome" => "not_configured").increment(1);
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Places API key (GOOGLE_KEY) is not configured"
            )));
        }

        let search = NearbySearch {
            lat: query.lat,
            lng: query.lng,
            radius_meters: query.radius.unwrap_or_else(|| self.places.default_radius()),
        };

        let lookup = self.places.nearby_restaurants(&search).await.map_err(|e| {
            counter!("restaurant_lookups_total", "outcome" => "error").increment(1);
            lookup_error(e)
        })?;
        counter!("restaurant_lookups_total", "outcome" => "ok").increment(1);

        tracing::info!(
            lat = search.lat,
            lng = search.lng,
            radius = search.radius_meters,
            status = lookup.status.as_str(),
            count = lookup.results.len(),
            "Fetched nearby restaurants"
        );

        let outcome = self
            .semantic_filter(query.keyword.as_deref(), &lookup.results)
            .await;
        counter!("semantic_filter_total", "outcome" => outcome.label()).increment(1);

        let results = merge(&lookup.results, outcome.kept());

        match &outcome {
            FilterOutcome::Applied(_) if results.is_empty() => tracing::warn!(
                keyword = query.keyword.as_deref().unwrap_or_default(),
                candidates = lookup.results.len(),
                "Semantic filter removed every candidate"
            ),
            FilterOutcome::Applied(_) => tracing::info!(
                keyword = query.keyword.as_deref().unwrap_or_default(),
                candidates = lookup.results.len(),
                kept = results.len(),
                "Applied semantic filter"
            ),
            FilterOutcome::Skipped(reason) => {
                tracing::debug!(reason = %reason, "Semantic filter skipped")
            }
            FilterOutcome::Failed(_) => {}
        }

        Ok(SearchResponse::from_results(results))
    }

    /// Runs the filter only when keyword, candidates and credential are all
    /// present. The Gemini provider is built here, per request.
    async fn semantic_filter(&self, keyword: Option<&str>, places: &[Place]) -> FilterOutcome {
        let keyword = match semantic_filter::plan(keyword, places) {
            Ok(keyword) => keyword,
            Err(reason) => return FilterOutcome::Skipped(reason),
        };

        let Some(api_key) = self.config.gemini.api_key.clone() else {
            tracing::warn!("GEMINI_KEY is not configured; returning unfiltered results");
            return FilterOutcome::Skipped(SkipReason::NotConfigured);
        };

        let provider = GeminiTextProvider::new(self.http.clone(), api_key, &self.config.gemini);
        SemanticFilter::new(&provider).apply(keyword, places).await
    }
}

fn lookup_error(error: LookupError) -> AppError {
    match error {
        LookupError::MissingCredential => AppError::ConfigError(anyhow::anyhow!(error)),
        LookupError::Upstream { .. }
        | LookupError::HttpStatus(_)
        | LookupError::Transport(_)
        | LookupError::Decode(_) => AppError::Upstream(error.to_string()),
    }
}
