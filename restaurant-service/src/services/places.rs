//! Places lookup client.
//!
//! Wraps Google Places "Nearby Search" with the category fixed to
//! restaurants.

use crate::config::PlacesConfig;
use crate::models::{NearbySearchResponse, PlacesStatus};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use service_core::observability::TracedClientExt;
use thiserror::Error;

/// Place category sent with every lookup.
pub const RESTAURANT_TYPE: &str = "restaurant";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("GOOGLE_KEY is not configured")]
    MissingCredential,

    #[error("Places API returned {status}: {message}")]
    Upstream { status: String, message: String },

    #[error("Places API responded with HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("Places API request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Places API response could not be decoded: {0}")]
    Decode(reqwest::Error),
}

/// Coordinates and radius of one lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySearch {
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: u32,
}

#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    config: PlacesConfig,
}

impl PlacesClient {
    pub fn new(client: Client, config: PlacesConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn default_radius(&self) -> u32 {
        self.config.default_radius_meters
    }

    /// Restaurants near `search`. `ZERO_RESULTS` comes back as an empty,
    /// successful response.
    pub async fn nearby_restaurants(
        &self,
        search: &NearbySearch,
    ) -> Result<NearbySearchResponse, LookupError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(LookupError::MissingCredential)?;

        let url = format!("{}/nearbysearch/json", self.config.base_url);
        let location = format!("{},{}", search.lat, search.lng);
        let radius = search.radius_meters.to_string();

        tracing::debug!(
            lat = search.lat,
            lng = search.lng,
            radius = search.radius_meters,
            "Requesting nearby restaurants"
        );

        let response = self
            .client
            .traced_get(&url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", RESTAURANT_TYPE),
                ("language", self.config.language.as_str()),
                ("key", api_key.expose_secret().as_str()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await
            // The URL carries the key; keep it out of error text.
            .map_err(|e| LookupError::Transport(e.without_url()))?;

        if !response.status().is_success() {
            return Err(LookupError::HttpStatus(response.status()));
        }

        let body: NearbySearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.without_url()))?;

        if !body.status.is_success() {
            let status = body.status.as_str().to_string();
            let message = body.error_message.clone().unwrap_or_else(|| status.clone());
            return Err(LookupError::Upstream { status, message });
        }

        if body.status == PlacesStatus::ZeroResults {
            tracing::debug!("Places API returned ZERO_RESULTS");
        }

        Ok(body)
    }
}
