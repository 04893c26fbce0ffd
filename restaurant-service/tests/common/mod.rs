#![allow(dead_code)]

use restaurant_service::config::{GeminiConfig, PlacesConfig, RestaurantConfig};
use restaurant_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GOOGLE_KEY: &str = "test-google-key";
pub const GEMINI_KEY: &str = "test-gemini-key";
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// A running app whose two upstreams are wiremock servers.
///
/// Expectations set with `.expect(n)` are verified when the servers drop at
/// the end of each test.
pub struct TestApp {
    pub address: String,
    pub places: MockServer,
    pub gemini: MockServer,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_keys(Some(GOOGLE_KEY), Some(GEMINI_KEY)).await
    }

    pub async fn spawn_with_keys(google_key: Option<&str>, gemini_key: Option<&str>) -> Self {
        Self::launch(google_key, gemini_key, UPSTREAM_TIMEOUT).await
    }

    /// Both keys set, with every upstream call bounded by `timeout`.
    pub async fn spawn_with_timeout(timeout: Duration) -> Self {
        Self::launch(Some(GOOGLE_KEY), Some(GEMINI_KEY), timeout).await
    }

    async fn launch(google_key: Option<&str>, gemini_key: Option<&str>, timeout: Duration) -> Self {
        let places = MockServer::start().await;
        let gemini = MockServer::start().await;

        let config = RestaurantConfig {
            common: CoreConfig { port: 0 },
            places: PlacesConfig {
                api_key: google_key.map(|key| Secret::new(key.to_string())),
                base_url: places.uri(),
                language: "zh-TW".to_string(),
                default_radius_meters: 3000,
                timeout,
            },
            gemini: GeminiConfig {
                api_key: gemini_key.map(|key| Secret::new(key.to_string())),
                base_url: gemini.uri(),
                model: GEMINI_MODEL.to_string(),
                timeout,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            places,
            gemini,
            client,
        }
    }

    pub async fn search(&self, query: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .get(format!("{}/api/restaurants", self.address))
            .query(query)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Places API answers every lookup with `body`, `expected_calls` times.
    pub async fn mock_places(&self, body: Value, expected_calls: u64) {
        self.mock_places_response(ResponseTemplate::new(200).set_body_json(body), expected_calls)
            .await;
    }

    pub async fn mock_places_response(&self, response: ResponseTemplate, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/nearbysearch/json"))
            .respond_with(response)
            .expect(expected_calls)
            .mount(&self.places)
            .await;
    }

    /// Gemini answers with `text` as the first candidate's only part.
    pub async fn mock_gemini_answer(&self, text: &str, expected_calls: u64) {
        self.mock_gemini(ResponseTemplate::new(200).set_body_json(gemini_body(text)), expected_calls)
            .await;
    }

    pub async fn mock_gemini(&self, response: ResponseTemplate, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", GEMINI_MODEL)))
            .respond_with(response)
            .expect(expected_calls)
            .mount(&self.gemini)
            .await;
    }

    /// Fail the test if either upstream receives any request.
    pub async fn forbid_outbound_calls(&self) {
        for server in [&self.places, &self.gemini] {
            Mock::given(wiremock::matchers::any())
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(server)
                .await;
        }
    }
}

pub fn restaurant(id: &str, name: &str) -> Value {
    json!({
        "place_id": id,
        "name": name,
        "vicinity": format!("{} 號, 信義區", id),
        "rating": 4.3,
        "user_ratings_total": 87,
        "geometry": { "location": { "lat": 25.033, "lng": 121.565 } },
        "types": ["restaurant", "food", "point_of_interest", "establishment"]
    })
}

pub fn places_ok(results: &[Value]) -> Value {
    json!({ "status": "OK", "results": results, "html_attributions": [] })
}

pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 200, "candidatesTokenCount": 12, "totalTokenCount": 212 }
    })
}
