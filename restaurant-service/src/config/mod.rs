use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Default nearby-search radius in meters when the caller omits `radius`.
pub const DEFAULT_RADIUS_METERS: u32 = 3000;

/// Largest radius the places API accepts.
pub const MAX_RADIUS_METERS: u32 = 50_000;

const DEFAULT_PLACES_API_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const DEFAULT_PLACES_LANGUAGE: &str = "zh-TW";
const DEFAULT_PLACES_TIMEOUT_SECS: u64 = 10;

const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct RestaurantConfig {
    pub common: core_config::Config,
    pub places: PlacesConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// `GOOGLE_KEY`. Checked per request, not at startup.
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    /// Language hint passed to the places API.
    pub language: String,
    pub default_radius_meters: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `GEMINI_KEY`. Without it the semantic filter is skipped.
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl RestaurantConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Ok(Self::from_lookup(common, |key| env::var(key).ok()))
    }

    /// Build from any key lookup; `load` passes the process environment.
    pub fn from_lookup(
        common: core_config::Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let secret = |key: &str| get(key).map(Secret::new);
        let string_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        RestaurantConfig {
            common,
            places: PlacesConfig {
                api_key: secret("GOOGLE_KEY"),
                base_url: trim_base_url(string_or(
                    "PLACES_API_BASE_URL",
                    DEFAULT_PLACES_API_BASE_URL,
                )),
                language: string_or("PLACES_LANGUAGE", DEFAULT_PLACES_LANGUAGE),
                default_radius_meters: parse_or(
                    "PLACES_DEFAULT_RADIUS_METERS",
                    get("PLACES_DEFAULT_RADIUS_METERS"),
                    DEFAULT_RADIUS_METERS,
                    |radius| (1..=MAX_RADIUS_METERS).contains(radius),
                ),
                timeout: Duration::from_secs(parse_or(
                    "PLACES_TIMEOUT_SECS",
                    get("PLACES_TIMEOUT_SECS"),
                    DEFAULT_PLACES_TIMEOUT_SECS,
                    |secs| *secs > 0,
                )),
            },
            gemini: GeminiConfig {
                api_key: secret("GEMINI_KEY"),
                base_url: trim_base_url(string_or(
                    "GEMINI_API_BASE_URL",
                    DEFAULT_GEMINI_API_BASE_URL,
                )),
                model: string_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                timeout: Duration::from_secs(parse_or(
                    "GEMINI_TIMEOUT_SECS",
                    get("GEMINI_TIMEOUT_SECS"),
                    DEFAULT_GEMINI_TIMEOUT_SECS,
                    |secs| *secs > 0,
                )),
            },
        }
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Parse `raw`, falling back to `default` when it is unparseable or rejected
/// by `accept`.
fn parse_or<T>(key: &str, raw: Option<String>, default: T, accept: impl Fn(&T) -> bool) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match raw {
        None => default,
        Some(value) => value.parse().ok().filter(|parsed| accept(parsed)).unwrap_or_else(|| {
            tracing::warn!(
                key,
                value = %value,
                default = %default,
                "Ignoring malformed configuration value"
            );
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> RestaurantConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RestaurantConfig::from_lookup(core_config::Config::default(), |key| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]);

        assert!(config.places.api_key.is_none());
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.places.default_radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(config.places.language, "zh-TW");
        assert_eq!(config.places.base_url, DEFAULT_PLACES_API_BASE_URL);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout, Duration::from_secs(20));
    }

    #[test]
    fn credentials_are_read_and_blank_counts_as_missing() {
        let config = config_from(&[("GOOGLE_KEY", "places-key"), ("GEMINI_KEY", "   ")]);

        assert_eq!(
            config.places.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("places-key")
        );
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("PLACES_DEFAULT_RADIUS_METERS", "far"),
            ("GEMINI_TIMEOUT_SECS", "5"),
        ]);

        assert_eq!(config.places.default_radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(config.gemini.timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_or_out_of_range_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("PLACES_DEFAULT_RADIUS_METERS", "0"),
            ("PLACES_TIMEOUT_SECS", "0"),
            ("GEMINI_TIMEOUT_SECS", "0"),
        ]);

        assert_eq!(config.places.default_radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(config.places.timeout, Duration::from_secs(10));
        assert_eq!(config.gemini.timeout, Duration::from_secs(20));

        let config = config_from(&[("PLACES_DEFAULT_RADIUS_METERS", "50001")]);
        assert_eq!(config.places.default_radius_meters, DEFAULT_RADIUS_METERS);

        let config = config_from(&[("PLACES_DEFAULT_RADIUS_METERS", "50000")]);
        assert_eq!(config.places.default_radius_meters, 50_000);
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let config = config_from(&[("PLACES_API_BASE_URL", "http://127.0.0.1:9000/")]);
        assert_eq!(config.places.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let config = config_from(&[("GOOGLE_KEY", "super-secret")]);
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
