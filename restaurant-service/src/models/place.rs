use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One establishment from a nearby search.
///
/// Holds the upstream object exactly as received and serializes back to it
/// field-for-field. The few fields this service reads go through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Place {
    fields: Map<String, Value>,
}

impl Place {
    /// Non-empty `place_id`, or `None` for records that cannot be filtered.
    pub fn place_id(&self) -> Option<&str> {
        self.text("place_id")
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// Street address: `vicinity` for nearby search, `formatted_address` otherwise.
    pub fn address(&self) -> Option<&str> {
        self.text("vicinity")
            .or_else(|| self.text("formatted_address"))
    }

    /// Any upstream field, untouched.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// `status` field of a places API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    /// REQUEST_DENIED, OVER_QUERY_LIMIT, INVALID_REQUEST, ...
    Other(String),
}

impl PlacesStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, PlacesStatus::Ok | PlacesStatus::ZeroResults)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlacesStatus::Ok => "OK",
            PlacesStatus::ZeroResults => "ZERO_RESULTS",
            PlacesStatus::Other(status) => status,
        }
    }
}

impl From<String> for PlacesStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "OK" => PlacesStatus::Ok,
            "ZERO_RESULTS" => PlacesStatus::ZeroResults,
            _ => PlacesStatus::Other(status),
        }
    }
}

/// Body of a nearby-search response.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResponse {
    pub status: PlacesStatus,
    #[serde(default)]
    pub results: Vec<Place>,
    #[serde(default)]
    pub error_message: Option<String>,
}
