use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find places around a coordinate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(alias = "radius_meters", rename = "radiusMeters", default)]
    pub radius_meters: Option<f64>,
    #[serde(alias = "request_id", rename = "requestId", default)]
    pub request_id: Option<String>,
}

/// Request to search places by free text
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TextSearchRequest {
    #[validate(length(min = 1, max = 300))]
    pub query: String,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(alias = "request_id", rename = "requestId", default)]
    pub request_id: Option<String>,
}

impl TextSearchRequest {
    /// Latitude and longitude must be supplied together
    pub fn reference(&self) -> Result<Option<(f64, f64)>, String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(Some((lat, lon))),
            (None, None) => Ok(None),
            _ => Err("latitude and longitude must be provided together".to_string()),
        }
    }
}

/// Query string for the summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummaryQuery {
    #[validate(length(min = 1))]
    pub title: String,
}
