use serde::{Deserialize, Serialize};

use crate::core::distance::format_distance;
use crate::models::domain::{Coordinate, RankedPlace};

/// A ranked place shaped for the front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceView {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub thumbnail: Option<String>,
    #[serde(rename = "distanceMeters")]
    pub distance_meters: Option<f64>,
    #[serde(rename = "distanceLabel")]
    pub distance_label: Option<String>,
    #[serde(rename = "mapUrl")]
    pub map_url: String,
}

impl From<RankedPlace> for PlaceView {
    fn from(place: RankedPlace) -> Self {
        Self {
            distance_label: place.distance_meters.map(format_distance),
            map_url: map_url(&place.coordinate),
            title: place.identity,
            latitude: place.coordinate.latitude,
            longitude: place.coordinate.longitude,
            thumbnail: place.thumbnail,
            distance_meters: place.distance_meters,
        }
    }
}

/// Link to the place on a map, zoomed to street level
pub fn map_url(coordinate: &Coordinate) -> String {
    format!(
        "https://www.google.com/maps?q={},{}&z=15",
        coordinate.latitude, coordinate.longitude
    )
}

/// Response for both search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub places: Vec<PlaceView>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Response for the article summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub title: String,
    pub summary: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_view_from_ranked_place() {
        let place = RankedPlace {
            identity: "Museo del Prado".to_string(),
            coordinate: Coordinate { latitude: 40.4138, longitude: -3.6921 },
            thumbnail: None,
            distance_meters: Some(1234.0),
        };

        let view = PlaceView::from(place);
        assert_eq!(view.title, "Museo del Prado");
        assert_eq!(view.distance_label.as_deref(), Some("1.2 km"));
        assert_eq!(view.map_url, "https://www.google.com/maps?q=40.4138,-3.6921&z=15");
    }

    #[test]
    fn test_place_view_without_distance() {
        let place = RankedPlace {
            identity: "Alhambra".to_string(),
            coordinate: Coordinate { latitude: 37.176, longitude: -3.588 },
            thumbnail: Some("https://upload.example/alhambra.jpg".to_string()),
            distance_meters: None,
        };

        let view = PlaceView::from(place);
        assert!(view.distance_label.is_none());
        assert!(view.distance_meters.is_none());
    }
}
