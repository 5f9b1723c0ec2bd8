use serde::{Deserialize, Serialize};

use crate::core::engine::SearchError;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside [-90,90] x [-180,180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SearchError> {
        let coordinate = Self { latitude, longitude };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(SearchError::InvalidCoordinate { latitude, longitude })
        }
    }

    /// NaN fails both range checks, so it is rejected here too
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Raw search hit returned by a provider before enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub identity: String,
    pub coordinate: Option<Coordinate>,
    pub thumbnail: Option<String>,
}

impl Candidate {
    pub fn titled(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            coordinate: None,
            thumbnail: None,
        }
    }

    pub fn located(identity: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            identity: identity.into(),
            coordinate: Some(coordinate),
            thumbnail: None,
        }
    }

    /// Fill in whatever the detail lookup knows that this candidate lacks.
    /// Data already on the candidate is never overwritten.
    pub fn enrich(mut self, details: Option<&ArticleDetails>) -> Self {
        if let Some(details) = details {
            if self.coordinate.is_none() {
                self.coordinate = details.coordinate;
            }
            if self.thumbnail.is_none() {
                self.thumbnail = details.thumbnail.clone();
            }
        }
        self
    }
}

/// Detail record for one article, as returned by the provider's detail lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleDetails {
    pub coordinate: Option<Coordinate>,
    pub thumbnail: Option<String>,
}

/// Enriched, filtered and distance-annotated place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlace {
    pub identity: String,
    pub coordinate: Coordinate,
    pub thumbnail: Option<String>,
    #[serde(rename = "distanceMeters")]
    pub distance_meters: Option<f64>,
}

impl RankedPlace {
    /// Returns `None` when the candidate has no coordinate, since such a
    /// candidate cannot be ranked.
    pub fn from_candidate(candidate: Candidate) -> Option<Self> {
        let coordinate = candidate.coordinate?;
        Some(Self {
            identity: candidate.identity,
            coordinate,
            thumbnail: candidate.thumbnail,
            distance_meters: None,
        })
    }
}
