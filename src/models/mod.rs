// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ArticleDetails, Candidate, Coordinate, RankedPlace};
pub use requests::{NearbyRequest, SummaryQuery, TextSearchRequest};
pub use responses::{ErrorResponse, HealthResponse, PlaceView, PlacesResponse, SummaryResponse};
