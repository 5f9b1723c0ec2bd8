use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{SearchEngine, SearchError};
use crate::models::{
    Coordinate, ErrorResponse, HealthResponse, NearbyRequest, PlaceView, PlacesResponse,
    RankedPlace, SummaryQuery, SummaryResponse, TextSearchRequest,
};
use crate::services::WikipediaClient;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine<WikipediaClient>>,
}

/// Configure all place-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/places/nearby", web::post().to(find_nearby))
        .route("/places/search", web::post().to(search_places))
        .route("/places/summary", web::get().to(place_summary));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find places near a coordinate
///
/// POST /api/v1/places/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.4168,
///   "longitude": -3.7038,
///   "radiusMeters": 2000,
///   "requestId": "string"
/// }
/// ```
async fn find_nearby(
    state: web::Data<AppState>,
    req: web::Json<NearbyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearby request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let reference = match Coordinate::new(req.latitude, req.longitude) {
        Ok(c) => c,
        Err(e) => return search_error_response(&e),
    };
    let radius = req
        .radius_meters
        .unwrap_or(state.engine.settings().initial_radius_m);
    let request_id = request_id(&req.request_id);

    tracing::info!(
        "Nearby search {} at ({}, {}) radius {} m",
        request_id, reference.latitude, reference.longitude, radius
    );

    match state.engine.search_nearby(reference, radius).await {
        Ok(places) => places_response(request_id, places),
        Err(e) => {
            tracing::warn!("Nearby search {} failed: {}", request_id, e);
            search_error_response(&e)
        }
    }
}

/// Search places by free text
///
/// POST /api/v1/places/search
///
/// Request body:
/// ```json
/// {
///   "query": "catedral",
///   "latitude": 40.4168,
///   "longitude": -3.7038,
///   "requestId": "string"
/// }
/// ```
async fn search_places(
    state: web::Data<AppState>,
    req: web::Json<TextSearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let reference = match req.reference() {
        Ok(Some((lat, lon))) => match Coordinate::new(lat, lon) {
            Ok(c) => Some(c),
            Err(e) => return search_error_response(&e),
        },
        Ok(None) => None,
        Err(message) => return bad_request("Validation failed", message),
    };
    let request_id = request_id(&req.request_id);

    tracing::info!("Text search {} for {:?}", request_id, req.query);

    match state.engine.search_text(&req.query, reference).await {
        Ok(places) => places_response(request_id, places),
        Err(e) => {
            tracing::warn!("Text search {} failed: {}", request_id, e);
            search_error_response(&e)
        }
    }
}

/// Intro text of a selected place
///
/// GET /api/v1/places/summary?title={title}
async fn place_summary(
    state: web::Data<AppState>,
    query: web::Query<SummaryQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    match state.engine.provider().article_summary(&query.title).await {
        Ok(summary) => HttpResponse::Ok().json(SummaryResponse {
            title: query.title.clone(),
            summary,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch summary for {}: {}", query.title, e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch summary".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

/// Echo the caller's request id so stale responses can be told apart
fn request_id(supplied: &Option<String>) -> String {
    supplied
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn places_response(request_id: String, places: Vec<RankedPlace>) -> HttpResponse {
    let places: Vec<PlaceView> = places.into_iter().map(PlaceView::from).collect();
    tracing::info!("Returning {} places for {}", places.len(), request_id);

    HttpResponse::Ok().json(PlacesResponse {
        request_id,
        total_results: places.len(),
        places,
    })
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Map a search failure onto an HTTP error response
pub fn search_error_response(err: &SearchError) -> HttpResponse {
    let (mut builder, error, status_code) = match err {
        SearchError::ProviderUnavailable(_) => {
            (HttpResponse::BadGateway(), "provider_unavailable", 502)
        }
        SearchError::NoResultsFound => (HttpResponse::NotFound(), "no_results_found", 404),
        SearchError::ReferenceCoordinateMissing => {
            (HttpResponse::BadRequest(), "reference_coordinate_missing", 400)
        }
        SearchError::InvalidCoordinate { .. } => {
            (HttpResponse::BadRequest(), "invalid_coordinate", 400)
        }
        SearchError::InvalidRadius(_) => (HttpResponse::BadRequest(), "invalid_radius", 400),
        SearchError::EmptyQuery => (HttpResponse::BadRequest(), "empty_query", 400),
    };

    builder.json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code,
    })
}
