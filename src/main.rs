use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use geoplaces::config::Settings;
use geoplaces::core::{RelevanceFilter, SearchEngine};
use geoplaces::routes::{self, places::AppState};
use geoplaces::services::WikipediaClient;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the logging section applies
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io_error(format!("Configuration error: {}", e))
    })?;

    // Initialize logging (LOG_LEVEL / LOG_FORMAT override the config file)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match log_format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }

    info!("Starting Geoplaces search service...");

    // Initialize MediaWiki client
    let wikipedia = WikipediaClient::new(
        settings.wikipedia.endpoint.clone(),
        &settings.wikipedia.user_agent,
        settings.wikipedia.timeout_secs,
        settings.wikipedia.thumbnail_size,
    )
    .map_err(|e| {
        error!("Failed to create MediaWiki client: {}", e);
        io_error(e.to_string())
    })?;

    info!("MediaWiki client initialized for {}", wikipedia.endpoint());

    // Initialize relevance filter with the configured keyword policy
    let filter = RelevanceFilter::new(settings.keyword_policy()).map_err(|e| {
        error!("Invalid relevance keywords: {}", e);
        io_error(e.to_string())
    })?;

    let engine_settings = settings.engine_settings();
    let engine = SearchEngine::new(wikipedia, filter, engine_settings);

    info!("Search engine initialized with {:?} ({:?} policy)", engine_settings, settings.relevance.policy);

    // Build application state
    let app_state = AppState {
        engine: Arc::new(engine),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
