// Route exports
pub mod admin;
pub mod attendees;
pub mod intros;
pub mod matches;

use actix_web::{error, web, HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{IntroStore, ProfileStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub intros: Arc<dyn IntroStore>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(attendees::configure)
            .configure(intros::configure)
            .configure(admin::configure),
    );
}

/// Extractor configs that render payload errors as JSON
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error));
}

/// JSON error response for extractor failures
#[derive(Debug)]
pub struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError(ErrorResponse::new(400, "invalid_json", format!("Invalid JSON: {}", err))).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError(ErrorResponse::new(400, "invalid_query", format!("Invalid query: {}", err))).into()
}

/// Map a store failure onto an HTTP response
///
/// Not-found, invalid input and conflicts keep their meaning; database
/// errors are logged and reported as `failure` with a 500.
pub(crate) fn store_error_response(err: &StoreError, failure: &str) -> HttpResponse {
    match err {
        StoreError::NotFound(msg) => {
            HttpResponse::NotFound().json(ErrorResponse::new(404, "Not found", msg.clone()))
        }
        StoreError::InvalidInput(msg) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(400, "Invalid input", msg.clone()))
        }
        StoreError::Conflict(msg) => {
            HttpResponse::Conflict().json(ErrorResponse::new(409, "Conflict", msg.clone()))
        }
        StoreError::SqlxError(e) => {
            tracing::error!("{}: {}", failure, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(500, failure, e.to_string()))
        }
    }
}
