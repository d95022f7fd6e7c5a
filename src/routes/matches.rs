use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use validator::Validate;

use crate::models::{
    CandidatePoolQuery, ErrorResponse, HealthResponse, RunMatchRequest, RunMatchResponse,
    SuggestionView,
};
use crate::routes::{store_error_response, AppState};
use crate::services::StoreError;

const MATCH_FAILURE: &str = "Failed to compute matches";

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match/run", web::post().to(run_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matching for one attendee
///
/// POST /api/v1/match/run
///
/// Request body:
/// ```json
/// {
///   "attendeeId": "string",
///   "limit": 3
/// }
/// ```
async fn run_match(
    state: web::Data<AppState>,
    req: web::Json<RunMatchRequest>,
) -> impl Responder {
    let attendee_id = match (req.validate(), req.requester_id()) {
        (Ok(()), Some(id)) => id,
        (result, _) => {
            let message = result
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "attendeeId must not be blank".to_string());
            tracing::info!("Rejected match run request: {}", message);
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                400,
                "attendeeId is required",
                message,
            ));
        }
    };

    let limit = state.matching.effective_limit(req.limit);

    tracing::info!("Running match for attendee: {}, limit: {}", attendee_id, limit);

    let requester = match state.store.fetch_profile(attendee_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Failed to fetch attendee {}: {}", attendee_id, e);
            return match_failure(&e);
        }
    };

    let pool_query = CandidatePoolQuery {
        event_scope: requester.event_id.clone().filter(|e| !e.is_empty()),
        exclude_id: requester.id.clone(),
        cap: state.matching.candidate_pool_cap,
    };

    let pool = match state.store.fetch_candidate_pool(&pool_query).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to fetch candidate pool for {}: {}", attendee_id, e);
            return match_failure(&e);
        }
    };

    let result = state.matcher.find_matches(&requester, &pool, limit);

    if !result.suggestions.is_empty() {
        if let Err(e) = state.intros.record_matches(&requester.id, &result.suggestions).await {
            tracing::warn!("Failed to record matches for {}: {}", requester.id, e);
        }
    }

    let names: HashMap<&str, &str> = pool
        .iter()
        .map(|p| (p.id.as_str(), p.display_name()))
        .collect();

    let suggestions: Vec<SuggestionView> = result
        .suggestions
        .into_iter()
        .map(|s| {
            let name = names.get(s.partner_id.as_str()).map(|n| n.to_string());
            SuggestionView::new(s, name)
        })
        .collect();

    tracing::info!(
        "Returning {} suggestions for attendee {} ({} scored from {} candidates)",
        suggestions.len(),
        attendee_id,
        result.scored,
        result.total_candidates
    );

    HttpResponse::Ok().json(RunMatchResponse {
        ok: true,
        attendee_id: requester.id,
        suggestions,
    })
}

/// Store failure during a match run; an unknown requester stays a 404
fn match_failure(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse::new(
            404,
            MATCH_FAILURE,
            msg.clone(),
        )),
        _ => store_error_response(err, MATCH_FAILURE),
    }
}
