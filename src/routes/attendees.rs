use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    AttendeeListQuery, AttendeeLookupQuery, AttendeeResponse, AttendeesResponse, ErrorResponse,
    UpsertAttendeeRequest,
};
use crate::routes::{store_error_response, AppState};

/// Attendees returned by an unfiltered directory listing
const DEFAULT_LIST_LIMIT: usize = 50;

/// Configure attendee directory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/attendees", web::post().to(upsert_attendee))
        .route("/attendees", web::get().to(get_attendees));
}

/// Create or update an attendee profile
///
/// POST /api/v1/attendees
///
/// Request body:
/// ```json
/// {
///   "id": "optional, updates when present",
///   "name": "string",
///   "role": "string",
///   "company": "string",
///   "interests": ["string"],
///   "goals": ["string"],
///   "availability": "Fri PM, Sat AM",
///   "eventCode": "devcon"
/// }
/// ```
async fn upsert_attendee(
    state: web::Data<AppState>,
    req: web::Json<UpsertAttendeeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Validation failed",
            errors.to_string(),
        ));
    }

    if req.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Missing payload",
            "At least one profile field is required",
        ));
    }

    let req = req.into_inner();

    // Event lookup failures do not block the profile write
    let event_id = match req.event_slug() {
        Some(slug) => match state.store.resolve_event_code(&slug).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Failed to resolve event code {}, continuing without event: {}", slug, e);
                None
            }
        },
        None => None,
    };

    match state.store.upsert_attendee(req.into_upsert(event_id)).await {
        Ok(attendee) => {
            tracing::info!("Upserted attendee {}", attendee.id);
            HttpResponse::Ok().json(AttendeeResponse { ok: true, attendee })
        }
        Err(e) => store_error_response(&e, "Failed to upsert attendee"),
    }
}

/// Fetch attendee(s)
///
/// GET /api/v1/attendees?id={id}
/// GET /api/v1/attendees?ids={id1,id2}
/// GET /api/v1/attendees?eventId={eventId}
/// GET /api/v1/attendees?eventCode={code}
///
/// Without a filter the most recent attendees are returned.
async fn get_attendees(
    state: web::Data<AppState>,
    query: web::Query<AttendeeLookupQuery>,
) -> impl Responder {
    if let Some(id) = query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        return match state.store.fetch_profile(id).await {
            Ok(attendee) => HttpResponse::Ok().json(AttendeeResponse { ok: true, attendee }),
            Err(e) => store_error_response(&e, "Failed to fetch attendee"),
        };
    }

    if let Some(ids) = query.id_list() {
        if ids.is_empty() {
            return HttpResponse::Ok().json(AttendeesResponse { ok: true, attendees: vec![] });
        }
        return match state.store.fetch_many(&ids).await {
            Ok(attendees) => HttpResponse::Ok().json(AttendeesResponse { ok: true, attendees }),
            Err(e) => store_error_response(&e, "Failed to fetch attendees"),
        };
    }

    let event_id = if let Some(event_id) = query.event_id.clone() {
        Some(event_id)
    } else if let Some(code) = query.event_code.as_deref() {
        let slug = code.trim().to_lowercase();
        match state.store.find_event(&slug).await {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                tracing::debug!("Unknown event code {}", slug);
                return HttpResponse::Ok().json(AttendeesResponse { ok: true, attendees: vec![] });
            }
            Err(e) => return store_error_response(&e, "Failed to fetch attendees"),
        }
    } else {
        None
    };

    let list_query = AttendeeListQuery {
        event_id,
        limit: DEFAULT_LIST_LIMIT,
    };

    match state.store.list_attendees(&list_query).await {
        Ok(attendees) => HttpResponse::Ok().json(AttendeesResponse { ok: true, attendees }),
        Err(e) => store_error_response(&e, "Failed to fetch attendees"),
    }
}
