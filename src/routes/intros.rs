use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;

use crate::models::{
    ErrorResponse, IntroAction, IntroActionRequest, IntroRespondQuery, IntroStatusResponse,
    IntroView, MyIntrosQuery, MyIntrosResponse, PartnerSummary, RequestIntroRequest,
    RequestIntroResponse,
};
use crate::routes::{store_error_response, AppState};
use crate::services::StoreError;

/// Configure introduction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/intros/request", web::post().to(request_intro))
        .route("/intros/act", web::post().to(act_on_intro))
        .route("/intros/respond", web::get().to(respond_to_intro))
        .route("/intros/mine", web::get().to(my_intros));
}

/// Propose an introduction to a matched attendee
///
/// POST /api/v1/intros/request
///
/// Request body:
/// ```json
/// {
///   "requesterId": "string",
///   "partnerId": "string"
/// }
/// ```
///
/// A partner who explicitly opted out of introductions (`consentIntro: false`)
/// cannot be asked.
async fn request_intro(
    state: web::Data<AppState>,
    req: web::Json<RequestIntroRequest>,
) -> impl Responder {
    let Some((requester_id, partner_id)) = req.participants() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Invalid input",
            "requesterId and partnerId are required",
        ));
    };

    if requester_id == partner_id {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Invalid input",
            "An attendee cannot be introduced to themselves",
        ));
    }

    let requester = state.store.fetch_profile(requester_id);
    let partner = state.store.fetch_profile(partner_id);
    let (requester, partner) = match tokio::join!(requester, partner) {
        (Ok(requester), Ok(partner)) => (requester, partner),
        (Err(e), _) => return participant_error(&e, "Requester not found"),
        (_, Err(e)) => return participant_error(&e, "Partner not found"),
    };

    if partner.consent_intro == Some(false) {
        tracing::info!("Intro from {} to {} refused: no consent", requester.id, partner.id);
        return HttpResponse::Forbidden().json(ErrorResponse::new(
            403,
            "Forbidden",
            "Partner does not accept introductions",
        ));
    }

    match state.intros.create_intro(&requester.id, &partner.id).await {
        Ok(intro) => {
            tracing::info!("Proposed intro {} from {} to {}", intro.id, requester.id, partner.id);
            HttpResponse::Ok().json(RequestIntroResponse {
                ok: true,
                intro_id: intro.id,
                status: intro.status,
            })
        }
        Err(e) => store_error_response(&e, "Failed to request intro"),
    }
}

/// Accept, decline or mark an intro as met
///
/// POST /api/v1/intros/act
///
/// Request body:
/// ```json
/// {
///   "attendeeId": "string",
///   "introId": "string",
///   "action": "accept" | "decline" | "met"
/// }
/// ```
///
/// Only the two participants may act on an intro.
async fn act_on_intro(
    state: web::Data<AppState>,
    req: web::Json<IntroActionRequest>,
) -> impl Responder {
    let Some((attendee_id, intro_id, action)) = req.parts() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Invalid input",
            "attendeeId, introId and a valid action are required",
        ));
    };

    let intro = match state.intros.fetch_intro(intro_id).await {
        Ok(intro) => intro,
        Err(e) => return store_error_response(&e, "Failed to update intro"),
    };

    if !intro.involves(attendee_id) {
        tracing::warn!("Attendee {} tried to act on intro {}", attendee_id, intro.id);
        return HttpResponse::Forbidden().json(ErrorResponse::new(
            403,
            "Forbidden",
            "Not authorized to act on this intro",
        ));
    }

    transition(&state, intro_id, action).await
}

/// Link-based accept or decline
///
/// GET /api/v1/intros/respond?id={introId}&action=accept|decline
async fn respond_to_intro(
    state: web::Data<AppState>,
    query: web::Query<IntroRespondQuery>,
) -> impl Responder {
    let Some((intro_id, action)) = query.parts() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Invalid input",
            "id and action (accept or decline) are required",
        ));
    };

    transition(&state, intro_id, action).await
}

async fn transition(state: &AppState, intro_id: &str, action: IntroAction) -> HttpResponse {
    match state.intros.transition_intro(intro_id, action).await {
        Ok(intro) => {
            tracing::info!("Intro {} is now {}", intro.id, intro.status);
            HttpResponse::Ok().json(IntroStatusResponse {
                ok: true,
                intro_id: intro.id,
                status: intro.status,
            })
        }
        Err(e) => store_error_response(&e, "Failed to update intro"),
    }
}

/// Intros where the attendee is either side, with partner details
///
/// GET /api/v1/intros/mine?attendeeId={id}
async fn my_intros(
    state: web::Data<AppState>,
    query: web::Query<MyIntrosQuery>,
) -> impl Responder {
    let Some(attendee_id) = query.attendee_id() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            400,
            "Invalid input",
            "attendeeId is required",
        ));
    };

    let intros = match state.intros.intros_for(attendee_id).await {
        Ok(intros) => intros,
        Err(e) => return store_error_response(&e, "Failed to load intros"),
    };

    let mut partner_ids: Vec<String> = intros
        .iter()
        .map(|i| i.counterpart(attendee_id).to_string())
        .collect();
    partner_ids.sort();
    partner_ids.dedup();

    // Missing partner details degrade to the bare id
    let partners: HashMap<String, PartnerSummary> = if partner_ids.is_empty() {
        HashMap::new()
    } else {
        match state.store.fetch_many(&partner_ids).await {
            Ok(profiles) => profiles
                .iter()
                .map(|p| (p.id.clone(), PartnerSummary::from(p)))
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to load intro partners for {}: {}", attendee_id, e);
                HashMap::new()
            }
        }
    };

    let views = intros
        .iter()
        .map(|intro| {
            let partner_id = intro.counterpart(attendee_id);
            let partner = partners
                .get(partner_id)
                .cloned()
                .unwrap_or_else(|| PartnerSummary::bare(partner_id));
            IntroView::new(intro, partner)
        })
        .collect();

    HttpResponse::Ok().json(MyIntrosResponse { ok: true, intros: views })
}

fn participant_error(err: &StoreError, not_found: &str) -> HttpResponse {
    match err {
        StoreError::NotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::new(404, "Not found", not_found))
        }
        _ => store_error_response(err, "Failed to request intro"),
    }
}
