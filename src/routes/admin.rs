use actix_web::{web, HttpResponse, Responder};

use crate::models::{EventMetrics, MetricsResponse};
use crate::routes::AppState;

/// Configure admin routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/metrics", web::get().to(metrics));
}

/// Dashboard counters
///
/// GET /api/v1/admin/metrics
///
/// Always answers 200; a failing store reports zeros so the dashboard keeps rendering.
async fn metrics(state: web::Data<AppState>) -> impl Responder {
    let data = match state.intros.metrics().await {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::warn!("Failed to compute metrics, reporting zeros: {}", e);
            EventMetrics::default()
        }
    };

    HttpResponse::Ok().json(MetricsResponse { ok: true, data })
}
