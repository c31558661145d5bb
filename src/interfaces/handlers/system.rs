use actix_web::{get, web, HttpResponse, Responder};

use crate::AppState;

/// Liveness plus database reachability. Plain text so load balancers can match on it.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.gallery.media_repo.check_connection().await {
        Ok(()) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("ok"),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable()
                .content_type("text/plain; charset=utf-8")
                .body("database unavailable")
        }
    }
}
