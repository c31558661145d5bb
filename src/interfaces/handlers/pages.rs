use actix_web::{get, web, HttpRequest, Responder};
use tera::Context;

use crate::{handlers::render_page, use_cases::extractors::IsAdmin, AppState};

#[get("/")]
pub async fn home(req: HttpRequest, state: web::Data<AppState>, admin: IsAdmin) -> impl Responder {
    render_page(&req, &state, "index.html", admin, Context::new(), Vec::new())
}

#[get("/about")]
pub async fn about(req: HttpRequest, state: web::Data<AppState>, admin: IsAdmin) -> impl Responder {
    render_page(&req, &state, "about.html", admin, Context::new(), Vec::new())
}

#[get("/contact")]
pub async fn contact(req: HttpRequest, state: web::Data<AppState>, admin: IsAdmin) -> impl Responder {
    render_page(&req, &state, "contact.html", admin, Context::new(), Vec::new())
}
