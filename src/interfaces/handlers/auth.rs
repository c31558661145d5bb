use actix_web::{get, post, web, HttpRequest, Responder};
use tera::Context;
use tracing::instrument;

use crate::{
    constants::LOGIN_PATH,
    entities::{
        flash::FlashMessage,
        session::{LoginForm, LoginQuery},
    },
    errors::AuthError,
    handlers::{flash::redirect_with_flash, render_page},
    use_cases::{auth::post_login_redirect, extractors::IsAdmin},
    AppState,
};

#[get("/login")]
pub async fn login_page(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: IsAdmin,
    query: web::Query<LoginQuery>,
) -> impl Responder {
    let mut context = Context::new();
    context.insert("next", &query.next.clone().unwrap_or_default());

    render_page(&req, &state, "login.html", admin, context, Vec::new())
}

#[post("/login")]
#[instrument(skip(req, state, form), fields(username = %form.username))]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let form = form.into_inner();

    match state.auth.login(&form) {
        Ok(token) => {
            let target = post_login_redirect(form.next.as_deref());
            let mut response = redirect_with_flash(
                &req,
                &target,
                vec![FlashMessage::success("Logged in successfully.")],
            );
            if let Err(e) = response.add_cookie(&state.auth.sessions.session_cookie(token)) {
                tracing::error!("Failed to attach session cookie: {}", e);
            }
            response
        }
        Err(AuthError::WrongCredentials) => {
            let location = match form.next.as_deref().filter(|next| !next.is_empty()) {
                Some(next) => format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next)),
                None => LOGIN_PATH.to_string(),
            };
            redirect_with_flash(
                &req,
                &location,
                vec![FlashMessage::error("Invalid username or password.")],
            )
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            redirect_with_flash(
                &req,
                LOGIN_PATH,
                vec![FlashMessage::error("Login is temporarily unavailable.")],
            )
        }
    }
}

#[get("/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let mut response = redirect_with_flash(&req, "/", vec![FlashMessage::info("Logged out.")]);
    if let Err(e) = response.add_cookie(&state.auth.sessions.removal_cookie()) {
        tracing::error!("Failed to clear session cookie: {}", e);
    }
    response
}
