use actix_web::{http::header::ContentType, HttpRequest, HttpResponse, ResponseError};
use tera::Context;

use crate::{
    constants::FLASH_COOKIE,
    entities::flash::FlashMessage,
    use_cases::extractors::IsAdmin,
    AppState,
};

pub mod auth;
pub mod flash;
pub mod pages;
pub mod portfolio;
pub mod system;

/// Renders `template` with the values every page expects: site name, admin
/// state and pending flash messages (which are consumed).
pub fn render_page(
    req: &HttpRequest,
    state: &AppState,
    template: &str,
    is_admin: IsAdmin,
    mut context: Context,
    extra_flashes: Vec<FlashMessage>,
) -> HttpResponse {
    let has_flash_cookie = req.cookie(FLASH_COOKIE).is_some();
    let mut flashes = flash::read_flashes(req);
    flashes.extend(extra_flashes);

    context.insert("site_name", &state.site_name);
    context.insert("is_admin", &is_admin.0);
    context.insert("uploads_enabled", &state.gallery.uploads_enabled());
    context.insert("flashes", &flashes);

    match state.templates.render(template, &context) {
        Ok(html) => {
            let mut response = HttpResponse::Ok();
            response.content_type(ContentType::html());
            if has_flash_cookie {
                response.cookie(flash::clear_flash_cookie());
            }
            response.body(html)
        }
        Err(e) => e.error_response(),
    }
}
