use actix_web::{
    cookie::{Cookie, SameSite},
    http::header::LOCATION,
    HttpRequest, HttpResponse,
};

use crate::{constants::FLASH_COOKIE, entities::flash::FlashMessage};

/// Serializes messages into a cookie value made only of URL-safe characters.
pub fn encode_flashes(messages: &[FlashMessage]) -> String {
    let json = serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&json).into_owned()
}

/// Accepts the value with or without the percent-encoding applied; anything
/// unreadable is dropped.
pub fn decode_flashes(value: &str) -> Vec<FlashMessage> {
    serde_json::from_str(value)
        .or_else(|_| {
            urlencoding::decode(value)
                .map_err(|_| ())
                .and_then(|json| serde_json::from_str(&json).map_err(|_| ()))
        })
        .unwrap_or_default()
}

pub fn flash_cookie(messages: &[FlashMessage]) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, encode_flashes(messages))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn clear_flash_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

pub fn read_flashes(req: &HttpRequest) -> Vec<FlashMessage> {
    req.cookie(FLASH_COOKIE)
        .map(|cookie| decode_flashes(cookie.value()))
        .unwrap_or_default()
}

/// `303 See Other` to `location`, queueing `messages` after any still unread.
pub fn redirect_with_flash(req: &HttpRequest, location: &str, messages: Vec<FlashMessage>) -> HttpResponse {
    let mut pending = read_flashes(req);
    pending.extend(messages);

    let mut response = HttpResponse::SeeOther();
    response.insert_header((LOCATION, location.to_string()));
    if !pending.is_empty() {
        response.cookie(flash_cookie(&pending));
    }
    response.finish()
}
