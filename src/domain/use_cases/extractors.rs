use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::{entities::session::SessionClaims, errors::AuthError};

/// Extractor for a verified admin session placed in the request by `AdminGuard`.
/// Returns 401 when the visitor is not logged in.
#[derive(Debug)]
pub struct AdminSession(pub SessionClaims);

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<SessionClaims>() {
            Some(claims) if claims.admin => ready(Ok(AdminSession(claims.clone()))),
            _ => ready(Err(AuthError::MissingSession.into())),
        }
    }
}

/// Whether the current visitor holds an admin session. Never fails; pages
/// use it to decide whether to show admin controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsAdmin(pub bool);

impl FromRequest for IsAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let is_admin = req
            .extensions()
            .get::<SessionClaims>()
            .is_some_and(|claims| claims.admin);
        ready(Ok(IsAdmin(is_admin)))
    }
}
