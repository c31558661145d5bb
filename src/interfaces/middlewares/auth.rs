use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::LOCATION,
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    constants::{LOGIN_PATH, SESSION_COOKIE},
    entities::{flash::FlashMessage, session::SessionClaims},
    handlers::flash::flash_cookie,
    use_cases::auth::is_admin_route,
    AppState,
};

/// Resolves the admin session for every request and stops unauthenticated
/// requests to mutating routes before their handler (or body) is touched.
pub struct AdminGuard;

impl<S> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminGuardService {
            service: Rc::new(service),
        })
    }
}

pub struct AdminGuardService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AdminGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if let Some(claims) = session_claims(&req) {
                req.extensions_mut().insert(claims);
                return service.call(req).await;
            }

            let path = req.path().to_string();
            if is_admin_route(&path) {
                tracing::warn!(path = %path, method = %req.method(), "Admin session required");
                return Ok(req.into_response(login_redirect(&path)));
            }

            service.call(req).await
        })
    }
}

fn session_claims(req: &ServiceRequest) -> Option<SessionClaims> {
    let state = req.app_data::<web::Data<AppState>>().or_else(|| {
        tracing::error!("AppState missing in admin guard");
        None
    })?;
    let cookie = req.cookie(SESSION_COOKIE)?;

    match state.auth.authenticate(cookie.value()) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

fn login_redirect(original_path: &str) -> HttpResponse {
    let location = format!("{}?next={}", LOGIN_PATH, urlencoding::encode(original_path));

    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .cookie(flash_cookie(&[FlashMessage::info("Please log in to access this page.")]))
        .finish()
}
