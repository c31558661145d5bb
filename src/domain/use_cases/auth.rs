use url::Url;
use validator::Validate;
use zeroize::Zeroizing;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::SessionService;
use crate::constants::GALLERY_PATH;
use crate::entities::session::{LoginForm, SessionClaims};
use crate::errors::{AuthError, PasswordError};
use crate::settings::AppConfig;

/// Checks the single configured admin account and issues sessions for it.
pub struct AdminAuthenticator {
    username: String,
    password_hash: Zeroizing<String>,
    pub sessions: SessionService,
}

impl AdminAuthenticator {
    /// Hashes the configured password once so it is never compared in plain text.
    pub fn new(config: &AppConfig) -> Result<Self, PasswordError> {
        let password_hash = hash_password(&config.admin_password)?;

        Ok(AdminAuthenticator {
            username: config.admin_username.clone(),
            password_hash: Zeroizing::new(password_hash),
            sessions: SessionService::new(config),
        })
    }

    /// Exact, case-sensitive match on both fields. Returns a signed session token.
    pub fn login(&self, request: &LoginForm) -> Result<String, AuthError> {
        request.validate().map_err(|_| AuthError::WrongCredentials)?;

        let password_ok = verify_password(&request.password, &self.password_hash)?;
        if request.username != self.username || !password_ok {
            tracing::warn!("Rejected admin login attempt");
            return Err(AuthError::WrongCredentials);
        }

        let token = self.sessions.issue(&self.username)?;
        tracing::info!("Admin logged in");
        Ok(token)
    }

    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let claims = self.sessions.decode(token)?;
        if claims.sub != self.username {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Routes that change gallery state and therefore need an admin session.
/// Percent-encoded segments are decoded first, matching how the router sees them.
pub fn is_admin_route(path: &str) -> bool {
    let Ok(path) = urlencoding::decode(path) else {
        // Undecodable paths never reach a public page; keep them behind the login.
        return true;
    };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["upload"] | ["upload_image"] => true,
        ["videos" | "images", id, "delete"] => !id.is_empty(),
        _ => false,
    }
}

const LOCAL_ORIGIN: &str = "http://portfolio.invalid/";

/// Where to send the admin after login: the requested page when it resolves
/// to a browsable path on this site, the gallery otherwise.
pub fn post_login_redirect(next: Option<&str>) -> String {
    next.and_then(local_page).unwrap_or_else(|| GALLERY_PATH.to_string())
}

fn local_page(next: &str) -> Option<String> {
    // The URL parser silently drops tabs and newlines, so reject them up front.
    if !next.starts_with('/') || next.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return None;
    }

    let base = Url::parse(LOCAL_ORIGIN).ok()?;
    let target = base.join(next).ok()?;
    if target.origin() != base.origin() || is_admin_route(target.path()) {
        return None;
    }

    Some(match target.query() {
        Some(query) => format!("{}?{}", target.path(), query),
        None => target.path().to_string(),
    })
}
