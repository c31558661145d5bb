use actix_web::cookie::{time, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};

use crate::constants::SESSION_COOKIE;
use crate::entities::session::SessionClaims;
use crate::errors::AuthError;
use crate::settings::{AppConfig, SessionKeys};

const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies the signed admin session carried in a cookie.
#[derive(Clone, Debug)]
pub struct SessionService {
    keys: SessionKeys,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionService {
    pub fn new(config: &AppConfig) -> Self {
        SessionService {
            keys: SessionKeys::from(config),
            ttl: Duration::hours(config.session_ttl_hours),
            secure_cookie: config.is_production(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: username.to_string(),
            admin: true,
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
        };

        encode(&Header::new(SESSION_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| {
                tracing::error!("Failed to sign session: {}", e);
                AuthError::TokenCreation
            })
    }

    pub fn decode(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        let claims = decode::<SessionClaims>(token, &self.keys.decoding, &validation)?.claims;
        if !claims.admin {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .finish();
        cookie.make_removal();
        cookie
    }
}
