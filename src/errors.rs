use std::borrow::Cow;
use std::fmt;

use actix_multipart::MultipartError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    NotFound(String),
    Conflict(String),
    UnauthorizedAccess,
    PayloadTooLarge(String),
    MediaNotConfigured,
    Media(MediaError),
    Database(String),
    Template(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::UnauthorizedAccess => write!(f, "Unauthorized access"),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::MediaNotConfigured => write!(f, "Media storage is not configured"),
            AppError::Media(err) => write!(f, "Media service error: {}", err),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Template(msg) => write!(f, "Template error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // Server-rendered site: keep internals out of the body.
        let body = match self {
            AppError::Database(_) | AppError::Template(_) | AppError::InternalError(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
            AppError::Media(_) => "The media service is unavailable. Please try again later.".to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MediaNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Media(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Template(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let messages = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "invalid value".to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        AppError::InvalidInput(messages)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("Unique constraint violated".into())
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23514")) => {
                AppError::InvalidInput("Check constraint violated".into())
            }
            _ => AppError::Database(err.to_string())
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::Media(err)
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::Template(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::Payload(_) => {
                AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
            }
            MultipartError::ContentTypeIncompatible => {
                AppError::InvalidInput("Uploads must be sent as multipart/form-data".to_string())
            }
            _ => AppError::InvalidInput(format!("Malformed upload: {}", err)),
        }
    }
}

/// Failures talking to the remote media host.
#[derive(Debug, Display)]
pub enum MediaError {
    #[display("Invalid media connection string: {_0}")]
    InvalidConnectionString(String),

    #[display("Media request failed: {_0}")]
    Transport(String),

    #[display("Media service responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[display("Media service response is missing secure_url or public_id")]
    IncompleteResponse,

    #[display("Media service refused to delete the asset: {_0}")]
    DestroyRejected(String),

    #[display("Could not read upload: {_0}")]
    Io(String),
}

impl std::error::Error for MediaError {}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        MediaError::Io(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid session")]
    InvalidToken,

    #[display("Session expired")]
    TokenExpired,

    #[display("Session creation error")]
    TokenCreation,

    #[display("Wrong credentials")]
    WrongCredentials,

    #[display("Missing session")]
    MissingSession,

    #[display("Password error: {_0}")]
    PasswordError(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MissingSession => StatusCode::UNAUTHORIZED,
            AuthError::PasswordError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::PasswordError(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

impl std::error::Error for PasswordError {}
