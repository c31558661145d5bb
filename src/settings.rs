use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::{distributions::Alphanumeric, Rng};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

use crate::constants::MAX_UPLOAD_BYTES;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme";

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,

    /// `cloudinary://<api_key>:<api_secret>@<cloud_name>`. Uploads are disabled without it.
    #[serde(default)]
    pub media_url: Option<String>,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_template_dir")]
    pub template_dir: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_session_ttl() -> i64 {
    12
}
fn default_admin_username() -> String {
    DEFAULT_ADMIN_USERNAME.to_string()
}
fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}
fn default_max_upload_bytes() -> usize {
    MAX_UPLOAD_BYTES
}
fn default_template_dir() -> String {
    "templates".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").try_parsing(true).ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Hosting platforms export the unprefixed names
        config.database_url = normalize_database_url(
            &fill_or_env(config.database_url, "DATABASE_URL")?
        );
        config.session_secret = match fill_or_env(config.session_secret, "SECRET_KEY") {
            Ok(secret) => secret,
            Err(_) if config.env == AppEnvironment::Development => {
                tracing::warn!("No session secret configured; sessions will not survive a restart");
                generate_secret()
            }
            Err(e) => return Err(e),
        };

        if config.media_url.is_none() {
            config.media_url = env::var("CLOUDINARY_URL").ok().filter(|url| !url.trim().is_empty());
        }
        if let Ok(username) = env::var("ADMIN_USERNAME") {
            if config.admin_username == DEFAULT_ADMIN_USERNAME && !username.is_empty() {
                config.admin_username = username;
            }
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            if config.admin_password == DEFAULT_ADMIN_PASSWORD && !password.is_empty() {
                config.admin_password = password;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.session_secret.len() < MIN_SECRET_LEN {
            errors.push("SESSION_SECRET must be at least 32 characters");
        }
        if self.admin_username.trim().is_empty() {
            errors.push("ADMIN_USERNAME cannot be empty");
        }
        if self.admin_password.is_empty() {
            errors.push("ADMIN_PASSWORD cannot be empty");
        }
        if self.is_production() && self.admin_password == DEFAULT_ADMIN_PASSWORD {
            errors.push("The default ADMIN_PASSWORD is not allowed in production");
        }
        if self.max_upload_bytes == 0 {
            errors.push("MAX_UPLOAD_BYTES must be greater than zero");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Diagnostic detail is only shown to users outside production.
    pub fn is_debug(&self) -> bool {
        !self.is_production()
    }

    pub fn uses_default_admin_credentials(&self) -> bool {
        self.admin_username == DEFAULT_ADMIN_USERNAME || self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Rewrites driver-qualified and legacy schemes to the `postgres://` scheme sqlx expects.
pub fn normalize_database_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some((scheme, rest)) = trimmed.split_once("://") else {
        return trimmed.to_string();
    };

    let base = scheme.split('+').next().unwrap_or(scheme);
    match base {
        "postgres" | "postgresql" => format!("postgres://{}", rest),
        _ => trimmed.to_string(),
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < MIN_SECRET_LEN {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &"[REDACTED]")
            .field("session_secret", &self.session_secret.redact())
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("media_url", &self.media_url.as_ref().map(|_| "[REDACTED]"))
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("template_dir", &self.template_dir)
            .finish()
    }
}

#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &str) -> Self {
        let secret = Zeroizing::new(secret.to_owned());

        SessionKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl From<&AppConfig> for SessionKeys {
    fn from(config: &AppConfig) -> Self {
        SessionKeys::from_secret(&config.session_secret)
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Portfolio".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/portfolio".into(),
            session_secret: "a-session-secret-that-is-long-enough-for-tests".into(),
            session_ttl_hours: 1,
            media_url: None,
            admin_username: "owner".into(),
            admin_password: "Correct-Horse-Battery-9".into(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            template_dir: "templates".into(),
        }
    }

    #[test]
    fn normalizes_driver_qualified_urls() {
        assert_eq!(
            normalize_database_url("postgresql+psycopg://u:p@db:5432/app"),
            "postgres://u:p@db:5432/app"
        );
        assert_eq!(
            normalize_database_url("postgresql://u:p@db/app"),
            "postgres://u:p@db/app"
        );
        assert_eq!(
            normalize_database_url(" postgres://u@db/app "),
            "postgres://u@db/app"
        );
    }

    #[test]
    fn leaves_unknown_schemes_alone() {
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_database_url("mysql://db/app"), "mysql://db/app");
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut cfg = config();
        cfg.session_secret = "short".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_admin_password_is_rejected_in_production() {
        let mut cfg = config();
        cfg.env = AppEnvironment::Production;
        cfg.admin_password = DEFAULT_ADMIN_PASSWORD.into();

        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("ADMIN_PASSWORD"));
    }

    #[test]
    fn default_admin_password_is_tolerated_but_flagged_in_development() {
        let mut cfg = config();
        cfg.env = AppEnvironment::Development;
        cfg.admin_password = DEFAULT_ADMIN_PASSWORD.into();

        assert!(cfg.validate().is_ok());
        assert!(cfg.uses_default_admin_credentials());
        assert!(cfg.is_debug());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("Correct-Horse-Battery-9"));
        assert!(!rendered.contains("a-session-secret"));
    }
}
