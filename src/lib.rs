use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, media, templates};

use media::{cloudinary::CloudinaryClient, MediaHost};
use repositories::{media::MediaRepository, sqlx_repo::SqlxMediaRepo};
use settings::AppConfig;
use templates::Templates;
use use_cases::{auth::AdminAuthenticator, gallery::GalleryHandler};

pub struct AppState {
    pub gallery: GalleryHandler,
    pub auth: AdminAuthenticator,
    pub templates: Templates,
    pub site_name: String,
    pub debug: bool,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        media_repo: Arc<dyn MediaRepository>,
        media_host: Option<Arc<dyn MediaHost>>,
    ) -> anyhow::Result<Self> {
        let templates = Templates::load(&config.template_dir)?;
        let auth = AdminAuthenticator::new(config)?;
        let gallery = GalleryHandler::new(media_repo, media_host, config.is_debug());

        Ok(AppState {
            gallery,
            auth,
            templates,
            site_name: config.name.clone(),
            debug: config.is_debug(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Production wiring: Postgres-backed records and, when configured, Cloudinary.
    pub fn from_pool(config: &AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Self> {
        let media_repo: Arc<dyn MediaRepository> = Arc::new(SqlxMediaRepo::new(pool));

        let media_host = config.media_url.as_deref().and_then(|url| {
            CloudinaryClient::from_url(url)
                .map(|client| {
                    tracing::info!(cloud = %client.cloud_name(), "Media uploads enabled");
                    Arc::new(client) as Arc<dyn MediaHost>
                })
                .map_err(|e| tracing::error!("Media host disabled: {}", e))
                .ok()
        });
        if config.media_url.is_none() {
            tracing::warn!("No media URL configured; uploads are disabled");
        }

        Self::new(config, media_repo, media_host)
    }
}

/// Logs the configuration choices an operator should revisit before going live.
pub fn hardening_warnings(config: &AppConfig) -> Vec<String> {
    let warnings = collect_hardening_warnings(config, std::env::var_os("APP_ENV").is_some());

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    warnings
}

fn collect_hardening_warnings(config: &AppConfig, app_env_set: bool) -> Vec<String> {
    let mut warnings = Vec::new();

    if !app_env_set {
        warnings.push(format!(
            "APP_ENV is not set; defaulting to {} mode. Set APP_ENV=production for a public deployment",
            config.env
        ));
    }
    if config.uses_default_admin_credentials() {
        warnings.push("Admin credentials are the built-in defaults".to_string());
    }
    if let Some(weakness) = auth::password::admin_password_weakness(&config.admin_username, &config.admin_password) {
        warnings.push(weakness);
    }
    if !config.is_production() {
        warnings.push(format!("Running in {} mode; error details are shown to visitors", config.env));
    }

    warnings
}
