use actix_web::web;

mod auth;
mod multipart;
mod pages;
mod portfolio;

pub use multipart::multipart_config;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(pages::config_routes)
        .configure(portfolio::config_routes)
        .configure(auth::config_routes);
}
