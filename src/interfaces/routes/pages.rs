use actix_web::web;

use crate::handlers::{pages, system};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::home)
        .service(pages::about)
        .service(pages::contact)
        .service(system::health_check);
}
