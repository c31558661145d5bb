use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login_page)
        .service(auth::login)
        .service(auth::logout);
}
