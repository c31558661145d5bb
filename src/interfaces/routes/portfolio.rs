use actix_web::web;

use crate::handlers::portfolio;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(portfolio::portfolio)
        .service(portfolio::upload_video)
        .service(portfolio::upload_image)
        .service(portfolio::delete_video)
        .service(portfolio::delete_image);
}
