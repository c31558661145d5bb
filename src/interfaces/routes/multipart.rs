use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;

use crate::{
    constants::GALLERY_PATH,
    entities::flash::FlashMessage,
    errors::AppError,
    handlers::flash::redirect_with_flash,
};

/// Caps the whole multipart body; anything larger is refused with `413`
/// before the handler runs. Any other unreadable form is treated like a
/// submission without a file and sent back to the gallery.
pub fn multipart_config(max_upload_bytes: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(max_upload_bytes)
        .error_handler(|err, req| {
            tracing::warn!(path = %req.path(), "Rejected multipart body: {}", err);
            match AppError::from(err) {
                too_large @ AppError::PayloadTooLarge(_) => too_large.into(),
                other => {
                    let response = redirect_with_flash(
                        req,
                        GALLERY_PATH,
                        vec![FlashMessage::error("No file selected")],
                    );
                    InternalError::from_response(other, response).into()
                }
            }
        })
}
