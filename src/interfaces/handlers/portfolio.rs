use actix_multipart::form::MultipartForm;
use actix_web::{get, post, web, HttpRequest, Responder};
use tera::Context;
use tracing::instrument;

use crate::{
    constants::GALLERY_PATH,
    entities::{
        flash::FlashMessage,
        media::{MediaKind, MediaUploadForm},
    },
    handlers::{flash::redirect_with_flash, render_page},
    use_cases::extractors::{AdminSession, IsAdmin},
    AppState,
};

#[get("/portfolio")]
#[instrument(skip(req, state, admin))]
pub async fn portfolio(req: HttpRequest, state: web::Data<AppState>, admin: IsAdmin) -> impl Responder {
    let mut context = Context::new();
    let mut notices = Vec::new();

    match state.gallery.list().await {
        Ok(gallery) => {
            context.insert("videos", &gallery.videos);
            context.insert("images", &gallery.images);
        }
        Err(e) => {
            tracing::error!("Failed to load gallery: {}", e);
            context.insert("videos", &Vec::<()>::new());
            context.insert("images", &Vec::<()>::new());
            notices.push(FlashMessage::error("The gallery is temporarily unavailable."));
        }
    }

    render_page(&req, &state, "portfolio.html", admin, context, notices)
}

#[post("/upload")]
#[instrument(skip(req, _admin, state, form))]
pub async fn upload_video(
    req: HttpRequest,
    _admin: AdminSession,
    state: web::Data<AppState>,
    form: MultipartForm<MediaUploadForm>,
) -> impl Responder {
    upload(&req, &state, MediaKind::Video, form.into_inner()).await
}

#[post("/upload_image")]
#[instrument(skip(req, _admin, state, form))]
pub async fn upload_image(
    req: HttpRequest,
    _admin: AdminSession,
    state: web::Data<AppState>,
    form: MultipartForm<MediaUploadForm>,
) -> impl Responder {
    upload(&req, &state, MediaKind::Image, form.into_inner()).await
}

async fn upload(
    req: &HttpRequest,
    state: &AppState,
    kind: MediaKind,
    form: MediaUploadForm,
) -> actix_web::HttpResponse {
    // `form` owns the spooled temp file and must stay alive until the upload finishes.
    let gallery = &state.gallery;
    let message = match gallery.upload(kind, form.to_request()).await {
        Ok(_) => gallery.upload_success_message(kind),
        Err(e) => gallery.upload_failure_message(kind, &e),
    };
    drop(form);

    redirect_with_flash(req, GALLERY_PATH, vec![message])
}

#[post("/videos/{id}/delete")]
#[instrument(skip(req, _admin, state))]
pub async fn delete_video(
    req: HttpRequest,
    _admin: AdminSession,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    delete(&req, &state, MediaKind::Video, &id).await
}

#[post("/images/{id}/delete")]
#[instrument(skip(req, _admin, state))]
pub async fn delete_image(
    req: HttpRequest,
    _admin: AdminSession,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    delete(&req, &state, MediaKind::Image, &id).await
}

async fn delete(
    req: &HttpRequest,
    state: &AppState,
    kind: MediaKind,
    raw_id: &str,
) -> actix_web::HttpResponse {
    let outcome = state.gallery.delete(kind, raw_id).await;
    let messages = state.gallery.delete_messages(kind, &outcome);

    redirect_with_flash(req, GALLERY_PATH, messages)
}
