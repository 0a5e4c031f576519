use actix_web::{web, HttpResponse};

use crate::errors::AppError;

pub mod sign_up_handlers;

pub const SIGN_UP_PATH: &str = "/sign-up";

/// Register every route of the app. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(SIGN_UP_PATH, web::get().to(sign_up_handlers::page))
        .route(SIGN_UP_PATH, web::post().to(sign_up_handlers::submit))
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", SIGN_UP_PATH))
                .finish()
        }))
        // Default 404 handler (must be registered last)
        .default_service(web::to(not_found));
}

pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}
