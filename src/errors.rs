use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::handlers::SIGN_UP_PATH;
use crate::templates_structs::NotFoundTemplate;

#[derive(Debug)]
pub enum AppError {
    Template(askama::Error),
    Session(String),
    Csrf,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => {
                let page = NotFoundTemplate { sign_up_path: SIGN_UP_PATH.to_string() }.render();
                match page {
                    Ok(html) => HttpResponse::NotFound()
                        .content_type("text/html; charset=utf-8")
                        .body(html),
                    Err(e) => {
                        log::error!("Template error: {e}");
                        HttpResponse::NotFound().body("Not Found")
                    }
                }
            }
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<actix_session::SessionInsertError> for AppError {
    fn from(e: actix_session::SessionInsertError) -> Self {
        AppError::Session(e.to_string())
    }
}

/// Render an askama template into an HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Failures talking to the registration endpoint. These never reach the user;
/// the submit handler only logs them.
#[derive(Debug)]
pub enum RegistrationError {
    Transport(reqwest::Error),
    Decode(serde_json::Error),
    MalformedBody(String),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Transport(e) => write!(f, "Registration request failed: {e}"),
            RegistrationError::Decode(e) => write!(f, "Registration response is not valid JSON: {e}"),
            RegistrationError::MalformedBody(e) => write!(f, "Malformed registration error body: {e}"),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Transport(e) => Some(e),
            RegistrationError::Decode(e) => Some(e),
            RegistrationError::MalformedBody(_) => None,
        }
    }
}

impl From<reqwest::Error> for RegistrationError {
    fn from(e: reqwest::Error) -> Self {
        RegistrationError::Transport(e)
    }
}

impl From<serde_json::Error> for RegistrationError {
    fn from(e: serde_json::Error) -> Self {
        RegistrationError::Decode(e)
    }
}
