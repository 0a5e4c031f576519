//! Shared test infrastructure for the sign-up integration tests.
//!
//! - `RecordingRegistrar` stands in for the registration endpoint and records
//!   every call it receives.
//! - `sign_up_app!` builds the full app (session middleware, config, routes)
//!   around a registrar.
//! - `open_form()` / `post_form()` walk the GET-then-POST flow with the session
//!   cookie and CSRF token a browser would carry.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::test::{self, TestRequest};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Mutex;

use signup::errors::RegistrationError;
use signup::registrar::{Registrar, RegistrationResponse};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const USERNAME: &str = "alex";
pub const EMAIL: &str = "alex@example.com";
pub const PASSWORD: &str = "secret1";
pub const SESSION_COOKIE: &str = "id";

// ============================================================================
// REGISTRATION ENDPOINT DOUBLE
// ============================================================================

pub enum Reply {
    Accept,
    Reject(String),
    Fail,
}

pub struct RecordingRegistrar {
    reply: Reply,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl RecordingRegistrar {
    pub fn new(reply: Reply) -> Self {
        Self { reply, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Registrar for RecordingRegistrar {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegistrationResponse, RegistrationError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((username.to_string(), email.to_string(), password.to_string()));
        match &self.reply {
            Reply::Accept => Ok(RegistrationResponse::new(201, "{}")),
            Reply::Reject(body) => Ok(RegistrationResponse::new(400, body.clone())),
            Reply::Fail => {
                let err = serde_json::from_str::<serde_json::Value>("")
                    .expect_err("empty input is not JSON");
                Err(RegistrationError::from(err))
            }
        }
    }
}

// ============================================================================
// APP SETUP
// ============================================================================

pub fn session_key() -> Key {
    Key::from(&[7u8; 64][..])
}

/// Build the app around `$registrar` (an `Arc<RecordingRegistrar>`).
macro_rules! sign_up_app {
    ($registrar:expr) => {{
        let registrar: std::sync::Arc<dyn signup::registrar::Registrar> = $registrar.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(
                    actix_session::SessionMiddleware::builder(
                        actix_session::storage::CookieSessionStore::default(),
                        common::session_key(),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .app_data(actix_web::web::Data::new(signup::config::AppConfig::default()))
                .app_data(actix_web::web::Data::from(registrar))
                .configure(signup::handlers::configure),
        )
        .await
    }};
}

// ============================================================================
// REQUEST / RESPONSE HELPERS
// ============================================================================

pub fn get_form() -> TestRequest {
    TestRequest::get().uri("/sign-up")
}

/// A POST of the sign-up form. `checkbox: false` leaves the consent box out,
/// the way a browser does for an unchecked box.
pub fn post_form(
    cookie: &Cookie<'static>,
    token: &str,
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
    checkbox: bool,
) -> TestRequest {
    let mut fields = vec![
        ("csrf_token", token.to_string()),
        ("username", username.to_string()),
        ("email", email.to_string()),
        ("password", password.to_string()),
        ("confirm_password", confirm_password.to_string()),
    ];
    if checkbox {
        fields.push(("checkbox", "on".to_string()));
    }
    TestRequest::post()
        .uri("/sign-up")
        .cookie(cookie.clone())
        .set_form(fields)
}

/// A POST with every field valid and the confirmation matching.
pub fn post_valid(cookie: &Cookie<'static>, token: &str) -> TestRequest {
    post_form(cookie, token, USERNAME, EMAIL, PASSWORD, PASSWORD, true)
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

pub fn csrf_token(body: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("valid regex");
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page carries a CSRF token")
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Split a GET /sign-up response into its session cookie and CSRF token.
pub async fn open_form<B: MessageBody>(resp: ServiceResponse<B>) -> (Cookie<'static>, String) {
    let cookie = session_cookie(&resp).expect("GET /sign-up sets a session cookie");
    let body = body_text(resp).await;
    (cookie, csrf_token(&body))
}
