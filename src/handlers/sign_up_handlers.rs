use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::csrf;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::sign_up::{ErrorState, FormState, SignUpValues, SubmitOutcome};
use crate::registrar::Registrar;
use crate::templates_structs::SignUpTemplate;

/// Session key holding the error shown above the submit button between requests.
const ERROR_STATE_KEY: &str = "sign_up_error";

fn load_error_state(session: &Session) -> ErrorState {
    match session.get::<ErrorState>(ERROR_STATE_KEY) {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            log::warn!("Discarding unreadable sign-up error state: {e}");
            ErrorState::Empty
        }
    }
}

fn store_error_state(session: &Session, error: &ErrorState) -> Result<(), AppError> {
    if error.is_empty() {
        session.remove(ERROR_STATE_KEY);
    } else {
        session.insert(ERROR_STATE_KEY, error.for_session())?;
    }
    Ok(())
}

pub async fn page(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let state = FormState::new(load_error_state(&session));
    let csrf_token = csrf::get_or_create_token(&session)?;
    render(SignUpTemplate::from_state(None, &state, csrf_token, &config.sign_in_path))
}

pub async fn submit(
    config: web::Data<AppConfig>,
    registrar: web::Data<dyn Registrar>,
    session: Session,
    form: web::Form<SignUpValues>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let values = form.into_inner();

    let mut state = FormState::new(load_error_state(&session));
    state.set_confirmation(values.confirm_password.clone());

    let outcome = state
        .submit(&values, registrar.get_ref(), &config.sign_in_path)
        .await;
    store_error_state(&session, state.error())?;

    match outcome {
        SubmitOutcome::Success { redirect_to } => Ok(HttpResponse::SeeOther()
            .insert_header(("Location", redirect_to))
            .finish()),
        _ => {
            let csrf_token = csrf::get_or_create_token(&session)?;
            render(SignUpTemplate::from_state(Some(&values), &state, csrf_token, &config.sign_in_path))
        }
    }
}
