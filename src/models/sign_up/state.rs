use serde_json::Value;

use crate::auth::validate;
use crate::registrar::Registrar;
use super::server_errors::ServerFieldErrors;
use super::types::{ErrorState, FieldErrors, RegistrationInput, SignUpValues};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Where a submit attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Mismatch,
    Submitting,
    Success,
    ServerRejected,
    SilentFailure,
}

/// How a submit attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Confirmation differs from the password; nothing was sent.
    Mismatch,
    /// The rule table rejected at least one field; nothing was sent.
    Invalid,
    /// The endpoint accepted the registration.
    Success { redirect_to: String },
    /// The endpoint rejected the registration with field errors.
    ServerRejected,
    /// Transport or decode failure. Logged, nothing shown.
    SilentFailure,
}

/// State owned by one sign-up form: the confirmation value (not part of the
/// posted payload), the top-level error, and the client field errors.
#[derive(Debug, Clone)]
pub struct FormState {
    confirmation: String,
    error: ErrorState,
    field_errors: FieldErrors,
    phase: SubmitPhase,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(ErrorState::Empty)
    }
}

impl FormState {
    pub fn new(error: ErrorState) -> Self {
        Self {
            confirmation: String::new(),
            error,
            field_errors: FieldErrors::new(),
            phase: SubmitPhase::Idle,
        }
    }

    pub fn set_confirmation(&mut self, value: impl Into<String>) {
        self.confirmation = value.into();
    }

    pub fn confirmation(&self) -> &str {
        &self.confirmation
    }

    pub fn set_error(&mut self, error: ErrorState) {
        self.error = error;
    }

    pub fn error(&self) -> &ErrorState {
        &self.error
    }

    pub fn set_field_errors(&mut self, errors: FieldErrors) {
        self.field_errors = errors;
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    fn transition(&mut self, next: SubmitPhase) {
        log::debug!("sign-up submit: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Run one submit attempt against `registrar`.
    ///
    /// The confirmation check runs before the rule table, and a mismatch
    /// replaces everything else on display. Client validation failures leave
    /// the top-level error untouched. Transport and decode failures are only
    /// logged. Every path except success ends back in [`SubmitPhase::Idle`].
    pub async fn submit(
        &mut self,
        values: &SignUpValues,
        registrar: &dyn Registrar,
        sign_in_path: &str,
    ) -> SubmitOutcome {
        self.transition(SubmitPhase::Validating);

        if values.password != self.confirmation {
            self.set_field_errors(FieldErrors::new());
            self.set_error(ErrorState::Message(PASSWORD_MISMATCH.to_string()));
            self.transition(SubmitPhase::Mismatch);
            self.transition(SubmitPhase::Idle);
            return SubmitOutcome::Mismatch;
        }

        let errors = validate::validate(values);
        let invalid = !errors.is_empty();
        self.set_field_errors(errors);
        if invalid {
            self.transition(SubmitPhase::Idle);
            return SubmitOutcome::Invalid;
        }

        let input = RegistrationInput::from(values);
        self.transition(SubmitPhase::Submitting);
        log::debug!("Submitting registration for '{}' (consent: {})", input.username, input.consent);

        let rejection = match registrar
            .register(&input.username, &input.email, &input.password)
            .await
        {
            Ok(resp) if resp.ok() => {
                self.set_error(ErrorState::Empty);
                self.transition(SubmitPhase::Success);
                return SubmitOutcome::Success { redirect_to: sign_in_path.to_string() };
            }
            Ok(resp) => resp.json::<Value>().and_then(ServerFieldErrors::from_value),
            Err(e) => Err(e),
        };

        match rejection {
            Ok(fields) => {
                log::info!("Registration for '{}' rejected: {:?}", input.username, fields.lines());
                self.set_error(ErrorState::Fields(fields));
                self.transition(SubmitPhase::ServerRejected);
                self.transition(SubmitPhase::Idle);
                SubmitOutcome::ServerRejected
            }
            Err(e) => {
                log::error!("Sign-up submission failed: {e}");
                self.transition(SubmitPhase::SilentFailure);
                self.transition(SubmitPhase::Idle);
                SubmitOutcome::SilentFailure
            }
        }
    }
}
