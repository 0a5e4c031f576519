use askama::Template;

use crate::models::sign_up::{Field, FormState, SignUpValues};

/// The "Create new account" page. Built from the form state after each request;
/// the template itself holds no logic beyond `if`/`for`.
#[derive(Template)]
#[template(path = "sign_up.html")]
pub struct SignUpTemplate {
    pub csrf_token: String,
    pub sign_in_path: String,
    pub username: String,
    pub email: String,
    pub consent: bool,
    pub username_error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub error_message: Option<String>,
    pub server_errors: Vec<String>,
}

impl SignUpTemplate {
    /// `values` is `None` on the first GET, when nothing has been posted yet.
    pub fn from_state(
        values: Option<&SignUpValues>,
        state: &FormState,
        csrf_token: String,
        sign_in_path: &str,
    ) -> Self {
        let field_errors = state.field_errors();
        let shown = |field: Field| field_errors.displayed(field).map(str::to_string);
        Self {
            csrf_token,
            sign_in_path: sign_in_path.to_string(),
            username: values.map(|v| v.username.clone()).unwrap_or_default(),
            email: values.map(|v| v.email.clone()).unwrap_or_default(),
            consent: values.is_some_and(|v| v.checkbox),
            username_error: shown(Field::Username),
            email_error: shown(Field::Email),
            password_error: shown(Field::Password),
            error_message: state.error().message().map(str::to_string),
            server_errors: state.error().field_lines(),
        }
    }
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub sign_up_path: String,
}
