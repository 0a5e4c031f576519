use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::server_errors::{ServerFieldErrors, MAX_STORED_REASON_CHARS};

/// Fields of the sign-up form that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Email,
    Password,
    Consent,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::Consent => "checkbox",
        }
    }
}

/// Which rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
}

impl RuleKind {
    /// Required violations block submission but never get an inline message.
    pub fn is_rendered(self) -> bool {
        !matches!(self, RuleKind::Required)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: RuleKind,
    pub message: String,
}

/// Field name -> first failing rule. Replaced wholesale on every submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The inline message for `field`, if its failure kind is one that is shown.
    pub fn displayed(&self, field: Field) -> Option<&str> {
        self.get(field)
            .filter(|e| e.kind.is_rendered())
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldError)> {
        self.0.iter()
    }
}

/// Raw values posted by the sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUpValues {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    /// Browsers omit unchecked checkboxes entirely.
    #[serde(default, deserialize_with = "checkbox_value")]
    pub checkbox: bool,
    #[serde(default)]
    pub csrf_token: String,
}

fn checkbox_value<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(raw.as_deref(), Some(v) if !v.is_empty() && v != "off" && v != "false"))
}

/// Payload handed to the registration endpoint. Built fresh per submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub consent: bool,
}

impl From<&SignUpValues> for RegistrationInput {
    fn from(values: &SignUpValues) -> Self {
        Self {
            username: values.username.clone(),
            email: values.email.clone(),
            password: values.password.clone(),
            consent: values.checkbox,
        }
    }
}

/// Top-level error shown above the submit button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ErrorState {
    #[default]
    Empty,
    Message(String),
    Fields(ServerFieldErrors),
}

impl ErrorState {
    pub fn is_empty(&self) -> bool {
        matches!(self, ErrorState::Empty)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorState::Message(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// The copy written to the cookie session, with server reasons capped.
    pub fn for_session(&self) -> ErrorState {
        match self {
            ErrorState::Fields(fields) if !fields.is_bounded(MAX_STORED_REASON_CHARS) => {
                log::warn!("Truncating server rejection reasons before storing them in the session");
                ErrorState::Fields(fields.bounded(MAX_STORED_REASON_CHARS))
            }
            other => other.clone(),
        }
    }

    /// Lines rendered for a server rejection, e.g. `email taken`.
    pub fn field_lines(&self) -> Vec<String> {
        match self {
            ErrorState::Fields(fields) => fields.lines(),
            _ => Vec::new(),
        }
    }
}
