//! Field errors returned by the registration endpoint on a rejected sign-up.
//!
//! Wire shape: `{"errors": {"email": "<json text>", "username": "<json text>"}}`.
//! The outer body is JSON and each field value is itself JSON-encoded text,
//! so every reason is decoded twice before display.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RegistrationError;

/// Longest reason, in chars, kept when the errors are persisted to the cookie
/// session. Two reasons at this length stay well under the 4 KB cookie limit
/// even when every char serializes as a `\uXXXX` escape.
pub const MAX_STORED_REASON_CHARS: usize = 160;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerFieldErrors {
    pub email: Option<Value>,
    pub username: Option<Value>,
}

impl ServerFieldErrors {
    /// Decode a rejection body. A body without an `errors` object is an error.
    pub fn from_body(body: &str) -> Result<Self, RegistrationError> {
        Self::from_value(serde_json::from_str(body)?)
    }

    /// Same as [`ServerFieldErrors::from_body`], for an already parsed body.
    pub fn from_value(body: Value) -> Result<Self, RegistrationError> {
        let errors = body
            .get("errors")
            .and_then(Value::as_object)
            .ok_or_else(|| RegistrationError::MalformedBody("missing \"errors\" object".to_string()))?;

        Ok(Self {
            email: errors.get("email").cloned().and_then(decode_reason),
            username: errors.get("username").cloned().and_then(decode_reason),
        })
    }

    /// Display lines in form order. Falsy reasons are suppressed.
    pub fn lines(&self) -> Vec<String> {
        [("email", &self.email), ("username", &self.username)]
            .into_iter()
            .filter_map(|(name, reason)| {
                reason
                    .as_ref()
                    .filter(|v| is_truthy(v))
                    .map(|v| format!("{name} {}", display(v)))
            })
            .collect()
    }

    /// Copy with every reason cut to at most `max_chars` chars of display text.
    /// Non-string reasons that are too long are kept as their truncated JSON text.
    pub fn bounded(&self, max_chars: usize) -> Self {
        Self {
            email: self.email.as_ref().map(|v| bound_reason(v, max_chars)),
            username: self.username.as_ref().map(|v| bound_reason(v, max_chars)),
        }
    }

    pub fn is_bounded(&self, max_chars: usize) -> bool {
        [&self.email, &self.username]
            .into_iter()
            .flatten()
            .all(|v| display(v).chars().count() <= max_chars)
    }
}

fn bound_reason(value: &Value, max_chars: usize) -> Value {
    let text = display(value);
    if text.chars().count() <= max_chars {
        return value.clone();
    }
    Value::String(text.chars().take(max_chars).collect())
}

/// Second decoding pass. Strings that are not JSON text are kept verbatim.
fn decode_reason(raw: Value) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) => Some(serde_json::from_str(&text).unwrap_or(Value::String(text))),
        other => Some(other),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
