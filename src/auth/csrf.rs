use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const SESSION_KEY: &str = "csrf_token";

/// Get the CSRF token from the session, or generate a new one.
pub fn get_or_create_token(session: &Session) -> Result<String, AppError> {
    if let Ok(Some(token)) = session.get::<String>(SESSION_KEY) {
        return Ok(token);
    }
    let token = generate_token();
    session.insert(SESSION_KEY, &token)?;
    Ok(token)
}

/// Validate the submitted CSRF token against the session token.
pub fn validate_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    let stored = match session.get::<String>(SESSION_KEY) {
        Ok(token) => token.unwrap_or_default(),
        Err(e) => {
            log::warn!("Could not read CSRF token from session: {e}");
            String::new()
        }
    };
    if stored.is_empty() || !constant_time_eq(&stored, submitted) {
        log::warn!("Rejected sign-up post with invalid CSRF token");
        return Err(AppError::Csrf);
    }
    Ok(())
}

/// Generate a random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_hex_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    fn session_with(token_json: &str) -> Session {
        use actix_session::SessionExt;
        let req = actix_web::test::TestRequest::default().to_srv_request();
        let session = req.get_session();
        let value: serde_json::Value = serde_json::from_str(token_json).expect("valid JSON");
        session.insert(SESSION_KEY, value).expect("serializable value");
        session
    }

    #[test]
    fn matching_token_passes() {
        let session = session_with(r#""abc123""#);
        assert!(validate_csrf(&session, "abc123").is_ok());
        assert!(matches!(validate_csrf(&session, "abc124"), Err(AppError::Csrf)));
    }

    #[test]
    fn unreadable_session_token_is_rejected() {
        // stored value is not a JSON string
        let session = session_with("42");
        assert!(session.get::<String>(SESSION_KEY).is_err());
        assert!(matches!(validate_csrf(&session, "42"), Err(AppError::Csrf)));
    }

    #[test]
    fn constant_time_eq_compares_content() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}
