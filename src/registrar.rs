//! Client for the external registration endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::errors::RegistrationError;

/// Status and raw body of a registration response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResponse {
    pub status: u16,
    pub body: String,
}

impl RegistrationResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Any 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RegistrationError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// The registration collaborator. Implemented over HTTP in production and by
/// recording fakes in tests.
#[async_trait]
pub trait Registrar: Send + Sync {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegistrationResponse, RegistrationError>;
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// POSTs `{username, email, password}` as JSON to the configured endpoint.
pub struct HttpRegistrar {
    client: reqwest::Client,
    url: String,
}

impl HttpRegistrar {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RegistrationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Registrar for HttpRegistrar {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegistrationResponse, RegistrationError> {
        let req = RegisterRequest { username, email, password };
        let resp = self.client.post(&self.url).json(&req).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        log::debug!("Registration endpoint answered {status}");
        Ok(RegistrationResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn ok_covers_2xx_only() {
        assert!(RegistrationResponse::new(200, "").ok());
        assert!(RegistrationResponse::new(201, "").ok());
        assert!(!RegistrationResponse::new(302, "").ok());
        assert!(!RegistrationResponse::new(400, "").ok());
        assert!(!RegistrationResponse::new(500, "").ok());
    }

    #[test]
    fn json_reads_body() {
        let resp = RegistrationResponse::new(400, r#"{"errors":{}}"#);
        let v: Value = resp.json().unwrap();
        assert!(v["errors"].is_object());
        assert!(RegistrationResponse::new(400, "oops").json::<Value>().is_err());
    }

    #[test]
    fn request_body_has_exactly_three_fields() {
        let req = RegisterRequest { username: "alex", email: "alex@example.com", password: "secret1" };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, serde_json::json!({
            "username": "alex",
            "email": "alex@example.com",
            "password": "secret1",
        }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let registrar = HttpRegistrar::new("http://127.0.0.1:9/register", Duration::from_millis(500)).unwrap();
        let err = registrar.register("alex", "alex@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, RegistrationError::Transport(_)));
    }
}
