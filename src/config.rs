use actix_web::cookie::Key;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REGISTRATION_URL: &str = "http://127.0.0.1:3000/api/register";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub registration_url: String,
    pub registration_timeout: Duration,
    pub sign_in_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            registration_url: DEFAULT_REGISTRATION_URL.to_string(),
            registration_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }
}

impl AppConfig {
    /// Read settings from the environment. Call [`load_dotenv`] first.
    pub fn from_env() -> Self {
        let timeout_secs = match std::env::var("REGISTRATION_TIMEOUT_SECS") {
            Ok(val) => val.parse::<u64>().unwrap_or_else(|_| {
                log::warn!("REGISTRATION_TIMEOUT_SECS '{val}' is not a number, using {DEFAULT_TIMEOUT_SECS}s");
                DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            registration_url: env_or("REGISTRATION_URL", DEFAULT_REGISTRATION_URL),
            registration_timeout: Duration::from_secs(timeout_secs),
            sign_in_path: env_or("SIGN_IN_PATH", DEFAULT_SIGN_IN_PATH),
        }
    }
}

/// Load `.env` into the process environment, if one exists.
pub fn load_dotenv() -> Result<std::path::PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Session encryption key. Loaded from SESSION_KEY so sessions survive restarts.
pub fn session_key() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_endpoint_and_sign_in() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.sign_in_path, "/sign-in");
        assert_eq!(cfg.registration_timeout, Duration::from_secs(10));
        assert!(cfg.registration_url.starts_with("http://"));
    }
}
