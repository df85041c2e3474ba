use serde::Deserialize;
use std::env;

use crate::config::settings::LoggingConfig;
use crate::utils::constants::{
    DEFAULT_TIMEOUT_SECONDS, ENV_BASE_URL, ENV_KEY, ENV_SECRET, ENV_USER_WEB_TOKEN,
};

/// ================================
/// Client configuration
/// ================================
///
/// Required values default to empty so that a missing key surfaces as a
/// configuration error from `RapidClient::new`, not as a parse error.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
    /// pre-issued user assertion, switches generation to the JWT-bearer grant
    #[serde(default)]
    pub user_web_token: Option<String>,
    /// sent as `X-Authorization` on every dispatched request
    #[serde(default)]
    pub x_authorization: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            key: key.into(),
            secret: secret.into(),
            user_web_token: None,
            x_authorization: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            logging: None,
        }
    }

    pub fn with_user_web_token(mut self, user_web_token: impl Into<String>) -> Self {
        self.user_web_token = Some(user_web_token.into());
        self
    }

    pub fn with_x_authorization(mut self, x_authorization: impl Into<String>) -> Self {
        self.x_authorization = Some(x_authorization.into());
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Read `RAPID_BASE_URL`, `RAPID_KEY`, `RAPID_SECRET` and the optional
    /// `RAPID_USER_WEB_TOKEN`. Unset variables are left empty; validation
    /// happens when the client is built.
    pub fn from_env() -> Self {
        let mut cfg = Self::new(
            env::var(ENV_BASE_URL).unwrap_or_default(),
            env::var(ENV_KEY).unwrap_or_default(),
            env::var(ENV_SECRET).unwrap_or_default(),
        );
        cfg.user_web_token = env::var(ENV_USER_WEB_TOKEN).ok().filter(|v| !v.is_empty());
        cfg
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}
