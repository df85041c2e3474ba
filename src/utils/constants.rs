//! Shared constants and invariants

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

pub const TOKEN_ENDPOINT: &str = "/token";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_URL_ENCODED: &str = "application/x-www-form-urlencoded";
pub const X_AUTHORIZATION_HEADER: &str = "X-Authorization";

// Environment variables read by `ClientConfig::from_env`
pub const ENV_BASE_URL: &str = "RAPID_BASE_URL";
pub const ENV_KEY: &str = "RAPID_KEY";
pub const ENV_SECRET: &str = "RAPID_SECRET";
pub const ENV_USER_WEB_TOKEN: &str = "RAPID_USER_WEB_TOKEN";
