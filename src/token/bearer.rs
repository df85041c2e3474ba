use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

/// Bearer credential issued by the `/token` endpoint.
///
/// The expiry is derived once, at construction, from the lifetime the server
/// reported. A token is never mutated afterwards: every generate or refresh
/// replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Token {
    value: String,
    token_type: String,
    expires_in: i64,
    refresh_token: Option<String>,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(value: String, expires_in: i64, token_type: String, refresh_token: Option<String>) -> Self {
        Self {
            value,
            token_type,
            expires_in,
            // empty refresh value means the server did not issue one
            refresh_token: refresh_token.filter(|r| !r.is_empty()),
            expires_at: expiry_from_now(expires_in),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Lifetime in seconds as reported by the authorization server.
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// `true` while the current time is strictly before the expiry.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Value for the `Authorization` header, e.g. `Bearer abc`.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

/// `now + expires_in`, saturating at the latest representable instant.
fn expiry_from_now(expires_in: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Wire shape of a successful `/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<TokenResponse> for Token {
    fn from(response: TokenResponse) -> Self {
        Token::new(
            response.access_token,
            response.expires_in,
            response.token_type,
            response.refresh_token,
        )
    }
}
