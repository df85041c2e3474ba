use http::StatusCode;
use thiserror::Error;

/// Failure while exchanging credentials at the `/token` endpoint.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The request could not be built or the transport failed.
    #[error("failed to generate token: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered, but not with `200 OK`.
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("failed to generate token: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RapidError {
    #[error("invalid configuration: {0} must be provided")]
    MissingConfig(&'static str),

    #[error("invalid configuration: failed to build HTTP client: {0}")]
    HttpClientBuild(#[source] reqwest::Error),

    #[error("error ensuring valid token: {0}")]
    Token(#[from] TokenError),

    #[error("error parsing base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("error marshaling request body: {0}")]
    SerializeBody(#[source] serde_json::Error),

    #[error("error sending request: {0}")]
    Send(#[source] reqwest::Error),

    #[error("error reading response body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

impl RapidError {
    /// Construction-time failure; retrying will not help.
    pub fn is_config_error(&self) -> bool {
        matches!(self, RapidError::MissingConfig(_) | RapidError::HttpClientBuild(_))
    }

    pub fn is_token_error(&self) -> bool {
        matches!(self, RapidError::Token(_))
    }

    /// Status returned by the token endpoint when it rejected the grant.
    pub fn token_status(&self) -> Option<StatusCode> {
        match self {
            RapidError::Token(TokenError::UnexpectedStatus(status)) => Some(*status),
            _ => None,
        }
    }
}
