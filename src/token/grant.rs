use super::bearer::Token;

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const REFRESH_TOKEN_GRANT: &str = "refresh_token";
pub const CLIENT_CREDENTIALS_SCOPE: &str = "am_application_scope,default";

/// Credential exchange sent to the `/token` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant<'a> {
    ClientCredentials,
    JwtBearer { assertion: &'a str },
    Refresh { refresh_token: &'a str },
}

impl<'a> Grant<'a> {
    /// Pick the grant for a generate (`is_refresh == false`) or refresh call.
    ///
    /// Refresh is only used when the held token carries a refresh value;
    /// otherwise a refresh request degrades to fresh generation. For fresh
    /// generation the JWT-bearer assertion wins over client credentials when
    /// one is configured.
    pub fn select(is_refresh: bool, held: Option<&'a Token>, user_web_token: Option<&'a str>) -> Self {
        if is_refresh {
            if let Some(refresh_token) = held.and_then(Token::refresh_token) {
                return Grant::Refresh { refresh_token };
            }
        }
        match user_web_token.filter(|t| !t.is_empty()) {
            Some(assertion) => Grant::JwtBearer { assertion },
            None => Grant::ClientCredentials,
        }
    }

    /// Short label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Grant::ClientCredentials => "client_credentials",
            Grant::JwtBearer { .. } => "jwt_bearer",
            Grant::Refresh { .. } => "refresh_token",
        }
    }

    /// Form fields, in wire order.
    pub fn form(&self) -> Vec<(&'static str, &'a str)> {
        match *self {
            Grant::ClientCredentials => vec![
                ("grant_type", CLIENT_CREDENTIALS_GRANT),
                ("scope", CLIENT_CREDENTIALS_SCOPE),
            ],
            Grant::JwtBearer { assertion } => vec![
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion),
            ],
            Grant::Refresh { refresh_token } => vec![
                ("grant_type", REFRESH_TOKEN_GRANT),
                ("refresh_token", refresh_token),
            ],
        }
    }
}
