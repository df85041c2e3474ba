use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, StatusCode};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::body::JsonBody;
use crate::client::error::{RapidError, TokenError};
use crate::client::path::join_path;
use crate::client::response::Response;
use crate::config::client::ClientConfig;
use crate::observability::metrics::get_metrics;
use crate::token::{Grant, Token, TokenResponse};
use crate::utils::constants::{
    CONTENT_TYPE_JSON, CONTENT_TYPE_URL_ENCODED, TOKEN_ENDPOINT, X_AUTHORIZATION_HEADER,
};

/// Client for one RAPID backend, holding at most one bearer token.
///
/// Every operation that may touch the token takes `&mut self`. The client
/// does no locking of its own: to share it between tasks, wrap it in a mutex
/// and hold the guard for the whole call.
#[derive(Debug)]
pub struct RapidClient {
    base_url: String,
    key: String,
    secret: String,
    user_web_token: Option<String>,
    x_authorization: Option<String>,
    http: Client,
    token: Option<Token>,
}

impl RapidClient {
    /// Build a client with its own transport (timeout from `cfg`).
    pub fn new(cfg: &ClientConfig) -> Result<Self, RapidError> {
        validate(cfg)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()
            .map_err(RapidError::HttpClientBuild)?;
        Self::with_http_client(cfg, http)
    }

    /// Build a client over a caller-supplied transport.
    pub fn with_http_client(cfg: &ClientConfig, http: Client) -> Result<Self, RapidError> {
        validate(cfg)?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            key: cfg.key.clone(),
            secret: cfg.secret.clone(),
            user_web_token: cfg.user_web_token.clone().filter(|t| !t.is_empty()),
            x_authorization: cfg.x_authorization.clone().filter(|x| !x.is_empty()),
            http,
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Replace the held token, e.g. with one persisted by an earlier run.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub fn set_x_authorization(&mut self, x_authorization: Option<String>) {
        self.x_authorization = x_authorization.filter(|x| !x.is_empty());
    }

    /// Obtain a fresh token (JWT-bearer if an assertion is configured, else client credentials).
    pub async fn generate_token(&mut self) -> Result<(), TokenError> {
        self.exchange(false).await.map(|_| ())
    }

    /// Exchange the held refresh value for a new token; without one this is a fresh generation.
    pub async fn refresh_token(&mut self) -> Result<(), TokenError> {
        self.exchange(true).await.map(|_| ())
    }

    /// Run one credential exchange. The held token is only replaced on success.
    async fn exchange(&mut self, is_refresh: bool) -> Result<&Token, TokenError> {
        let metrics = get_metrics().await;
        let grant = Grant::select(is_refresh, self.token.as_ref(), self.user_web_token.as_deref());
        let grant_name = grant.name();
        let token_url = format!("{}{}", self.base_url, TOKEN_ENDPOINT);
        debug!(grant = grant_name, url = %token_url, "requesting token");
        metrics.token_requests.with_label_values(&[grant_name]).inc();

        let fail = |reason: &str| metrics.token_failures.with_label_values(&[grant_name, reason]).inc();

        let credentials = STANDARD.encode(format!("{}:{}", self.key, self.secret));
        let response = self
            .http
            .post(&token_url)
            .header(CONTENT_TYPE, CONTENT_TYPE_URL_ENCODED)
            .header(AUTHORIZATION, format!("Basic {}", credentials))
            .form(&grant.form())
            .send()
            .await
            .map_err(|e| {
                fail("transport");
                warn!(grant = grant_name, error = %e, "token request failed");
                TokenError::Request(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            fail("status");
            warn!(grant = grant_name, %status, "token endpoint rejected request");
            return Err(TokenError::UnexpectedStatus(status));
        }

        let body = response.bytes().await.map_err(|e| {
            fail("transport");
            TokenError::Request(e)
        })?;
        let parsed: TokenResponse = serde_json::from_slice(&body).map_err(|e| {
            fail("decode");
            warn!(grant = grant_name, error = %e, "token response is not valid JSON");
            TokenError::Decode(e)
        })?;

        // expiry counts from now, after the round trip
        let token = Token::from(parsed);
        metrics.token_expiry_unix.set(token.expires_at().timestamp());
        info!(grant = grant_name, expires_at = %token.expires_at(), "token acquired");
        Ok(&*self.token.insert(token))
    }

    /// Authorization header value for a usable token, generating one if none
    /// is held or the held one has expired.
    ///
    /// Expiry always triggers fresh generation; the refresh grant is only used
    /// through an explicit [`RapidClient::refresh_token`] call.
    async fn ensure_valid_token(&mut self) -> Result<String, TokenError> {
        if let Some(token) = self.token.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.authorization_header());
        }
        let token = self.exchange(false).await?;
        Ok(token.authorization_header())
    }

    /// Perform an authenticated request against the base URL.
    ///
    /// `path` is clean-joined onto the base URL path; a non-empty `params`
    /// replaces the query string.
    pub async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&(dyn JsonBody + Sync)>,
        params: &[(&str, &str)],
    ) -> Result<Response, RapidError> {
        let metrics = get_metrics().await;
        let method_label = method.as_str().to_owned();
        let fail = |reason: &str| metrics.request_failures.with_label_values(&[method_label.as_str(), reason]).inc();

        let authorization = match self.ensure_valid_token().await {
            Ok(authorization) => authorization,
            Err(e) => {
                fail("token");
                return Err(e.into());
            }
        };

        let url = self.resolve_url(path, params).inspect_err(|_| fail("url"))?;

        let payload = body
            .map(|b| b.to_json())
            .transpose()
            .map_err(|e| {
                fail("body");
                RapidError::SerializeBody(e)
            })?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, CONTENT_TYPE_JSON);
        if let Some(x_authorization) = &self.x_authorization {
            request = request.header(X_AUTHORIZATION_HEADER, x_authorization);
        }
        request = request.header(AUTHORIZATION, authorization);
        if let Some(payload) = payload {
            // buffered body: re-readable by the transport, nothing to close
            request = request.header(CONTENT_TYPE, CONTENT_TYPE_JSON).body(payload);
        }

        debug!(%method, url = %url, "sending request");
        let start = Instant::now();
        let result = request.send().await;
        let elapsed = start.elapsed();
        metrics
            .request_duration
            .with_label_values(&[method_label.as_str()])
            .observe(elapsed.as_secs_f64());

        let response = result.map_err(|e| {
            fail("transport");
            warn!(%method, url = %url, error = %e, "request failed");
            RapidError::Send(e)
        })?;

        let status = response.status();
        metrics
            .requests
            .with_label_values(&[method_label.as_str(), status.as_str()])
            .inc();
        debug!(%method, url = %url, %status, elapsed_ms = elapsed.as_millis() as u64, "response received");

        Ok(Response::new(response, elapsed, url))
    }

    fn resolve_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, RapidError> {
        let mut url = Url::parse(&self.base_url)?;
        let joined = join_path(url.path(), path);
        url.set_path(&joined);
        if !params.is_empty() {
            url.set_query(None);
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub async fn get(&mut self, path: &str, params: &[(&str, &str)]) -> Result<Response, RapidError> {
        self.request(Method::GET, path, None, params).await
    }

    pub async fn post<B: JsonBody + Sync>(&mut self, path: &str, body: &B) -> Result<Response, RapidError> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn put<B: JsonBody + Sync>(&mut self, path: &str, body: &B) -> Result<Response, RapidError> {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn delete(&mut self, path: &str) -> Result<Response, RapidError> {
        self.request(Method::DELETE, path, None, &[]).await
    }
}

fn validate(cfg: &ClientConfig) -> Result<(), RapidError> {
    if cfg.base_url.trim().is_empty() {
        return Err(RapidError::MissingConfig("base URL"));
    }
    if cfg.key.is_empty() {
        return Err(RapidError::MissingConfig("key"));
    }
    if cfg.secret.is_empty() {
        return Err(RapidError::MissingConfig("secret"));
    }
    Ok(())
}
