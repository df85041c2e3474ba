use std::time::Duration;

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::RapidError;

/// Outcome of a dispatched request.
///
/// The body is left unread. It is consumed by [`Response::json`],
/// [`Response::text`], [`Response::bytes`] or taken as a stream through
/// [`Response::into_inner`]; dropping the response releases the connection.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Wall time spent in the transport, up to the response headers.
    pub elapsed: Duration,
    /// Final URL the request was sent to, query string included.
    pub request_url: Url,
    body: reqwest::Response,
}

impl Response {
    pub(crate) fn new(body: reqwest::Response, elapsed: Duration, request_url: Url) -> Self {
        Self {
            status: body.status(),
            headers: body.headers().clone(),
            elapsed,
            request_url,
            body,
        }
    }

    pub async fn json<T: DeserializeOwned>(self) -> Result<T, RapidError> {
        self.body.json().await.map_err(RapidError::ReadBody)
    }

    pub async fn text(self) -> Result<String, RapidError> {
        self.body.text().await.map_err(RapidError::ReadBody)
    }

    pub async fn bytes(self) -> Result<Vec<u8>, RapidError> {
        self.body
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(RapidError::ReadBody)
    }

    /// Underlying transport response, for streaming the body chunk by chunk.
    pub fn into_inner(self) -> reqwest::Response {
        self.body
    }
}
