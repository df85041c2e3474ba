//! # RAPID API client
//!
//! Manages the OAuth2 bearer token for a single RAPID backend and wraps
//! outbound HTTP calls with the right authentication headers.
//!
//! Modules:
//! - `token` — bearer token value object and grant selection
//! - `client` — credential exchange and authenticated request dispatch
//! - `config` — client configuration (YAML file or environment)
//! - `observability` — Prometheus metrics for token exchange and dispatch
//! - `utils` — logging setup and shared constants
//!
//! A client is single-writer: token-touching calls take `&mut self` and no
//! internal locking is done.

pub mod client;
pub mod config;
pub mod observability;
pub mod token;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::client::{join_path, Json, JsonBody, RapidClient, RapidError, Response, TokenError};
pub use crate::config::client::ClientConfig;
pub use crate::token::Token;
