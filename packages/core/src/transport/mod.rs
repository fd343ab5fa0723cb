//! The request dispatcher seam.
//!
//! [`Transport`] performs one blocking HTTP exchange and hands back the raw
//! status and body. It does not interpret the body; non-2xx replies are
//! returned as values so the normalizer can read the error detail the
//! remote process puts there. Only failure to talk to the remote process at
//! all becomes [`Error::Connection`](crate::Error::Connection).
//!
//! Nothing is retried. A request that failed mid-flight may still have
//! taken effect remotely.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`HttpTransport`] | Talking to a real Cytoscape process |
//! | [`MockTransport`] | Unit tests of code built on [`Client`](crate::Client) |
//!
//! [`HttpTransport`]: http::HttpTransport
//! [`MockTransport`]: mock::MockTransport

pub mod http;
pub mod mock;

pub use reqwest::Method;
use serde_json::Value;

use crate::error::Error;

/// One outgoing exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The remote reply before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP exchanges with the remote process.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, Error>;
}
