//! [`Transport`] over a blocking `reqwest` client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use super::{HttpRequest, RawResponse, Transport};
use crate::error::Error;

/// Production transport. Holds a [`reqwest::blocking::Client`], which pools
/// connections internally; share one instance across calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// A transport with reqwest's default timeout.
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap a pre-configured client (proxies, custom timeouts, …).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, Error> {
        debug!(method = %request.method, url = %request.url, "cyrest request");

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| classify(&request.url, e))?;
        let status = response.status().as_u16();
        // A connection dropped while the body streams in is still a
        // connection failure.
        let body = response
            .text()
            .map_err(|e| classify(&request.url, e))?;

        debug!(status, url = %request.url, bytes = body.len(), "cyrest response");
        Ok(RawResponse { status, body })
    }
}

fn classify(url: &str, e: reqwest::Error) -> Error {
    if e.is_builder() {
        Error::Configuration(format!("cannot build request for {url}: {e}"))
    } else {
        Error::Connection {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}
