//! The dispatch pipeline every domain caller goes through.
//!
//! [`Client`] is the context object an application owns. It binds a base
//! address, a [`Transport`], and a [`VersionCache`]. Clones and
//! [`Client::at`] rebinds share the transport and the cache, so the
//! version record for an address is fetched once per application rather
//! than once per caller.
//!
//! ```text
//! domain caller ─► ensure_supported ─► BaseUrl::resolve ─► Transport::send ─► normalize
//!                   (cached per base)                                         │
//!                                                         Value / Error ◄─────┘
//! ```

use std::fmt;
use std::sync::Arc;

use cyrest_wire::VersionInfo;
use serde_json::Value;
use tracing::info;
use urlencoding::encode;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::endpoint::{BaseUrl, Gateway};
use crate::error::Error;
use crate::normalize::{decode, normalize};
use crate::transport::http::HttpTransport;
use crate::transport::{HttpRequest, Method, Transport};
use crate::version::{VersionCache, VersionRecord, VersionRequirement};

// ---------------------------------------------------------------------------
// RestRequest
// ---------------------------------------------------------------------------

/// A raw request for the REST gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).body(body)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path plus percent-encoded query string.
    fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Handle on one Cytoscape process.
#[derive(Clone)]
pub struct Client {
    base: BaseUrl,
    transport: Arc<dyn Transport>,
    versions: Arc<VersionCache>,
}

impl Client {
    /// A client for `base` over a fresh [`HttpTransport`].
    pub fn new(base: BaseUrl) -> Result<Self, Error> {
        Ok(Self::with_transport(base, Arc::new(HttpTransport::new()?)))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let transport = HttpTransport::with_timeout(config.timeout)?;
        Ok(Self::with_transport(config.base_url.clone(), Arc::new(transport)))
    }

    /// See [`ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    pub fn with_transport<T: Transport + 'static>(base: BaseUrl, transport: Arc<T>) -> Self {
        Self {
            base,
            transport,
            versions: Arc::new(VersionCache::new()),
        }
    }

    /// The same client aimed at another Cytoscape process. Transport and
    /// version cache are shared.
    pub fn at(&self, base: BaseUrl) -> Self {
        Self {
            base,
            transport: Arc::clone(&self.transport),
            versions: Arc::clone(&self.versions),
        }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    // --- version gate --------------------------------------------------------

    /// The version record for this base address, fetched on first use.
    pub fn version(&self) -> Result<VersionRecord, Error> {
        if let Some(record) = self.versions.get(self.base.as_str()) {
            return Ok(record);
        }

        let value = self.dispatch(Method::GET, self.base.version_url(), None)?;
        let info: VersionInfo = decode(value)?;
        let record = VersionRecord::from_info(&info)?;
        info!(base_url = %self.base, %record, "cyrest: fetched version");
        self.versions.insert(self.base.as_str(), record.clone());
        Ok(record)
    }

    /// Fail with [`Error::UnsupportedVersion`] unless the remote process is
    /// at least CyREST API `min_api_major` and Cytoscape `min_app_version`.
    ///
    /// Call this before sending anything with side effects.
    pub fn ensure_supported(&self, min_api_major: u32, min_app_version: &str) -> Result<(), Error> {
        let required = VersionRequirement::new(min_api_major, min_app_version)?;
        let actual = self.version()?;
        if actual.satisfies(&required) {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion {
                base_url: self.base.to_string(),
                required,
                actual,
            })
        }
    }

    /// Forget the version record for this base address, e.g. after
    /// Cytoscape was restarted or upgraded.
    pub fn invalidate_version(&self) {
        self.versions.remove(self.base.as_str());
    }

    /// Forget every cached version record, for every base address.
    pub fn clear_version_cache(&self) {
        self.versions.clear();
    }

    // --- command gateway -----------------------------------------------------

    /// Run a structured command.
    pub fn command(&self, command: &Command) -> Result<Value, Error> {
        let url = self.base.resolve(Gateway::Commands, &command.path());
        self.dispatch(Method::POST, url, Some(command.body()))
    }

    /// Parse and run a command string such as `apps status app="stringApp"`.
    pub fn command_str(&self, command: &str) -> Result<Value, Error> {
        self.command(&Command::parse(command)?)
    }

    // --- REST gateway --------------------------------------------------------

    pub fn rest(&self, request: &RestRequest) -> Result<Value, Error> {
        let url = self.base.resolve(Gateway::Rest, &request.target());
        self.dispatch(request.method.clone(), url, request.body.clone())
    }

    pub fn get(&self, path: &str) -> Result<Value, Error> {
        self.rest(&RestRequest::get(path))
    }

    pub fn put(&self, path: &str, body: Value) -> Result<Value, Error> {
        self.rest(&RestRequest::put(path, body))
    }

    pub fn post(&self, path: &str, body: Value) -> Result<Value, Error> {
        self.rest(&RestRequest::post(path, body))
    }

    pub fn delete(&self, path: &str) -> Result<Value, Error> {
        self.rest(&RestRequest::delete(path))
    }

    fn dispatch(&self, method: Method, url: String, body: Option<Value>) -> Result<Value, Error> {
        let mut request = HttpRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        let raw = self.transport.send(&request)?;
        normalize(&raw)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("base", &self.base).finish_non_exhaustive()
    }
}
