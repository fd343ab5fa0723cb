//! Client configuration, populated from environment variables.

use std::time::Duration;

use crate::endpoint::BaseUrl;
use crate::error::Error;

/// Runtime configuration for a [`Client`](crate::Client).
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `CYREST_BASE_URL` | `http://127.0.0.1:1234/v1` | Base address of the CyREST API |
/// | `CYREST_TIMEOUT_SECS` | (absent = reqwest default) | Per-request timeout in seconds |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Default base address for calls made through the client.
    pub base_url: BaseUrl,

    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Populate config from the process environment, applying defaults
    /// where a variable is absent.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url = match lookup("CYREST_BASE_URL") {
            Some(raw) => BaseUrl::parse(&raw)?,
            None => BaseUrl::default(),
        };

        let timeout = lookup("CYREST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    Error::Configuration(format!(
                        "CYREST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })
            })
            .transpose()?;

        Ok(Self { base_url, timeout })
    }
}
