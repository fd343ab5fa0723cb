//! Base addresses and the two CyREST gateways behind them.
//!
//! One Cytoscape process exposes two logical APIs under the same base
//! address:
//!
//! ```text
//! http://127.0.0.1:1234/v1/commands/apps/list/installed   command gateway
//! http://127.0.0.1:1234/v1/networks/count                 REST gateway
//! └──────── base ────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::error::Error;

/// Where CyREST listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1234/v1";

/// Which of the two sub-APIs a request is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gateway {
    /// Verb-phrase commands, `POST {base}/commands/{namespace}/{verb…}`.
    Commands,
    /// Conventional resource paths, `{base}/{path}`.
    Rest,
}

/// A validated base address: scheme, host, port and API version segment.
///
/// Stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(s: &str) -> Result<Self, Error> {
        let trimmed = s.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| Error::Configuration(format!("invalid base address {s:?}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "invalid base address {s:?}: scheme must be http or https"
            )));
        }
        let authority = trimmed.split_once("://").map(|(_, rest)| rest).unwrap_or_default();
        if url.host_str().is_none() || authority.is_empty() || authority.starts_with('/') {
            return Err(Error::Configuration(format!(
                "invalid base address {s:?}: missing host"
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::Configuration(format!(
                "invalid base address {s:?}: must not carry a query or fragment"
            )));
        }

        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URL of `fragment` on the given gateway. Leading slashes on the
    /// fragment are ignored.
    pub fn resolve(&self, gateway: Gateway, fragment: &str) -> String {
        let fragment = fragment.trim_start_matches('/');
        match gateway {
            Gateway::Commands => format!("{}/commands/{}", self.0, fragment),
            Gateway::Rest => format!("{}/{}", self.0, fragment),
        }
    }

    /// `{base}/version`
    pub fn version_url(&self) -> String {
        self.resolve(Gateway::Rest, "version")
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(DEFAULT_BASE_URL.to_string())
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
