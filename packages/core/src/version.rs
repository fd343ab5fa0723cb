//! Remote version records and the per-base-address version cache.
//!
//! The gate itself ([`crate::Client::ensure_supported`]) lives on the client
//! because it needs the transport. This module holds the pure parts: the
//! dotted-numeric [`AppVersion`] ordering, the [`VersionRecord`] parsed from
//! `GET /version`, and the [`VersionCache`] the client owns.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use cyrest_wire::VersionInfo;

use crate::error::Error;

// ---------------------------------------------------------------------------
// AppVersion
// ---------------------------------------------------------------------------

/// A dotted application version such as `3.7` or `3.10.0-SNAPSHOT`.
///
/// Components compare as integers from left to right; the shorter sequence
/// is padded with zeros, so `3.7 == 3.7.0` and `3.10.0 > 3.7`. Anything
/// after the leading digits of a component (`0-SNAPSHOT`) is ignored.
#[derive(Debug, Clone)]
pub struct AppVersion {
    raw: String,
    parts: Vec<u64>,
}

impl AppVersion {
    pub fn parse(s: &str) -> Result<Self, Error> {
        let raw = s.trim();
        let parts = raw
            .split('.')
            .map(|component| {
                let digits: String = component.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u64>().map_err(|_| {
                    Error::Configuration(format!("invalid version {s:?}: component {component:?} is not numeric"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for AppVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| {
                let a = self.parts.get(i).copied().unwrap_or(0);
                let b = other.parts.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for AppVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AppVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AppVersion {}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ---------------------------------------------------------------------------
// VersionRecord / VersionRequirement
// ---------------------------------------------------------------------------

/// What a remote process reported from `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub api_major: u32,
    pub app_version: AppVersion,
}

impl VersionRecord {
    /// Interpret the wire body. `apiVersion` is `"v<major>"`.
    pub fn from_info(info: &VersionInfo) -> Result<Self, Error> {
        let api = info.api_version.trim();
        let api_major = api
            .strip_prefix('v')
            .unwrap_or(api)
            .parse::<u32>()
            .map_err(|e| Error::malformed(None, format!("apiVersion {api:?} is not v<integer>: {e}"), api))?;
        let app_version = AppVersion::parse(&info.cytoscape_version).map_err(|_| {
            Error::malformed(
                None,
                "cytoscapeVersion is not a dotted version",
                &info.cytoscape_version,
            )
        })?;
        Ok(Self {
            api_major,
            app_version,
        })
    }

    pub fn satisfies(&self, required: &VersionRequirement) -> bool {
        self.api_major >= required.api_major && self.app_version >= required.app_version
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CyREST API v{} / Cytoscape {}", self.api_major, self.app_version)
    }
}

/// The minimum an operation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequirement {
    pub api_major: u32,
    pub app_version: AppVersion,
}

impl VersionRequirement {
    pub fn new(api_major: u32, app_version: &str) -> Result<Self, Error> {
        Ok(Self {
            api_major,
            app_version: AppVersion::parse(app_version)?,
        })
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CyREST API v{} / Cytoscape {}", self.api_major, self.app_version)
    }
}

// ---------------------------------------------------------------------------
// VersionCache
// ---------------------------------------------------------------------------

/// Version records keyed by base address.
///
/// Populated once per address and read afterwards. A record stays until it
/// is invalidated explicitly, e.g. when the caller knows Cytoscape restarted.
#[derive(Debug, Default)]
pub struct VersionCache {
    records: RwLock<HashMap<String, VersionRecord>>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, base_url: &str) -> Option<VersionRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(base_url)
            .cloned()
    }

    pub fn insert(&self, base_url: &str, record: VersionRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(base_url.to_string(), record);
    }

    pub fn remove(&self, base_url: &str) -> Option<VersionRecord> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(base_url)
    }

    pub fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
