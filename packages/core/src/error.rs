//! Error taxonomy for every call into the remote Cytoscape process.
//!
//! All public operations return [`Error`]. Nothing inside the crate
//! recovers from one; callers decide whether, say, a "not found" from the
//! remote process is fatal or part of an idempotent delete.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::version::{VersionRecord, VersionRequirement};

/// Errors returned by the dispatch layer and the domain callers.
#[derive(Debug, Error)]
pub enum Error {
    /// A base address or environment setting could not be interpreted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote process could not be reached at all.
    #[error(
        "could not reach CyREST at {url}; check that Cytoscape is running and that \
         CyREST is listening at that address ({source})"
    )]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The remote process is older than the operation requires. Raised
    /// before the operation's request is sent.
    #[error("{base_url} reports {actual}, but this operation requires {required} or later")]
    UnsupportedVersion {
        base_url: String,
        required: VersionRequirement,
        actual: VersionRecord,
    },

    /// The remote process ran the request and reported a failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The reply could not be interpreted as JSON, or did not have the
    /// structure the caller needed.
    #[error("malformed response{}: {reason} (body: {snippet:?})", status_suffix(.status))]
    MalformedResponse {
        status: Option<u16>,
        reason: String,
        snippet: String,
    },

    /// A domain caller rejected its input before dispatching anything.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {s})"),
        None => String::new(),
    }
}

impl Error {
    /// The remote error detail, if this is [`Error::Remote`].
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Remote(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn malformed(status: Option<u16>, reason: impl Into<String>, body: &str) -> Self {
        Error::MalformedResponse {
            status,
            reason: reason.into(),
            snippet: snippet(body),
        }
    }
}

const SNIPPET_CHARS: usize = 200;

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

// ---------------------------------------------------------------------------
// RemoteError
// ---------------------------------------------------------------------------

/// A failure reported by the remote process.
///
/// `message` is the remote text verbatim. The other fields are filled in
/// from whatever the envelope carried.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    pub message: String,

    /// HTTP status of the reply, when it was not 2xx or the envelope named one.
    pub status: Option<u16>,

    /// Machine-readable code: the CI `type` URN or an `error.code` field.
    pub code: Option<String>,

    /// Remaining structured detail (stack, trace, the raw error entry).
    pub detail: Option<Value>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: None,
            detail: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CyREST error: {}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_display_includes_code_and_status() {
        let e = RemoteError::new("No app named junk")
            .with_code("urn:cytoscape:ci:apps:not-found")
            .with_status(404);
        assert_eq!(
            e.to_string(),
            "CyREST error: No app named junk [urn:cytoscape:ci:apps:not-found] (HTTP 404)"
        );
    }

    #[test]
    fn connection_message_points_at_cytoscape() {
        let e = Error::Connection {
            url: "http://127.0.0.1:1234/v1/version".into(),
            source: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Cytoscape is running"));
        assert!(msg.contains("http://127.0.0.1:1234/v1/version"));
    }

    #[test]
    fn malformed_snippet_is_truncated() {
        let body = "x".repeat(1000);
        match Error::malformed(Some(200), "expected value", &body) {
            Error::MalformedResponse { snippet, status, .. } => {
                assert_eq!(snippet.len(), SNIPPET_CHARS);
                assert_eq!(status, Some(200));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
