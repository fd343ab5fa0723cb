//! The CI ("Cytoscape Interface") response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope wrapped around command-gateway replies and some REST replies.
///
/// ```json
/// { "data": { "appName": "stringApp" }, "errors": [] }
/// ```
///
/// A non-empty `errors` array means the remote operation failed, whatever
/// `data` holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CiEnvelope<T = Value> {
    pub data: T,

    #[serde(default)]
    pub errors: Vec<CiError>,
}

impl<T> CiEnvelope<T> {
    /// A successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }
}

impl CiEnvelope<Value> {
    /// A failed envelope carrying a single error and an empty `data` object.
    pub fn failed(error: CiError) -> Self {
        Self {
            data: Value::Object(Default::default()),
            errors: vec![error],
        }
    }
}

/// One entry of the envelope's `errors` array.
///
/// ```json
/// {
///   "status": 500,
///   "type": "urn:cytoscape:ci:cyrest-core:v1:handle-json-command:errors:2",
///   "message": "Error handling json command: apps/information",
///   "link": "file:/Users/me/CytoscapeConfiguration/3/framework-cytoscape.log"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CiError {
    /// HTTP status the remote process associated with the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// URN identifying the failing component and error kind.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    /// Human-readable description of the problem.
    pub message: String,

    /// Pointer to the remote log holding the stack trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl CiError {
    pub fn new(status: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            error_type: Some(error_type.into()),
            message: message.into(),
            link: None,
        }
    }
}
