//! Version request: `GET /v1/version`.

use serde::{Deserialize, Serialize};

/// The response body for `GET /v1/version`.
///
/// ```json
/// { "apiVersion": "v1", "cytoscapeVersion": "3.8.0" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// CyREST API version with a leading `v`, e.g. `"v1"`.
    pub api_version: String,

    /// Dotted Cytoscape release, possibly with a qualifier (`"3.9.0-SNAPSHOT"`).
    pub cytoscape_version: String,
}

impl VersionInfo {
    pub fn new(api_version: impl Into<String>, cytoscape_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            cytoscape_version: cytoscape_version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_body() {
        let v: VersionInfo =
            serde_json::from_str(r#"{"apiVersion":"v1","cytoscapeVersion":"3.8.2"}"#).unwrap();
        assert_eq!(v, VersionInfo::new("v1", "3.8.2"));
    }
}
