//! Visual style dependency types: `/v1/styles/{name}/dependencies`.

use serde::{Deserialize, Serialize};

/// One dependency flag of a visual style.
///
/// Known dependency names are `arrowColorMatchesEdge`,
/// `nodeCustomGraphicsSizeSync` and `nodeSizeLocked`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleDependency {
    pub visual_property_dependency: String,
    pub enabled: bool,
}

impl StyleDependency {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            visual_property_dependency: name.into(),
            enabled,
        }
    }
}
