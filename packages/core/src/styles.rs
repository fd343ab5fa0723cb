//! Visual style names and style dependencies.
//!
//! | Function | Gateway | Request |
//! |----------|---------|---------|
//! | [`get_visual_style_names`] | REST | `GET styles` |
//! | [`get_style_dependencies`] | REST | `GET styles/{style}/dependencies` |
//! | [`set_style_dependencies`] | REST + command | `PUT styles/{style}/dependencies`, then `vizmap apply styles=…` |
//! | [`lock_node_dimensions`] | REST + command | as [`set_style_dependencies`] |
//!
//! Style names are percent-encoded in paths. Operations on a named style
//! check that it exists first and fail with [`Error::InvalidArgument`]
//! without touching it otherwise.

use std::collections::BTreeMap;

use cyrest_wire::StyleDependency;
use serde_json::Value;
use urlencoding::encode;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;
use crate::normalize::decode;

/// The style every session has.
pub const DEFAULT_STYLE: &str = "default";

/// Dependency that keeps node width and height equal.
pub const NODE_SIZE_LOCKED: &str = "nodeSizeLocked";

pub fn get_visual_style_names(client: &Client) -> Result<Vec<String>, Error> {
    decode(client.get("styles")?)
}

/// Current value of every dependency of `style`.
///
/// ```rust,ignore
/// get_style_dependencies(&client, "galFiltered Style")?;
/// // {"arrowColorMatchesEdge": false, "nodeCustomGraphicsSizeSync": true, "nodeSizeLocked": true}
/// ```
pub fn get_style_dependencies(client: &Client, style: &str) -> Result<BTreeMap<String, bool>, Error> {
    require_style(client, style)?;
    let deps: Vec<StyleDependency> = decode(client.get(&dependencies_path(style))?)?;
    Ok(deps
        .into_iter()
        .map(|d| (d.visual_property_dependency, d.enabled))
        .collect())
}

/// Set dependencies of `style`, then re-apply the style to the current
/// view. Returns the result of the apply, e.g. `{"views": [275240]}`.
///
/// Known dependencies: `arrowColorMatchesEdge`, `nodeCustomGraphicsSizeSync`,
/// `nodeSizeLocked`.
pub fn set_style_dependencies(
    client: &Client,
    style: &str,
    dependencies: &BTreeMap<String, bool>,
) -> Result<Value, Error> {
    require_style(client, style)?;
    let body: Vec<StyleDependency> = dependencies
        .iter()
        .map(|(name, enabled)| StyleDependency::new(name.clone(), *enabled))
        .collect();
    let body = serde_json::to_value(body)
        .map_err(|e| Error::InvalidArgument(format!("cannot encode dependencies: {e}")))?;
    client.put(&dependencies_path(style), body)?;
    client.command(&Command::new("vizmap", "apply").arg("styles", style))
}

/// Lock or unlock node width and height in `style`.
pub fn lock_node_dimensions(client: &Client, new_state: bool, style: &str) -> Result<Value, Error> {
    let deps = BTreeMap::from([(NODE_SIZE_LOCKED.to_string(), new_state)]);
    set_style_dependencies(client, style, &deps)
}

fn dependencies_path(style: &str) -> String {
    format!("styles/{}/dependencies", encode(style))
}

fn require_style(client: &Client, style: &str) -> Result<(), Error> {
    if get_visual_style_names(client)?.iter().any(|s| s == style) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("no visual style named {style:?}")))
    }
}
