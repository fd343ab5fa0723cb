//! Inspecting and managing Cytoscape apps.
//!
//! Every operation requires CyREST API v1 on Cytoscape 3.7 or later and
//! goes through the command gateway with `POST`:
//!
//! | Function | Command |
//! |----------|---------|
//! | [`disable_app`] | `apps disable app=…` |
//! | [`enable_app`] | `apps enable app=…` |
//! | [`get_app_information`] | `apps information app=…` |
//! | [`install_app`] | `apps install app=…` |
//! | [`get_available_apps`] | `apps list available` |
//! | [`get_disabled_apps`] | `apps list disabled` |
//! | [`get_installed_apps`] | `apps list installed` |
//! | [`get_uninstalled_apps`] | `apps list uninstalled` |
//! | [`get_app_updates`] | `apps list updates` |
//! | [`open_app_store`] | `apps open appstore app=…` |
//! | [`get_app_status`] | `apps status app=…` |
//! | [`uninstall_app`] | `apps uninstall app=…` |
//! | [`update_app`] | `apps update app=…` |
//!
//! Results are returned as Cytoscape sends them. Several of these commands
//! succeed whether or not the named app exists (`disable_app` returns
//! `{"appName": …}` either way; `install_app` returns `{}`).

use serde_json::Value;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;

const MIN_API: u32 = 1;
const MIN_CYTOSCAPE: &str = "3.7";

fn run(client: &Client, verb: &str, app: Option<&str>) -> Result<Value, Error> {
    client.ensure_supported(MIN_API, MIN_CYTOSCAPE)?;
    let command = Command::new("apps", verb).arg_opt("app", app);
    client.command(&command)
}

/// Disable an app without uninstalling it.
///
/// ```rust,ignore
/// disable_app(&client, "stringApp")?; // {"appName": "stringApp"}
/// ```
pub fn disable_app(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "disable", Some(app))
}

/// Enable a previously disabled app.
pub fn enable_app(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "enable", Some(app))
}

/// Name, short description and version of an installed app.
///
/// Fails with [`Error::Remote`] if the app is unknown.
///
/// ```rust,ignore
/// get_app_information(&client, "stringApp")?;
/// // {"app": "stringApp", "descriptionName": "Import and augment …", "version": "1.5.1"}
/// ```
pub fn get_app_information(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "information", Some(app))
}

/// Install an app from the App Store.
pub fn install_app(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "install", Some(app))
}

/// Apps available for installation: `[{"appName", "description", "details"}, …]`.
pub fn get_available_apps(client: &Client) -> Result<Value, Error> {
    run(client, "list available", None)
}

pub fn get_disabled_apps(client: &Client) -> Result<Value, Error> {
    run(client, "list disabled", None)
}

pub fn get_installed_apps(client: &Client) -> Result<Value, Error> {
    run(client, "list installed", None)
}

pub fn get_uninstalled_apps(client: &Client) -> Result<Value, Error> {
    run(client, "list uninstalled", None)
}

/// Installed apps with a newer release in the App Store.
pub fn get_app_updates(client: &Client) -> Result<Value, Error> {
    run(client, "list updates", None)
}

/// Open the App Store page of an app in Cytoscape's browser.
pub fn open_app_store(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "open appstore", Some(app))
}

/// Status of an app: `{"appName": …, "status": "Installed" | "Disabled" | …}`.
pub fn get_app_status(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "status", Some(app))
}

pub fn uninstall_app(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "uninstall", Some(app))
}

/// Update an app to its latest release.
pub fn update_app(client: &Client, app: &str) -> Result<Value, Error> {
    run(client, "update", Some(app))
}
