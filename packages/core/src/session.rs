//! Opening, saving and closing Cytoscape sessions.
//!
//! | Function | Gateway | Request |
//! |----------|---------|---------|
//! | [`open_session`] | command | `session open file=…` / `session open url=…` |
//! | [`save_session`] | REST + command | `GET session/name`, then `session save` / `session save as file=…` |
//! | [`close_session`] | command | optional save, then `session new` |

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;

/// Session opened when [`open_session`] is given no location.
pub const SAMPLE_SESSION: &str = "./sampleData/sessions/Yeast Perturbation.cys";

const SESSION_EXTENSION: &str = ".cys";

/// Close the current session, destroying unsaved work unless
/// `save_before_closing` is set.
///
/// With `save_before_closing`, `filename` is passed to [`save_session`];
/// leave it `None` to save back to the file the session came from.
pub fn close_session(
    client: &Client,
    save_before_closing: bool,
    filename: Option<&str>,
) -> Result<Value, Error> {
    if save_before_closing {
        save_session(client, filename)?;
    }
    client.command(&Command::new("session", "new"))
}

/// Open a session file or URL, replacing all networks, tables and styles
/// of the current session.
///
/// Locations starting with `http` are passed as URLs; anything else is a
/// path, made absolute against the current directory. `None` opens
/// [`SAMPLE_SESSION`].
pub fn open_session(client: &Client, location: Option<&str>) -> Result<Value, Error> {
    let command = match location {
        None => Command::new("session", "open").arg("file", SAMPLE_SESSION),
        Some(url) if url.starts_with("http") => Command::new("session", "open").arg("url", url),
        Some(path) => Command::new("session", "open").arg("file", path_arg(&absolute(Path::new(path))?)),
    };
    let target = command
        .get("file")
        .or_else(|| command.get("url"))
        .map(|v| v.render())
        .unwrap_or_default();
    info!(%target, "cyrest: opening session");
    client.command(&command)
}

/// Save the current session as a `.cys` file.
///
/// With `None`, saves back to the file the session was loaded from or last
/// saved to; a session that was never saved yields
/// [`Error::InvalidArgument`]. Otherwise `.cys` is appended unless already
/// present, the path is made absolute, and an existing file is overwritten.
pub fn save_session(client: &Client, filename: Option<&str>) -> Result<Value, Error> {
    let Some(filename) = filename else {
        let current = client.get("session/name")?;
        let name = match &current {
            Value::String(s) => s.as_str(),
            other => other.get("name").and_then(Value::as_str).unwrap_or_default(),
        };
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "session has never been saved; provide a filename the first time you save".into(),
            ));
        }
        return client.command(&Command::new("session", "save"));
    };

    let path = absolute(&with_session_extension(filename))?;
    if path.is_file() {
        warn!(path = %path.display(), "cyrest: overwriting existing session file");
    }
    client.command(&Command::new("session", "save as").arg("file", path_arg(&path)))
}

fn with_session_extension(filename: &str) -> PathBuf {
    if filename.ends_with(SESSION_EXTENSION) {
        PathBuf::from(filename)
    } else {
        PathBuf::from(format!("{filename}{SESSION_EXTENSION}"))
    }
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf, Error> {
    std::path::absolute(path)
        .map_err(|e| Error::InvalidArgument(format!("cannot resolve {}: {e}", path.display())))
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::endpoint::BaseUrl;
    use crate::transport::mock::MockTransport;
    use crate::transport::Method;

    const BASE: &str = "http://127.0.0.1:1234/v1";

    fn client() -> (Client, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let client = Client::with_transport(BaseUrl::parse(BASE).unwrap(), Arc::clone(&mock));
        (client, mock)
    }

    fn empty_ok(mock: &MockTransport, path: &str) {
        mock.respond_json(
            Method::POST,
            &format!("{BASE}/commands/{path}"),
            200,
            &json!({ "data": {}, "errors": [] }),
        );
    }

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(with_session_extension("other"), PathBuf::from("other.cys"));
        assert_eq!(with_session_extension("other.cys"), PathBuf::from("other.cys"));
        // A literal dot is required: "othercys" is not a session file name.
        assert_eq!(with_session_extension("othercys"), PathBuf::from("othercys.cys"));
    }

    #[test]
    fn save_as_sends_absolute_path_with_extension() {
        let (client, mock) = client();
        empty_ok(&mock, "session/save/as");

        assert_eq!(save_session(&client, Some("results/run1")).unwrap(), json!({}));

        let sent = mock.requests();
        let file = sent[0].body.as_ref().unwrap()["file"].as_str().unwrap().to_string();
        assert!(Path::new(&file).is_absolute());
        assert!(file.ends_with("run1.cys"));
    }

    #[test]
    fn save_as_over_existing_file_still_saves() {
        let (client, mock) = client();
        empty_ok(&mock, "session/save/as");

        let existing = std::env::temp_dir().join(format!("cyrest-existing-{}.cys", std::process::id()));
        std::fs::write(&existing, b"").unwrap();
        let result = save_session(&client, Some(existing.to_str().unwrap()));
        std::fs::remove_file(&existing).unwrap();

        assert_eq!(result.unwrap(), json!({}));
        let sent = mock.requests();
        assert_eq!(sent[0].body, Some(json!({ "file": path_arg(&existing) })));
    }

    #[test]
    fn save_without_name_uses_session_name() {
        let (client, mock) = client();
        mock.respond_json(Method::GET, &format!("{BASE}/session/name"), 200, &json!({ "name": "/data/yeast.cys" }));
        empty_ok(&mock, "session/save");

        save_session(&client, None).unwrap();
        assert_eq!(mock.count(&Method::POST, &format!("{BASE}/commands/session/save")), 1);
    }

    #[test]
    fn save_of_never_saved_session_needs_a_filename() {
        let (client, mock) = client();
        mock.respond_json(Method::GET, &format!("{BASE}/session/name"), 200, &json!({ "name": "" }));

        assert!(matches!(save_session(&client, None), Err(Error::InvalidArgument(_))));
        assert_eq!(mock.count(&Method::POST, &format!("{BASE}/commands/session/save")), 0);
    }

    #[test]
    fn close_without_save_only_starts_new_session() {
        let (client, mock) = client();
        empty_ok(&mock, "session/new");

        close_session(&client, false, None).unwrap();
        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, format!("{BASE}/commands/session/new"));
    }

    #[test]
    fn close_with_save_saves_first() {
        let (client, mock) = client();
        empty_ok(&mock, "session/save/as");
        empty_ok(&mock, "session/new");

        close_session(&client, true, Some("final")).unwrap();
        let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            [
                format!("{BASE}/commands/session/save/as"),
                format!("{BASE}/commands/session/new"),
            ]
        );
    }

    #[test]
    fn close_stops_if_save_fails() {
        let (client, mock) = client();
        mock.respond_json(
            Method::POST,
            &format!("{BASE}/commands/session/save/as"),
            500,
            &json!({ "data": {}, "errors": [{ "message": "Cannot write file" }] }),
        );
        assert!(close_session(&client, true, Some("final")).is_err());
        assert_eq!(mock.count(&Method::POST, &format!("{BASE}/commands/session/new")), 0);
    }

    #[test]
    fn open_distinguishes_urls_from_files() {
        let (client, mock) = client();
        empty_ok(&mock, "session/open");

        open_session(&client, Some("https://example.org/Affinity%20Purification.cys")).unwrap();
        open_session(&client, Some("data/Affinity Purification.cys")).unwrap();
        open_session(&client, None).unwrap();

        let bodies: Vec<Value> = mock.requests().into_iter().filter_map(|r| r.body).collect();
        assert_eq!(bodies[0], json!({ "url": "https://example.org/Affinity%20Purification.cys" }));
        let file = bodies[1]["file"].as_str().unwrap();
        assert!(Path::new(file).is_absolute());
        assert!(file.ends_with("Affinity Purification.cys"));
        assert_eq!(bodies[2], json!({ "file": SAMPLE_SESSION }));
    }
}
