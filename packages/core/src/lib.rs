//! Blocking client for the Cytoscape CyREST API.
//!
//! Every operation funnels through one pipeline: an optional version gate,
//! URL resolution against one of the two CyREST gateways, a single HTTP
//! exchange, and normalization of the reply into a [`serde_json::Value`] or
//! an [`Error`].
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`endpoint`] | [`BaseUrl`] and the command/REST [`Gateway`]s |
//! | [`command`] | [`Command`] serializer and parser for the command gateway |
//! | [`version`] | Dotted-version ordering and the per-address [`VersionCache`] |
//! | [`transport`] | The [`Transport`] seam, over `reqwest` or scripted in memory |
//! | [`normalize`] | Reply classification into value or typed error |
//! | [`client`] | [`Client`], the context object tying the above together |
//! | [`config`] | [`ClientConfig`] from environment variables |
//! | [`apps`], [`session`], [`styles`], [`networks`] | Domain operations |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use cyrest::{apps, networks, Client};
//!
//! // CYREST_BASE_URL, or http://127.0.0.1:1234/v1.
//! let client = Client::from_env()?;
//!
//! let installed = apps::get_installed_apps(&client)?;
//! let count = networks::get_network_count(&client)?;
//!
//! // Anything else the command gateway understands.
//! let status = client.command_str(r#"apps status app="stringApp""#)?;
//! ```
//!
//! # Errors
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`Error::Connection`] | Cytoscape is not reachable at the base address |
//! | [`Error::UnsupportedVersion`] | Rejected before sending; Cytoscape is too old |
//! | [`Error::Remote`] | Cytoscape ran the request and reported a failure |
//! | [`Error::MalformedResponse`] | The reply was not the JSON expected |
//! | [`Error::Configuration`] | Bad base address or environment setting |
//! | [`Error::InvalidArgument`] | A domain operation rejected its input |

pub mod apps;
pub mod client;
pub mod command;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod networks;
pub mod normalize;
pub mod session;
pub mod styles;
pub mod transport;
pub mod version;

pub use client::{Client, RestRequest};
pub use command::{ArgValue, Command};
pub use config::ClientConfig;
pub use endpoint::{BaseUrl, Gateway, DEFAULT_BASE_URL};
pub use error::{Error, RemoteError};
pub use networks::{NetworkRef, Selection};
pub use normalize::normalize;
pub use transport::http::HttpTransport;
pub use transport::mock::MockTransport;
pub use transport::{HttpRequest, Method, RawResponse, Transport};
pub use version::{AppVersion, VersionCache, VersionRecord, VersionRequirement};
