//! JSON body types for the Cytoscape CyREST API.
//!
//! This crate encodes the handful of CyREST response and request bodies
//! that the `cyrest` client interprets structurally. It is shared by the
//! client and by the in-process imitation server in the conformance suite,
//! so both sides of every exchange agree on field names.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | GET | `/v1/version` | → [`VersionInfo`] |
//! | POST | `/v1/commands/{namespace}/{verb…}` | `{arg: "value"}` → [`CiEnvelope`] |
//! | GET | `/v1/styles` | → `["default", …]` |
//! | GET | `/v1/styles/{name}/dependencies` | → `Vec<`[`StyleDependency`]`>` |
//! | PUT | `/v1/styles/{name}/dependencies` | `Vec<`[`StyleDependency`]`>` → empty |
//! | GET | `/v1/networks/count` | → [`Count`] |
//! | GET | `/v1/networks.names` | → `Vec<`[`NetworkName`]`>` |
//! | GET | `/v1/networks/currentNetwork` | → [`CiEnvelope`]`<`[`CurrentNetwork`]`>` |
//! | GET | `/v1/networks/{suid}/nodes/count` | → [`Count`] |
//! | GET | `/v1/networks/{suid}/nodes/selected` | → `[suid, …]` |
//! | GET | `/v1/networks/{suid}/nodes/{node}/neighbors` | → `[suid, …]` |
//! | POST | `/v1/networks/{suid}/nodes` | `["name", …]` → `Vec<`[`NewNode`]`>` |
//! | POST | `/v1/networks/{suid}/edges` | `Vec<`[`EdgeRequest`]`>` → `Vec<`[`NewEdge`]`>` |
//! | GET | `/v1/networks/{suid}/edges/{edge}` | → `{"data": {…}}` |
//! | GET | `/v1/networks/{suid}/tables/{table}/columns/{column}` | → [`ColumnValues`] |
//! | DELETE | `/v1/networks/{suid}` | → empty |

pub mod envelope;
pub mod network;
pub mod style;
pub mod version;

pub use envelope::{CiEnvelope, CiError};
pub use network::{ColumnValues, Count, CurrentNetwork, EdgeRequest, NetworkName, NewEdge, NewNode};
pub use style::StyleDependency;
pub use version::VersionInfo;
