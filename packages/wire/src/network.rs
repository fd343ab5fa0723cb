//! Network listing and counting types: `/v1/networks…`.

use serde::{Deserialize, Serialize};

/// Body of every `…/count` endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Count {
    pub count: u64,
}

/// One entry of `GET /v1/networks.names`.
///
/// ```json
/// { "SUID": 52, "name": "galFiltered.sif" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkName {
    #[serde(rename = "SUID")]
    pub suid: u64,
    pub name: String,
}

/// The `data` payload of `GET /v1/networks/currentNetwork`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentNetwork {
    #[serde(rename = "networkSUID")]
    pub network_suid: u64,
}

/// Body of `GET /v1/networks/{suid}/tables/{table}/columns/{column}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnValues {
    pub name: String,
    pub values: Vec<serde_json::Value>,
}

/// One entry of the reply to `POST /v1/networks/{suid}/nodes`.
///
/// ```json
/// { "name": "newnode1", "SUID": 9100 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewNode {
    pub name: String,
    #[serde(rename = "SUID")]
    pub suid: u64,
}

/// One entry of the body of `POST /v1/networks/{suid}/edges`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeRequest {
    /// Source node SUID.
    pub source: u64,
    /// Target node SUID.
    pub target: u64,
    pub directed: bool,
    pub interaction: String,
}

/// One entry of the reply to `POST /v1/networks/{suid}/edges`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEdge {
    #[serde(rename = "SUID")]
    pub suid: u64,
    pub source: u64,
    pub target: u64,
}
