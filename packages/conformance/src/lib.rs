//! Shared helpers for the cyrest conformance test suite.
//!
//! Provides [`spawn_remote`], a function that binds a `TcpListener` on an
//! ephemeral port and serves an in-process imitation of CyREST from it.
//! The imitation answers the version request, a handful of commands, and the
//! style and network REST routes with the same body shapes Cytoscape uses,
//! and records every request it receives so tests can assert what did (and
//! did not) reach the remote side.
//!
//! The server runs on its own tokio runtime thread, so tests drive it with
//! the blocking [`cyrest::Client`] from plain `#[test]` functions.

use std::collections::BTreeMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cyrest::{BaseUrl, Client};
use cyrest_wire::{
    CiEnvelope, CiError, ColumnValues, Count, CurrentNetwork, NetworkName, NewNode, StyleDependency, VersionInfo,
};
use serde_json::{json, Value};

/// One request as the imitation server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Raw (still percent-encoded) path, without the query string.
    pub path: String,
}

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Network {
    suid: u64,
    name: String,
    /// `(SUID, name)` in table order.
    nodes: Vec<(u64, String)>,
    edge_count: u64,
}

#[derive(Debug)]
struct Inner {
    networks: Vec<Network>,
    current: Option<u64>,
    styles: BTreeMap<String, Vec<StyleDependency>>,
    next_suid: u64,
}

impl Inner {
    fn allocate(&mut self) -> u64 {
        self.next_suid += 1;
        self.next_suid
    }

    fn network(&mut self, suid: u64) -> Option<&mut Network> {
        self.networks.iter_mut().find(|n| n.suid == suid)
    }
}

#[derive(Clone)]
struct RemoteState {
    version: VersionInfo,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
    inner: Arc<Mutex<Inner>>,
}

impl RemoteState {
    fn seeded(version: VersionInfo) -> Self {
        let deps = vec![
            StyleDependency::new("arrowColorMatchesEdge", false),
            StyleDependency::new("nodeCustomGraphicsSizeSync", true),
            StyleDependency::new("nodeSizeLocked", false),
        ];
        let styles = BTreeMap::from([
            ("default".to_string(), deps.clone()),
            ("galFiltered Style".to_string(), deps),
        ]);
        let networks = vec![
            Network {
                suid: 52,
                name: "galFiltered.sif".into(),
                nodes: vec![(100, "YBR020W".into()), (101, "YGL035C".into()), (102, "MIG1".into())],
                edge_count: 2,
            },
            Network {
                suid: 9001,
                name: "yeastHighQuality.sif".into(),
                nodes: vec![(9002, "YAL001C".into())],
                edge_count: 0,
            },
        ];
        Self {
            version,
            log: Arc::new(Mutex::new(Vec::new())),
            inner: Arc::new(Mutex::new(Inner {
                networks,
                current: Some(52),
                styles,
                next_suid: 10_000,
            })),
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteHandle
// ---------------------------------------------------------------------------

/// A running imitation CyREST server.
pub struct RemoteHandle {
    /// e.g. `http://127.0.0.1:51234/v1`
    pub base_url: String,
    state: RemoteState,
}

impl RemoteHandle {
    pub fn base(&self) -> BaseUrl {
        BaseUrl::parse(&self.base_url).expect("imitation server URL is a valid base address")
    }

    /// A fresh client (with its own version cache) aimed at this server.
    pub fn client(&self) -> Client {
        Client::new(self.base()).expect("build HTTP client")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.log.lock().unwrap().clone()
    }

    /// How many `method path` requests arrived. `path` includes the `/v1` prefix.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

/// Start an imitation CyREST server reporting `cytoscape_version` and
/// return a handle to it.
///
/// The server is seeded with two networks (`galFiltered.sif` = SUID 52,
/// current, nodes `YBR020W`, `YGL035C`, `MIG1`; `yeastHighQuality.sif` =
/// SUID 9001) and two styles (`default`, `galFiltered Style`). Loading any
/// file whose name ends in `.sif` creates a network named after the file.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the runtime fails to start.
pub fn spawn_remote(cytoscape_version: &str) -> RemoteHandle {
    init_tracing();

    let state = RemoteState::seeded(VersionInfo::new("v1", cytoscape_version));
    let router = build_router(state.clone());

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build tokio runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral port");
            tx.send(listener.local_addr().expect("get local addr"))
                .expect("report bound address");
            axum::serve(listener, router)
                .await
                .expect("imitation CyREST server error");
        });
    });

    let addr = rx.recv().expect("imitation server failed to start");
    RemoteHandle {
        base_url: format!("http://{addr}/v1"),
        state,
    }
}

/// A base address on which nothing is listening.
pub fn closed_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}/v1")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn build_router(state: RemoteState) -> Router {
    Router::new()
        .route("/v1/version", get(version))
        .route("/v1/commands/{*command}", post(command))
        .route("/v1/styles", get(style_names))
        .route(
            "/v1/styles/{name}/dependencies",
            get(style_dependencies).put(put_style_dependencies),
        )
        .route("/v1/networks", axum::routing::delete(delete_all_networks))
        .route("/v1/networks/count", get(network_count))
        .route("/v1/networks.names", get(network_names))
        .route("/v1/networks/currentNetwork", get(current_network))
        .route("/v1/networks/{suid}", axum::routing::delete(delete_network))
        .route("/v1/networks/{suid}/nodes", post(add_nodes))
        .route("/v1/networks/{suid}/nodes/count", get(node_count))
        .route("/v1/networks/{suid}/edges/count", get(edge_count))
        .route("/v1/networks/{suid}/tables/{table}/columns/{column}", get(node_column))
        .route("/v1/broken", get(broken))
        .route("/v1/stall", get(stall))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<RemoteState>, request: Request, next: Next) -> Response {
    state.log.lock().unwrap().push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
    });
    next.run(request).await
}

fn ci_ok(data: Value) -> Response {
    (StatusCode::OK, Json(CiEnvelope::ok(data))).into_response()
}

fn ci_failed(status: StatusCode, error_type: &str, message: String) -> Response {
    let error = CiError::new(status.as_u16(), error_type, message);
    (status, Json(CiEnvelope::failed(error))).into_response()
}

async fn version(State(state): State<RemoteState>) -> Json<VersionInfo> {
    Json(state.version.clone())
}

async fn command(
    State(state): State<RemoteState>,
    Path(command): Path<String>,
    Json(args): Json<Value>,
) -> Response {
    let arg = |key: &str| args.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

    match command.as_str() {
        "apps/disable" | "apps/enable" => ci_ok(json!({ "appName": arg("app") })),
        "apps/install" | "session/new" => ci_ok(json!({})),
        "apps/information" if arg("app") == "stringApp" => ci_ok(json!({
            "app": "stringApp",
            "descriptionName": "Import and augment Cytoscape networks from STRING",
            "version": "1.5.1"
        })),
        "apps/information" => ci_failed(
            StatusCode::INTERNAL_SERVER_ERROR,
            "urn:cytoscape:ci:cyrest-core:v1:handle-json-command:errors:2",
            format!("Can't find app '{}'", arg("app")),
        ),
        "apps/list/installed" => ci_ok(json!([
            { "appName": "stringApp", "version": "1.5.1", "description": "", "status": "Installed" }
        ])),
        "vizmap/apply" => ci_ok(json!({ "views": [275240] })),
        "network/set/current" => {
            let wanted = arg("network");
            let mut inner = state.inner.lock().unwrap();
            match find_by_arg(&inner, &wanted) {
                Some(suid) => {
                    inner.current = Some(suid);
                    ci_ok(json!({}))
                }
                None => network_not_found(&wanted),
            }
        }
        "network/clone" => {
            let wanted = arg("network");
            let mut inner = state.inner.lock().unwrap();
            let Some(source) = find_by_arg(&inner, &wanted).and_then(|suid| inner.network(suid).cloned()) else {
                return network_not_found(&wanted);
            };
            let suid = inner.allocate();
            inner.networks.push(Network {
                suid,
                name: format!("{}(1)", source.name),
                ..source
            });
            ci_ok(json!({ "network": suid }))
        }
        "network/load/file" => {
            let file = arg("file");
            let name = file.rsplit(['/', '\\']).next().unwrap_or_default().to_string();
            if !name.ends_with(".sif") {
                return ci_failed(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "urn:cytoscape:ci:cyrest-core:v1:handle-json-command:errors:2",
                    format!("File '{file}' not found"),
                );
            }
            let mut inner = state.inner.lock().unwrap();
            let suid = inner.allocate();
            let view = inner.allocate();
            inner.networks.push(Network {
                suid,
                name,
                nodes: Vec::new(),
                edge_count: 0,
            });
            ci_ok(json!({ "networks": [suid], "views": [view] }))
        }
        other => ci_failed(
            StatusCode::NOT_FOUND,
            "urn:cytoscape:ci:cyrest-core:v1:handle-json-command:errors:1",
            format!("Failed to find command: {}", other.replace('/', " ")),
        ),
    }
}

async fn style_names(State(state): State<RemoteState>) -> Json<Vec<String>> {
    Json(state.inner.lock().unwrap().styles.keys().cloned().collect())
}

async fn style_dependencies(State(state): State<RemoteState>, Path(name): Path<String>) -> Response {
    match state.inner.lock().unwrap().styles.get(&name) {
        Some(deps) => Json(deps.clone()).into_response(),
        None => ci_failed(
            StatusCode::NOT_FOUND,
            "urn:cytoscape:ci:cyrest-core:v1:styles:errors:1",
            format!("Visual Style does not exist: {name}"),
        ),
    }
}

async fn put_style_dependencies(
    State(state): State<RemoteState>,
    Path(name): Path<String>,
    Json(update): Json<Vec<StyleDependency>>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let Some(deps) = inner.styles.get_mut(&name) else {
        return ci_failed(
            StatusCode::NOT_FOUND,
            "urn:cytoscape:ci:cyrest-core:v1:styles:errors:1",
            format!("Visual Style does not exist: {name}"),
        );
    };
    for change in update {
        match deps
            .iter_mut()
            .find(|d| d.visual_property_dependency == change.visual_property_dependency)
        {
            Some(existing) => existing.enabled = change.enabled,
            None => deps.push(change),
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn network_count(State(state): State<RemoteState>) -> Json<Count> {
    let count = state.inner.lock().unwrap().networks.len() as u64;
    Json(Count { count })
}

async fn network_names(State(state): State<RemoteState>) -> Json<Vec<NetworkName>> {
    let inner = state.inner.lock().unwrap();
    Json(
        inner
            .networks
            .iter()
            .map(|n| NetworkName { suid: n.suid, name: n.name.clone() })
            .collect(),
    )
}

async fn current_network(State(state): State<RemoteState>) -> Response {
    match state.inner.lock().unwrap().current {
        Some(network_suid) => (
            StatusCode::OK,
            Json(CiEnvelope::ok(CurrentNetwork { network_suid })),
        )
            .into_response(),
        None => ci_failed(
            StatusCode::NOT_FOUND,
            "urn:cytoscape:ci:cyrest-core:v1:networks:errors:4",
            "No current network".to_string(),
        ),
    }
}

async fn delete_network(State(state): State<RemoteState>, Path(suid): Path<u64>) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let before = inner.networks.len();
    inner.networks.retain(|n| n.suid != suid);
    if inner.networks.len() == before {
        return ci_failed(
            StatusCode::NOT_FOUND,
            "urn:cytoscape:ci:cyrest-core:v1:networks:errors:1",
            format!("Network {suid} does not exist"),
        );
    }
    if inner.current == Some(suid) {
        inner.current = None;
    }
    StatusCode::OK.into_response()
}

async fn delete_all_networks(State(state): State<RemoteState>) -> StatusCode {
    let mut inner = state.inner.lock().unwrap();
    inner.networks.clear();
    inner.current = None;
    StatusCode::OK
}

fn find_by_arg(inner: &Inner, wanted: &str) -> Option<u64> {
    inner
        .networks
        .iter()
        .find(|n| format!("SUID:{}", n.suid) == wanted)
        .map(|n| n.suid)
}

fn network_not_found(wanted: &str) -> Response {
    ci_failed(
        StatusCode::INTERNAL_SERVER_ERROR,
        "urn:cytoscape:ci:cyrest-core:v1:handle-json-command:errors:2",
        format!("Network {wanted} not found"),
    )
}

fn no_such_network(suid: u64) -> Response {
    ci_failed(
        StatusCode::NOT_FOUND,
        "urn:cytoscape:ci:cyrest-core:v1:networks:errors:1",
        format!("Network {suid} does not exist"),
    )
}

async fn add_nodes(
    State(state): State<RemoteState>,
    Path(suid): Path<u64>,
    Json(names): Json<Vec<String>>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let first = inner.next_suid + 1;
    inner.next_suid += names.len() as u64;
    let Some(network) = inner.network(suid) else {
        return no_such_network(suid);
    };
    let added: Vec<NewNode> = names
        .into_iter()
        .zip(first..)
        .map(|(name, suid)| NewNode { name, suid })
        .collect();
    network.nodes.extend(added.iter().map(|n| (n.suid, n.name.clone())));
    Json(added).into_response()
}

async fn node_count(State(state): State<RemoteState>, Path(suid): Path<u64>) -> Response {
    match state.inner.lock().unwrap().network(suid) {
        Some(n) => Json(Count { count: n.nodes.len() as u64 }).into_response(),
        None => no_such_network(suid),
    }
}

async fn edge_count(State(state): State<RemoteState>, Path(suid): Path<u64>) -> Response {
    match state.inner.lock().unwrap().network(suid) {
        Some(n) => Json(Count { count: n.edge_count }).into_response(),
        None => no_such_network(suid),
    }
}

/// Only the default node table's `SUID` and `name` columns are modelled.
async fn node_column(
    State(state): State<RemoteState>,
    Path((suid, table, column)): Path<(u64, String, String)>,
) -> Response {
    let mut inner = state.inner.lock().unwrap();
    let Some(network) = inner.network(suid) else {
        return no_such_network(suid);
    };
    let values: Vec<Value> = match (table.as_str(), column.as_str()) {
        ("defaultnode", "SUID") => network.nodes.iter().map(|(id, _)| json!(id)).collect(),
        ("defaultnode", "name") => network.nodes.iter().map(|(_, name)| json!(name)).collect(),
        _ => {
            return ci_failed(
                StatusCode::NOT_FOUND,
                "urn:cytoscape:ci:cyrest-core:v1:tables:errors:1",
                format!("No such column {table}.{column}"),
            )
        }
    };
    Json(ColumnValues { name: column, values }).into_response()
}

/// Never answers within any sensible client timeout.
async fn stall() -> &'static str {
    tokio::time::sleep(Duration::from_secs(30)).await;
    "{}"
}

async fn broken() -> &'static str {
    "<html><body>Internal proxy page</body></html>"
}
