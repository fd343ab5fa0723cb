//! Network lookup, counting and deletion.
//!
//! | Function | Gateway | Request |
//! |----------|---------|---------|
//! | [`get_network_count`] | REST | `GET networks/count` |
//! | [`get_network_list`] | REST | `GET networks.names` |
//! | [`get_network_suid`] | REST | `GET networks/currentNetwork` or `GET networks.names` |
//! | [`get_network_name`] | REST | `GET networks.names` |
//! | [`set_current_network`] | command | `network set current network="SUID:<n>"` |
//! | [`rename_network`] | command | `network rename name=… sourceNetwork="SUID:<n>"` |
//! | [`delete_network`] | REST | `DELETE networks/{suid}` |
//! | [`delete_all_networks`] | REST | `DELETE networks` |
//! | [`get_node_count`] / [`get_edge_count`] | REST | `GET networks/{suid}/{nodes,edges}/count` |
//! | [`get_all_nodes`] / [`get_all_edges`] | REST | `GET networks/{suid}/tables/default{node,edge}/columns/name` |
//! | [`import_network_from_file`] | command | `network load file file=…` |
//! | [`clone_network`] | command | `network clone network="SUID:<n>"` |
//! | [`create_subnetwork`] | command | `network create source=… nodeList=… edgeList=… excludeEdges=…` |
//! | [`add_cy_nodes`] | REST | `POST networks/{suid}/nodes` |
//! | [`add_cy_edges`] | REST | `POST networks/{suid}/edges` |
//! | [`get_first_neighbors`] | REST | `GET networks/{suid}/nodes/{node}/neighbors` |
//! | [`get_edge_info`] | REST | `GET networks/{suid}/edges/{edge}` |
//!
//! Functions that take node or edge names look them up in the default
//! node or edge table first (`SUID` and `name` columns). Where several
//! elements share a name, the first one in table order wins.

use std::collections::HashSet;
use std::path::Path;

use cyrest_wire::{ColumnValues, Count, CurrentNetwork, EdgeRequest, NetworkName, NewEdge, NewNode};
use serde_json::Value;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;
use crate::normalize::decode;
use crate::session::{absolute, path_arg};

/// Network loaded by [`import_network_from_file`] when no file is given,
/// relative to the Cytoscape installation.
pub const SAMPLE_NETWORK: &str = "sampleData/galFiltered.sif";

/// Interaction type given to edges by callers that have no better one.
pub const DEFAULT_EDGE_TYPE: &str = "interacts with";

/// How a caller names a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkRef {
    /// Whatever network is current in Cytoscape.
    Current,
    Suid(u64),
    Title(String),
}

impl From<u64> for NetworkRef {
    fn from(suid: u64) -> Self {
        NetworkRef::Suid(suid)
    }
}

/// `"current"` means [`NetworkRef::Current`]; any other string is a title.
impl From<&str> for NetworkRef {
    fn from(s: &str) -> Self {
        if s == "current" {
            NetworkRef::Current
        } else {
            NetworkRef::Title(s.to_string())
        }
    }
}

pub fn get_network_count(client: &Client) -> Result<u64, Error> {
    let count: Count = decode(client.get("networks/count")?)?;
    Ok(count.count)
}

/// Titles of all networks, in Cytoscape's order.
pub fn get_network_list(client: &Client) -> Result<Vec<String>, Error> {
    Ok(network_names(client)?.into_iter().map(|n| n.name).collect())
}

/// Resolve a reference to a SUID, checking that the network exists.
pub fn get_network_suid(client: &Client, network: &NetworkRef) -> Result<u64, Error> {
    match network {
        NetworkRef::Current => current_suid(client),
        NetworkRef::Title(title) => network_names(client)?
            .into_iter()
            .find(|n| n.name == *title)
            .map(|n| n.suid)
            .ok_or_else(|| Error::InvalidArgument(format!("no network named {title:?}"))),
        NetworkRef::Suid(suid) => network_names(client)?
            .into_iter()
            .find(|n| n.suid == *suid)
            .map(|n| n.suid)
            .ok_or_else(|| Error::InvalidArgument(format!("no network with SUID {suid}"))),
    }
}

pub fn get_network_name(client: &Client, network: &NetworkRef) -> Result<String, Error> {
    let names = network_names(client)?;
    let found = match network {
        NetworkRef::Title(title) => names.into_iter().find(|n| n.name == *title),
        NetworkRef::Suid(suid) => names.into_iter().find(|n| n.suid == *suid),
        NetworkRef::Current => {
            let suid = current_suid(client)?;
            names.into_iter().find(|n| n.suid == suid)
        }
    };
    found
        .map(|n| n.name)
        .ok_or_else(|| Error::InvalidArgument(format!("no network matching {network:?}")))
}

/// Make a network current. Returns `{}`.
pub fn set_current_network(client: &Client, network: &NetworkRef) -> Result<Value, Error> {
    let suid = get_network_suid(client, network)?;
    client.command(&Command::new("network", "set current").arg("network", suid_arg(suid)))
}

/// Returns `{"network": <suid>, "title": <new_title>}`.
pub fn rename_network(client: &Client, new_title: &str, network: &NetworkRef) -> Result<Value, Error> {
    let suid = get_network_suid(client, network)?;
    client.command(
        &Command::new("network", "rename")
            .arg("name", new_title)
            .arg("sourceNetwork", suid_arg(suid)),
    )
}

pub fn delete_network(client: &Client, network: &NetworkRef) -> Result<(), Error> {
    let suid = get_network_suid(client, network)?;
    client.delete(&format!("networks/{suid}"))?;
    Ok(())
}

pub fn delete_all_networks(client: &Client) -> Result<(), Error> {
    client.delete("networks")?;
    Ok(())
}

pub fn get_node_count(client: &Client, network: &NetworkRef) -> Result<u64, Error> {
    element_count(client, network, "nodes")
}

pub fn get_edge_count(client: &Client, network: &NetworkRef) -> Result<u64, Error> {
    element_count(client, network, "edges")
}

/// Names of every node, from the default node table.
pub fn get_all_nodes(client: &Client, network: &NetworkRef) -> Result<Vec<String>, Error> {
    name_column(client, network, "defaultnode")
}

/// Names of every edge (`"a (pp) b"`), from the default edge table.
pub fn get_all_edges(client: &Client, network: &NetworkRef) -> Result<Vec<String>, Error> {
    name_column(client, network, "defaultedge")
}

/// Load a network file (SIF, GML, xGMML, …) into a new network
/// collection. The path is made absolute against the current directory;
/// `None` loads [`SAMPLE_NETWORK`].
///
/// ```rust,ignore
/// import_network_from_file(&client, Some("data/galFiltered.sif"))?;
/// // {"networks": [131481], "views": [131860]}
/// ```
pub fn import_network_from_file(client: &Client, file: Option<&str>) -> Result<Value, Error> {
    let file = match file {
        Some(f) => path_arg(&absolute(Path::new(f))?),
        None => SAMPLE_NETWORK.to_string(),
    };
    client.command(&Command::new("network", "load file").arg("file", file))
}

/// Copy a network. Returns the SUID of the copy.
pub fn clone_network(client: &Client, network: &NetworkRef) -> Result<u64, Error> {
    let suid = get_network_suid(client, network)?;
    let res = client.command(&Command::new("network", "clone").arg("network", suid_arg(suid)))?;
    new_network_suid(&res)
}

/// Which nodes or edges a command applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Selected,
    Unselected,
    /// Elements whose `column` holds one of `values`.
    ByColumn { column: String, values: Vec<String> },
}

impl Selection {
    pub fn by_column<S: Into<String>>(column: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Selection::ByColumn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `all`, `selected`, `unselected` or `COLUMN:value,COLUMN:value`.
    pub fn render(&self) -> String {
        match self {
            Selection::All => "all".to_string(),
            Selection::Selected => "selected".to_string(),
            Selection::Unselected => "unselected".to_string(),
            Selection::ByColumn { column, values } => values
                .iter()
                .map(|v| format!("{column}:{v}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Create a network from a subset of the nodes and edges of `network`.
/// Returns the SUID of the new network.
///
/// With `exclude_edges`, only edges listed in `edges` are copied; otherwise
/// every edge between copied nodes comes along too.
pub fn create_subnetwork(
    client: &Client,
    nodes: &Selection,
    edges: &Selection,
    exclude_edges: bool,
    name: Option<&str>,
    network: &NetworkRef,
) -> Result<u64, Error> {
    let suid = get_network_suid(client, network)?;
    let command = Command::new("network", "create")
        .arg("source", suid_arg(suid))
        .arg("nodeList", nodes.render())
        .arg("edgeList", edges.render())
        .arg("excludeEdges", exclude_edges)
        .arg_opt("networkName", name);
    let res = client.command(&command)?;
    new_network_suid(&res)
}

/// Add nodes by name. With `skip_duplicate_names`, names already present in
/// the network are left out; if nothing is left, no request is sent.
pub fn add_cy_nodes(
    client: &Client,
    names: &[&str],
    skip_duplicate_names: bool,
    network: &NetworkRef,
) -> Result<Vec<NewNode>, Error> {
    let suid = get_network_suid(client, network)?;
    let names: Vec<&str> = if skip_duplicate_names {
        let existing: HashSet<String> = element_table(client, suid, "defaultnode")?
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        names.iter().copied().filter(|n| !existing.contains(*n)).collect()
    } else {
        names.to_vec()
    };
    if names.is_empty() {
        return Ok(Vec::new());
    }

    decode(client.post(&format!("networks/{suid}/nodes"), Value::from(names))?)
}

/// Add edges between nodes named by `(source, target)` pairs.
///
/// Every name must exist in the network, else [`Error::InvalidArgument`]
/// and nothing is added.
pub fn add_cy_edges(
    client: &Client,
    pairs: &[(&str, &str)],
    edge_type: &str,
    directed: bool,
    network: &NetworkRef,
) -> Result<Vec<NewEdge>, Error> {
    let suid = get_network_suid(client, network)?;
    let table = element_table(client, suid, "defaultnode")?;
    let body = pairs
        .iter()
        .map(|(source, target)| -> Result<EdgeRequest, Error> {
            Ok(EdgeRequest {
                source: suid_of(&table, source, "node")?,
                target: suid_of(&table, target, "node")?,
                directed,
                interaction: edge_type.to_string(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let body = serde_json::to_value(body)
        .map_err(|e| Error::InvalidArgument(format!("cannot encode edges: {e}")))?;

    decode(client.post(&format!("networks/{suid}/edges"), body)?)
}

/// Names of the first neighbors of each node, as `(node, neighbors)`.
///
/// `None` uses the nodes currently selected in Cytoscape. An empty node
/// list gives an empty result.
pub fn get_first_neighbors(
    client: &Client,
    nodes: Option<&[&str]>,
    network: &NetworkRef,
) -> Result<Vec<(String, Vec<String>)>, Error> {
    let suid = get_network_suid(client, network)?;
    let table = element_table(client, suid, "defaultnode")?;

    let node_suids: Vec<u64> = match nodes {
        Some(names) => names
            .iter()
            .map(|n| suid_of(&table, n, "node"))
            .collect::<Result<_, _>>()?,
        None => decode(client.get(&format!("networks/{suid}/nodes/selected"))?)?,
    };

    node_suids
        .into_iter()
        .map(|node| -> Result<(String, Vec<String>), Error> {
            let neighbors: Vec<u64> = decode(client.get(&format!("networks/{suid}/nodes/{node}/neighbors"))?)?;
            let names = neighbors
                .iter()
                .map(|n| name_of(&table, *n))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((name_of(&table, node)?, names))
        })
        .collect()
}

/// [`get_first_neighbors`] flattened into one list without repeats, in
/// first-seen order.
pub fn get_first_neighbor_names(
    client: &Client,
    nodes: Option<&[&str]>,
    network: &NetworkRef,
) -> Result<Vec<String>, Error> {
    let mut seen = HashSet::new();
    Ok(get_first_neighbors(client, nodes, network)?
        .into_iter()
        .flat_map(|(_, neighbors)| neighbors)
        .filter(|n| seen.insert(n.clone()))
        .collect())
}

/// Attributes of each named edge (`SUID`, `source`, `target`, `shared name`
/// and every other edge-table column).
pub fn get_edge_info(client: &Client, edges: &[&str], network: &NetworkRef) -> Result<Vec<Value>, Error> {
    let suid = get_network_suid(client, network)?;
    let table = element_table(client, suid, "defaultedge")?;

    edges
        .iter()
        .map(|edge| -> Result<Value, Error> {
            let edge_suid = suid_of(&table, edge, "edge")?;
            let res = client.get(&format!("networks/{suid}/edges/{edge_suid}"))?;
            Ok(match res {
                Value::Object(mut obj) if obj.contains_key("data") => obj.remove("data").unwrap_or_default(),
                other => other,
            })
        })
        .collect()
}

// --- helpers -----------------------------------------------------------------

fn new_network_suid(res: &Value) -> Result<u64, Error> {
    res.get("network")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::malformed(None, "reply has no network SUID", &res.to_string()))
}

/// `(SUID, name)` of every row of a default node or edge table.
fn element_table(client: &Client, suid: u64, table: &str) -> Result<Vec<(u64, String)>, Error> {
    let suids: ColumnValues = decode(client.get(&format!("networks/{suid}/tables/{table}/columns/SUID"))?)?;
    let names: ColumnValues = decode(client.get(&format!("networks/{suid}/tables/{table}/columns/name"))?)?;
    if suids.values.len() != names.values.len() {
        return Err(Error::malformed(
            None,
            format!("{table} SUID and name columns differ in length"),
            &format!("{} SUIDs, {} names", suids.values.len(), names.values.len()),
        ));
    }

    suids
        .values
        .into_iter()
        .zip(names.values)
        .map(|(id, name)| -> Result<(u64, String), Error> {
            let id = id
                .as_u64()
                .ok_or_else(|| Error::malformed(None, format!("{table} SUID is not an integer"), &id.to_string()))?;
            Ok((id, value_text(name)))
        })
        .collect()
}

fn suid_of(table: &[(u64, String)], name: &str, kind: &str) -> Result<u64, Error> {
    table
        .iter()
        .find(|(_, n)| n == name)
        .map(|(id, _)| *id)
        .ok_or_else(|| Error::InvalidArgument(format!("no {kind} named {name:?}")))
}

fn name_of(table: &[(u64, String)], suid: u64) -> Result<String, Error> {
    table
        .iter()
        .find(|(id, _)| *id == suid)
        .map(|(_, n)| n.clone())
        .ok_or_else(|| Error::malformed(None, "neighbor is missing from the node table", &suid.to_string()))
}

fn value_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn suid_arg(suid: u64) -> String {
    format!("SUID:{suid}")
}

fn network_names(client: &Client) -> Result<Vec<NetworkName>, Error> {
    decode(client.get("networks.names")?)
}

fn current_suid(client: &Client) -> Result<u64, Error> {
    // The CI envelope, when present, is already unwrapped by the client.
    let current: CurrentNetwork = decode(client.get("networks/currentNetwork")?)?;
    Ok(current.network_suid)
}

fn element_count(client: &Client, network: &NetworkRef, kind: &str) -> Result<u64, Error> {
    let suid = get_network_suid(client, network)?;
    let count: Count = decode(client.get(&format!("networks/{suid}/{kind}/count"))?)?;
    Ok(count.count)
}

fn name_column(client: &Client, network: &NetworkRef, table: &str) -> Result<Vec<String>, Error> {
    let suid = get_network_suid(client, network)?;
    let column: ColumnValues = decode(client.get(&format!("networks/{suid}/tables/{table}/columns/name"))?)?;
    Ok(column.values.into_iter().map(value_text).collect())
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
        mock.respond_json(
            Method::GET,
            &format!("{BASE}/networks.names"),
            200,
            &json!([
                { "SUID": 52, "name": "galFiltered.sif" },
                { "SUID": 9001, "name": "yeastHighQuality.sif" }
            ]),
        );
        mock.respond_json(
            Method::GET,
            &format!("{BASE}/networks/currentNetwork"),
            200,
            &json!({ "data": { "networkSUID": 52 }, "errors": [] }),
        );
        let client = Client::with_transport(BaseUrl::parse(BASE).unwrap(), Arc::clone(&mock));
        (client, mock)
    }

    #[test]
    fn aliases_resolve_to_the_same_suid() {
        let (client, _mock) = client();
        let suid = get_network_suid(&client, &NetworkRef::Current).unwrap();
        assert_eq!(suid, 52);
        assert_eq!(get_network_suid(&client, &"current".into()).unwrap(), suid);
        assert_eq!(get_network_suid(&client, &"galFiltered.sif".into()).unwrap(), suid);
        assert_eq!(get_network_suid(&client, &52u64.into()).unwrap(), suid);
    }

    #[test]
    fn bad_titles_and_suids_are_invalid_arguments() {
        let (client, _mock) = client();
        assert!(matches!(
            get_network_suid(&client, &"bad title".into()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            get_network_suid(&client, &500u64.into()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            get_network_name(&client, &500u64.into()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn name_of_current_network() {
        let (client, _mock) = client();
        assert_eq!(get_network_name(&client, &NetworkRef::Current).unwrap(), "galFiltered.sif");
        assert_eq!(get_network_name(&client, &9001u64.into()).unwrap(), "yeastHighQuality.sif");
    }

    #[test]
    fn list_and_count() {
        let (client, mock) = client();
        mock.respond_json(Method::GET, &format!("{BASE}/networks/count"), 200, &json!({ "count": 2 }));
        assert_eq!(get_network_count(&client).unwrap(), 2);
        assert_eq!(
            get_network_list(&client).unwrap(),
            ["galFiltered.sif", "yeastHighQuality.sif"]
        );
    }

    #[test]
    fn set_current_uses_command_gateway_with_suid() {
        let (client, mock) = client();
        let url = format!("{BASE}/commands/network/set/current");
        mock.respond_json(Method::POST, &url, 200, &json!({ "data": {}, "errors": [] }));

        assert_eq!(
            set_current_network(&client, &"yeastHighQuality.sif".into()).unwrap(),
            json!({})
        );
        let last = mock.requests().pop().unwrap();
        assert_eq!(last.url, url);
        assert_eq!(last.body, Some(json!({ "network": "SUID:9001" })));
    }

    #[test]
    fn rename_sends_new_title_and_source() {
        let (client, mock) = client();
        let url = format!("{BASE}/commands/network/rename");
        mock.respond_json(
            Method::POST,
            &url,
            200,
            &json!({ "data": { "network": 52, "title": "newcurrent" }, "errors": [] }),
        );

        let res = rename_network(&client, "newcurrent", &NetworkRef::Current).unwrap();
        assert_eq!(res["title"], "newcurrent");
        let last = mock.requests().pop().unwrap();
        assert_eq!(last.body, Some(json!({ "name": "newcurrent", "sourceNetwork": "SUID:52" })));
    }

    #[test]
    fn delete_uses_rest_delete() {
        let (client, mock) = client();
        mock.respond(Method::DELETE, &format!("{BASE}/networks/9001"), 200, "");
        mock.respond(Method::DELETE, &format!("{BASE}/networks"), 200, "");

        delete_network(&client, &"yeastHighQuality.sif".into()).unwrap();
        delete_all_networks(&client).unwrap();
        assert_eq!(mock.count(&Method::DELETE, &format!("{BASE}/networks/9001")), 1);
        assert_eq!(mock.count(&Method::DELETE, &format!("{BASE}/networks")), 1);
    }

    #[test]
    fn counts_and_names_of_elements() {
        let (client, mock) = client();
        mock.respond_json(Method::GET, &format!("{BASE}/networks/52/nodes/count"), 200, &json!({ "count": 330 }));
        mock.respond_json(Method::GET, &format!("{BASE}/networks/52/edges/count"), 200, &json!({ "count": 359 }));
        mock.respond_json(
            Method::GET,
            &format!("{BASE}/networks/52/tables/defaultedge/columns/name"),
            200,
            &json!({ "name": "name", "values": ["YDL194W (pp) YBR043C"] }),
        );

        assert_eq!(get_node_count(&client, &NetworkRef::Current).unwrap(), 330);
        assert_eq!(get_edge_count(&client, &NetworkRef::Current).unwrap(), 359);
        assert_eq!(
            get_all_edges(&client, &NetworkRef::Current).unwrap(),
            ["YDL194W (pp) YBR043C"]
        );
    }

    fn with_tables(mock: &MockTransport) {
        let column = |table: &str, name: &str, values: Value| {
            mock.respond_json(
                Method::GET,
                &format!("{BASE}/networks/52/tables/{table}/columns/{name}"),
                200,
                &json!({ "name": name, "values": values }),
            );
        };
        column("defaultnode", "SUID", json!([100, 101, 102, 103]));
        column("defaultnode", "name", json!(["YBR020W", "YGL035C", "YOL051W", "MIG1"]));
        column("defaultedge", "SUID", json!([200, 201]));
        column("defaultedge", "name", json!(["YBR020W (pp) YGL035C", "YGL035C (pp) YOL051W"]));
    }

    fn ci_ok(mock: &MockTransport, command: &str, data: Value) {
        mock.respond_json(
            Method::POST,
            &format!("{BASE}/commands/{command}"),
            200,
            &json!({ "data": data, "errors": [] }),
        );
    }

    #[test]
    fn import_sends_absolute_path_or_sample() {
        let (client, mock) = client();
        ci_ok(&mock, "network/load/file", json!({ "networks": [131481], "views": [131860] }));

        let res = import_network_from_file(&client, Some("data/galFiltered.sif")).unwrap();
        assert_eq!(res["networks"], json!([131481]));
        import_network_from_file(&client, None).unwrap();

        let bodies: Vec<Value> = mock.requests().into_iter().filter_map(|r| r.body).collect();
        let file = bodies[0]["file"].as_str().unwrap();
        assert!(Path::new(file).is_absolute());
        assert!(file.ends_with("galFiltered.sif"));
        assert_eq!(bodies[1], json!({ "file": SAMPLE_NETWORK }));
    }

    #[test]
    fn clone_returns_suid_of_copy() {
        let (client, mock) = client();
        ci_ok(&mock, "network/clone", json!({ "network": 1234 }));

        assert_eq!(clone_network(&client, &NetworkRef::Current).unwrap(), 1234);
        let last = mock.requests().pop().unwrap();
        assert_eq!(last.body, Some(json!({ "network": "SUID:52" })));
    }

    #[test]
    fn clone_reply_without_suid_is_malformed() {
        let (client, mock) = client();
        ci_ok(&mock, "network/clone", json!({}));
        assert!(matches!(
            clone_network(&client, &NetworkRef::Current),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn selections_render_as_command_lists() {
        assert_eq!(Selection::All.render(), "all");
        assert_eq!(Selection::Selected.render(), "selected");
        assert_eq!(Selection::Unselected.render(), "unselected");
        assert_eq!(
            Selection::by_column("COMMON", ["RAP1", "HIS4"]).render(),
            "COMMON:RAP1,COMMON:HIS4"
        );
    }

    #[test]
    fn create_subnetwork_uses_command_gateway() {
        let (client, mock) = client();
        ci_ok(&mock, "network/create", json!({ "network": 77 }));

        let suid = create_subnetwork(
            &client,
            &Selection::by_column("COMMON", ["RAP1", "HIS4"]),
            &Selection::All,
            false,
            Some("galFiltered.sifxx"),
            &52u64.into(),
        )
        .unwrap();
        assert_eq!(suid, 77);

        let last = mock.requests().pop().unwrap();
        assert_eq!(last.url, format!("{BASE}/commands/network/create"));
        assert_eq!(
            last.body,
            Some(json!({
                "source": "SUID:52",
                "nodeList": "COMMON:RAP1,COMMON:HIS4",
                "edgeList": "all",
                "excludeEdges": "false",
                "networkName": "galFiltered.sifxx",
            }))
        );
    }

    #[test]
    fn add_nodes_posts_names_skipping_duplicates() {
        let (client, mock) = client();
        with_tables(&mock);
        let url = format!("{BASE}/networks/52/nodes");
        mock.respond_json(Method::POST, &url, 200, &json!([{ "name": "newnode1", "SUID": 9100 }]));

        let added = add_cy_nodes(&client, &["MIG1", "newnode1"], true, &NetworkRef::Current).unwrap();
        assert_eq!(added, [NewNode { name: "newnode1".into(), suid: 9100 }]);
        assert_eq!(mock.requests().pop().unwrap().body, Some(json!(["newnode1"])));

        let none = add_cy_nodes(&client, &["MIG1", "YBR020W"], true, &NetworkRef::Current).unwrap();
        assert!(none.is_empty());
        assert_eq!(mock.count(&Method::POST, &url), 1);
    }

    #[test]
    fn add_nodes_without_skipping_sends_everything() {
        let (client, mock) = client();
        let url = format!("{BASE}/networks/52/nodes");
        mock.respond_json(
            Method::POST,
            &url,
            200,
            &json!([{ "name": "MIG1", "SUID": 9101 }, { "name": "x", "SUID": 9102 }]),
        );

        let added = add_cy_nodes(&client, &["MIG1", "x"], false, &NetworkRef::Current).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(mock.requests().pop().unwrap().body, Some(json!(["MIG1", "x"])));
    }

    #[test]
    fn add_edges_resolves_names_to_suids() {
        let (client, mock) = client();
        with_tables(&mock);
        let url = format!("{BASE}/networks/52/edges");
        mock.respond_json(Method::POST, &url, 200, &json!([{ "SUID": 9200, "source": 100, "target": 103 }]));

        let added = add_cy_edges(&client, &[("YBR020W", "MIG1")], DEFAULT_EDGE_TYPE, false, &NetworkRef::Current).unwrap();
        assert_eq!(added, [NewEdge { suid: 9200, source: 100, target: 103 }]);

        let last = mock.requests().pop().unwrap();
        assert_eq!(last.method, Method::POST);
        assert_eq!(
            last.body,
            Some(json!([{ "source": 100, "target": 103, "directed": false, "interaction": "interacts with" }]))
        );
    }

    #[test]
    fn add_edges_with_unknown_node_sends_nothing() {
        let (client, mock) = client();
        with_tables(&mock);

        let err = add_cy_edges(&client, &[("YBR020W", "nope")], DEFAULT_EDGE_TYPE, true, &NetworkRef::Current).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
        assert_eq!(mock.count(&Method::POST, &format!("{BASE}/networks/52/edges")), 0);
    }

    #[test]
    fn first_neighbors_nested_and_flat() {
        let (client, mock) = client();
        with_tables(&mock);
        mock.respond_json(Method::GET, &format!("{BASE}/networks/52/nodes/100/neighbors"), 200, &json!([101, 102]));
        mock.respond_json(Method::GET, &format!("{BASE}/networks/52/nodes/101/neighbors"), 200, &json!([100, 102]));

        let nested = get_first_neighbors(&client, Some(&["YBR020W", "YGL035C"]), &NetworkRef::Current).unwrap();
        assert_eq!(
            nested,
            [
                ("YBR020W".to_string(), vec!["YGL035C".to_string(), "YOL051W".to_string()]),
                ("YGL035C".to_string(), vec!["YBR020W".to_string(), "YOL051W".to_string()]),
            ]
        );

        let flat = get_first_neighbor_names(&client, Some(&["YBR020W", "YGL035C"]), &NetworkRef::Current).unwrap();
        assert_eq!(flat, ["YGL035C", "YOL051W", "YBR020W"]);

        assert!(get_first_neighbors(&client, Some(&[]), &NetworkRef::Current).unwrap().is_empty());
    }

    #[test]
    fn first_neighbors_of_empty_selection() {
        let (client, mock) = client();
        with_tables(&mock);
        mock.respond_json(Method::GET, &format!("{BASE}/networks/52/nodes/selected"), 200, &json!([]));

        assert!(get_first_neighbors(&client, None, &NetworkRef::Current).unwrap().is_empty());
        assert_eq!(mock.count(&Method::GET, &format!("{BASE}/networks/52/nodes/selected")), 1);
    }

    #[test]
    fn edge_info_unwraps_data_per_edge() {
        let (client, mock) = client();
        with_tables(&mock);
        mock.respond_json(
            Method::GET,
            &format!("{BASE}/networks/52/edges/200"),
            200,
            &json!({ "data": {
                "SUID": 200, "source": 100, "target": 101,
                "shared name": "YBR020W (pp) YGL035C", "EdgeBetweenness": 496.0
            } }),
        );

        let info = get_edge_info(&client, &["YBR020W (pp) YGL035C"], &NetworkRef::Current).unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0]["SUID"], 200);
        assert_eq!(info[0]["source"], 100);
        assert_eq!(info[0]["shared name"], "YBR020W (pp) YGL035C");

        assert!(matches!(
            get_edge_info(&client, &["junk"], &NetworkRef::Current),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn current_network_without_envelope_is_accepted() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(Method::GET, &format!("{BASE}/networks/currentNetwork"), 200, &json!({ "networkSUID": 7 }));
        let client = Client::with_transport(BaseUrl::parse(BASE).unwrap(), Arc::clone(&mock));
        assert_eq!(get_network_suid(&client, &NetworkRef::Current).unwrap(), 7);
    }
}
