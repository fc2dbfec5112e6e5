//! Statistics records returned by the analytics engine.

use std::collections::BTreeMap;

use lit_graph_core::{EdgeType, NodeType};
use serde::{Deserialize, Serialize};

/// Full statistics snapshot for a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub nodes: NodeStats,
    pub edges: EdgeStats,
    pub connectivity: ConnectivityStats,
    pub content: ContentStats,
    pub temporal: TemporalStats,
}

impl GraphStats {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStats {
    pub total: usize,
    pub by_type: BTreeMap<NodeType, usize>,
    pub with_images: usize,
    pub with_descriptions: usize,
    pub with_series: usize,
}

/// A node and its undirected connection count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConnections {
    pub node_id: String,
    pub label: String,
    pub node_type: NodeType,
    pub connections: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStats {
    pub total: usize,
    pub by_type: BTreeMap<EdgeType, usize>,
    /// Edges with at least one endpoint missing from the node set.
    pub dangling: usize,
    pub most_connected: Vec<NodeConnections>,
    pub least_connected: Vec<NodeConnections>,
    /// Connection increments divided by the number of connected nodes.
    pub average_connections: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityStats {
    pub average_degree: f64,
    pub density: f64,
    /// Number of connected components.
    pub clusters: usize,
    pub isolated_nodes: usize,
}

/// A label with an occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// A node ranked by some count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedNode {
    pub node_id: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub series_distribution: Vec<LabelCount>,
    pub top_themes: Vec<RankedNode>,
    pub top_authors: Vec<RankedNode>,
    pub top_genres: Vec<RankedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecadeCount {
    pub decade: i64,
    /// Display label such as `"1940s"`.
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalStats {
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
    /// `latest - earliest`, or 0 when no node has a year.
    pub year_range: i64,
    pub nodes_with_year: usize,
    pub decades: Vec<DecadeCount>,
}
