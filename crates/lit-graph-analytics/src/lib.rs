//! Graph analytics for lit-graph.
//!
//! Every function here is a pure, total function of a `(nodes, edges)`
//! snapshot: no mutation, no dependence on layout state, and well-defined
//! zero/empty results for degenerate input. Shared borrows of the node and
//! edge slices guarantee the snapshot stays stable for the duration of a call.
//!
//! ```rust
//! use lit_graph_analytics::calculate_graph_stats;
//! use lit_graph_core::{Edge, EdgeType, Node, NodeType};
//!
//! let nodes = vec![
//!     Node::new("a", NodeType::Book, "A"),
//!     Node::new("b", NodeType::Author, "B").with_depth(1),
//! ];
//! let edges = vec![Edge::new("ab", "a", "b", EdgeType::WrittenBy)];
//! let stats = calculate_graph_stats(&nodes, &edges);
//! assert_eq!(stats.connectivity.clusters, 1);
//! ```

mod compute;
mod export;
mod types;

pub use compute::{calculate_graph_stats, count_clusters};
pub use export::{read_csv_sections, CsvSection};
pub use types::{
    ConnectivityStats, ContentStats, DecadeCount, EdgeStats, GraphStats, LabelCount,
    NodeConnections, NodeStats, RankedNode, TemporalStats,
};

/// Number of entries kept in the most/least connected lists.
pub const CONNECTION_RANK_LIMIT: usize = 5;

/// Number of entries kept in content rankings.
pub const CONTENT_RANK_LIMIT: usize = 10;
