//! Statistics computation.

use std::collections::{BTreeMap, HashMap, HashSet};

use lit_graph_core::{Edge, Node, NodeType};
use tracing::debug;

use crate::types::{
    ConnectivityStats, ContentStats, DecadeCount, EdgeStats, GraphStats, LabelCount,
    NodeConnections, NodeStats, RankedNode, TemporalStats,
};
use crate::{CONNECTION_RANK_LIMIT, CONTENT_RANK_LIMIT};

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Counts keyed by a borrowed key, remembering first-seen order so that
/// stable sorts break ties by iteration order.
struct OrderedCounts<'a> {
    order: Vec<&'a str>,
    counts: HashMap<&'a str, usize>,
}

impl<'a> OrderedCounts<'a> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn add(&mut self, key: &'a str) {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.order.push(key);
                self.counts.insert(key, 1);
            }
        }
    }

    fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Keys sorted by descending count; ties keep first-seen order.
    fn ranked(&self) -> Vec<(&'a str, usize)> {
        let mut ranked: Vec<_> = self.order.iter().map(|&k| (k, self.counts[k])).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Read-only view of one `(nodes, edges)` snapshot with id resolution.
struct Snapshot<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
    index: HashMap<&'a str, usize>,
}

impl<'a> Snapshot<'a> {
    fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(i);
        }
        Self {
            nodes,
            edges,
            index,
        }
    }

    fn resolve(&self, id: &str) -> Option<&'a Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn is_valid(&self, edge: &Edge) -> bool {
        self.index.contains_key(edge.source.as_str()) && self.index.contains_key(edge.target.as_str())
    }

    /// Per-node undirected connection counts. Each edge increments each
    /// endpoint that exists in the node set.
    fn connection_counts(&self) -> OrderedCounts<'a> {
        let mut counts = OrderedCounts::new();
        for edge in self.edges {
            for endpoint in [edge.source.as_str(), edge.target.as_str()] {
                if let Some(node) = self.resolve(endpoint) {
                    counts.add(node.id.as_str());
                }
            }
        }
        counts
    }
}

/// Compute the full statistics snapshot for a graph.
///
/// Total for every input: empty graphs yield zeros and empty lists, ratios
/// with a zero denominator yield 0, and dangling edges are ignored for the
/// missing endpoint.
pub fn calculate_graph_stats(nodes: &[Node], edges: &[Edge]) -> GraphStats {
    let snapshot = Snapshot::new(nodes, edges);
    let connections = snapshot.connection_counts();

    let stats = GraphStats {
        nodes: node_stats(&snapshot),
        edges: edge_stats(&snapshot, &connections),
        connectivity: connectivity_stats(&snapshot),
        content: content_stats(&snapshot, &connections),
        temporal: temporal_stats(&snapshot),
    };

    debug!(
        nodes = stats.nodes.total,
        edges = stats.edges.total,
        clusters = stats.connectivity.clusters,
        "Calculated graph stats"
    );

    stats
}

fn node_stats(snapshot: &Snapshot<'_>) -> NodeStats {
    let mut by_type = BTreeMap::new();
    for node in snapshot.nodes {
        *by_type.entry(node.node_type).or_insert(0) += 1;
    }
    NodeStats {
        total: snapshot.nodes.len(),
        by_type,
        with_images: snapshot.nodes.iter().filter(|n| n.metadata.has_image()).count(),
        with_descriptions: snapshot
            .nodes
            .iter()
            .filter(|n| n.metadata.has_description())
            .count(),
        with_series: snapshot
            .nodes
            .iter()
            .filter(|n| n.metadata.series().is_some())
            .count(),
    }
}

fn edge_stats(snapshot: &Snapshot<'_>, connections: &OrderedCounts<'_>) -> EdgeStats {
    let mut by_type = BTreeMap::new();
    for edge in snapshot.edges {
        *by_type.entry(edge.edge_type).or_insert(0) += 1;
    }

    let ranked: Vec<NodeConnections> = connections
        .ranked()
        .into_iter()
        .filter_map(|(id, count)| {
            let node = snapshot.resolve(id)?;
            Some(NodeConnections {
                node_id: node.id.clone(),
                label: node.label.clone(),
                node_type: node.node_type,
                connections: count,
            })
        })
        .collect();

    // Both lists slice the same ordering, so small graphs may list a node in both.
    let most_connected = ranked.iter().take(CONNECTION_RANK_LIMIT).cloned().collect();
    let least_connected = ranked.iter().rev().take(CONNECTION_RANK_LIMIT).cloned().collect();

    let increments: usize = connections.counts.values().sum();

    EdgeStats {
        total: snapshot.edges.len(),
        by_type,
        dangling: snapshot.edges.iter().filter(|e| !snapshot.is_valid(e)).count(),
        most_connected,
        least_connected,
        average_connections: ratio(increments as f64, connections.order.len() as f64),
    }
}

/// Undirected adjacency sets indexed by node position. Dangling edges are skipped.
fn adjacency(snapshot: &Snapshot<'_>) -> Vec<HashSet<usize>> {
    let mut adjacency = vec![HashSet::new(); snapshot.nodes.len()];
    for edge in snapshot.edges {
        if let (Some(&s), Some(&t)) = (
            snapshot.index.get(edge.source.as_str()),
            snapshot.index.get(edge.target.as_str()),
        ) {
            adjacency[s].insert(t);
            adjacency[t].insert(s);
        }
    }
    adjacency
}

/// Number of connected components, counted as depth-first launches from
/// unvisited roots. Every node is visited exactly once.
fn components(adjacency: &[HashSet<usize>]) -> usize {
    let mut visited = vec![false; adjacency.len()];
    let mut stack = Vec::new();
    let mut launches = 0;

    for root in 0..adjacency.len() {
        if visited[root] {
            continue;
        }
        launches += 1;
        visited[root] = true;
        stack.push(root);

        while let Some(current) = stack.pop() {
            for &neighbor in &adjacency[current] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }
    }

    launches
}

/// Number of connected components in the graph.
pub fn count_clusters(nodes: &[Node], edges: &[Edge]) -> usize {
    components(&adjacency(&Snapshot::new(nodes, edges)))
}

fn connectivity_stats(snapshot: &Snapshot<'_>) -> ConnectivityStats {
    let adjacency = adjacency(snapshot);
    let n = snapshot.nodes.len() as f64;
    let total_degree: usize = adjacency.iter().map(HashSet::len).sum();
    let valid_edges = snapshot.edges.iter().filter(|e| snapshot.is_valid(e)).count();
    let max_edges = if n <= 1.0 { 0.0 } else { n * (n - 1.0) / 2.0 };

    ConnectivityStats {
        average_degree: ratio(total_degree as f64, n),
        density: ratio(valid_edges as f64, max_edges),
        clusters: components(&adjacency),
        isolated_nodes: adjacency.iter().filter(|set| set.is_empty()).count(),
    }
}

fn rank_nodes_of_type(
    snapshot: &Snapshot<'_>,
    connections: &OrderedCounts<'_>,
    node_type: NodeType,
) -> Vec<RankedNode> {
    connections
        .ranked()
        .into_iter()
        .filter_map(|(id, count)| {
            let node = snapshot.resolve(id)?;
            (node.node_type == node_type).then(|| RankedNode {
                node_id: node.id.clone(),
                label: node.label.clone(),
                count,
            })
        })
        .take(CONTENT_RANK_LIMIT)
        .collect()
}

fn content_stats(snapshot: &Snapshot<'_>, connections: &OrderedCounts<'_>) -> ContentStats {
    let mut series = OrderedCounts::new();
    for node in snapshot.nodes {
        if let Some(name) = node.metadata.series() {
            series.add(name);
        }
    }
    let series_distribution = series
        .ranked()
        .into_iter()
        .take(CONTENT_RANK_LIMIT)
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();

    // An edge counts toward an author only when one endpoint is a book.
    let mut authors = OrderedCounts::new();
    for edge in snapshot.edges {
        let source = snapshot.resolve(&edge.source);
        let target = snapshot.resolve(&edge.target);
        let touches_book = [source, target]
            .iter()
            .flatten()
            .any(|n| n.node_type == NodeType::Book);
        if !touches_book {
            continue;
        }
        for node in [source, target].into_iter().flatten() {
            if node.node_type == NodeType::Author {
                authors.add(node.id.as_str());
            }
        }
    }
    let top_authors = authors
        .ranked()
        .into_iter()
        .take(CONTENT_RANK_LIMIT)
        .filter_map(|(id, count)| {
            let node = snapshot.resolve(id)?;
            Some(RankedNode {
                node_id: node.id.clone(),
                label: node.label.clone(),
                count,
            })
        })
        .collect();

    ContentStats {
        series_distribution,
        top_themes: rank_nodes_of_type(snapshot, connections, NodeType::Theme),
        top_authors,
        top_genres: rank_nodes_of_type(snapshot, connections, NodeType::Genre),
    }
}

fn temporal_stats(snapshot: &Snapshot<'_>) -> TemporalStats {
    let years: Vec<i32> = snapshot
        .nodes
        .iter()
        .filter_map(|n| n.metadata.publication_year())
        .collect();

    let earliest_year = years.iter().copied().min();
    let latest_year = years.iter().copied().max();
    let year_range = match (earliest_year, latest_year) {
        (Some(earliest), Some(latest)) => i64::from(latest) - i64::from(earliest),
        _ => 0,
    };

    // i64 so decades of years near the i32 bounds stay representable.
    let mut decades: BTreeMap<i64, usize> = BTreeMap::new();
    for &year in &years {
        *decades.entry(i64::from(year).div_euclid(10) * 10).or_insert(0) += 1;
    }

    TemporalStats {
        earliest_year,
        latest_year,
        year_range,
        nodes_with_year: years.len(),
        decades: decades
            .into_iter()
            .map(|(decade, count)| DecadeCount {
                decade,
                label: format!("{decade}s"),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lit_graph_core::{EdgeType, NodeMetadata};

    fn node(id: &str, node_type: NodeType) -> Node {
        Node::new(id, node_type, id.to_uppercase())
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge::new(id, source, target, EdgeType::Related)
    }

    #[test]
    fn test_empty_graph_is_all_zero() {
        let stats = calculate_graph_stats(&[], &[]);
        assert_eq!(stats.nodes.total, 0);
        assert_eq!(stats.connectivity.clusters, 0);
        assert_eq!(stats.connectivity.density, 0.0);
        assert_eq!(stats.connectivity.average_degree, 0.0);
        assert_eq!(stats.edges.average_connections, 0.0);
        assert!(stats.edges.most_connected.is_empty());
        assert_eq!(stats.temporal.earliest_year, None);
        assert_eq!(stats.temporal.year_range, 0);
    }

    fn dated(id: &str, year: i32) -> Node {
        node(id, NodeType::Book).with_metadata(NodeMetadata::book(Some(year), None))
    }

    #[test]
    fn test_year_range_spans_extreme_years() {
        let nodes = vec![dated("old", -2_000_000_000), dated("new", 2_000_000_000)];
        let stats = calculate_graph_stats(&nodes, &[]);
        assert_eq!(stats.temporal.year_range, 4_000_000_000);
        assert_eq!(stats.temporal.earliest_year, Some(-2_000_000_000));
        assert_eq!(stats.temporal.latest_year, Some(2_000_000_000));
    }

    #[test]
    fn test_decades_at_i32_bounds() {
        let nodes = vec![dated("min", i32::MIN), dated("max", i32::MAX)];
        let stats = calculate_graph_stats(&nodes, &[]);
        let decades: Vec<i64> = stats.temporal.decades.iter().map(|d| d.decade).collect();
        assert_eq!(decades, vec![-2_147_483_650, 2_147_483_640]);
        assert_eq!(stats.temporal.decades[0].label, "-2147483650s");
        assert_eq!(stats.temporal.year_range, i64::from(i32::MAX) - i64::from(i32::MIN));
    }

    #[test]
    fn test_single_node_density_guarded() {
        let stats = calculate_graph_stats(&[node("a", NodeType::Book)], &[]);
        assert_eq!(stats.connectivity.density, 0.0);
        assert_eq!(stats.connectivity.clusters, 1);
        assert_eq!(stats.connectivity.isolated_nodes, 1);
    }

    #[test]
    fn test_ties_keep_iteration_order() {
        let nodes = vec![
            node("a", NodeType::Book),
            node("b", NodeType::Book),
            node("c", NodeType::Book),
            node("d", NodeType::Book),
        ];
        let edges = vec![edge("1", "b", "a"), edge("2", "c", "d")];
        let stats = calculate_graph_stats(&nodes, &edges);
        let most: Vec<_> = stats.edges.most_connected.iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(most, vec!["b", "a", "c", "d"]);
        let least: Vec<_> = stats.edges.least_connected.iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(least, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_average_connections_excludes_unconnected() {
        let nodes = vec![
            node("a", NodeType::Book),
            node("b", NodeType::Book),
            node("lonely", NodeType::Book),
        ];
        let stats = calculate_graph_stats(&nodes, &[edge("1", "a", "b")]);
        assert_eq!(stats.edges.average_connections, 1.0);
        assert!((stats.connectivity.average_degree - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dangling_edge_counts_present_endpoint_only() {
        let nodes = vec![node("a", NodeType::Book)];
        let stats = calculate_graph_stats(&nodes, &[edge("1", "a", "ghost")]);
        assert_eq!(stats.edges.total, 1);
        assert_eq!(stats.edges.dangling, 1);
        assert_eq!(stats.edges.most_connected[0].connections, 1);
        assert_eq!(stats.connectivity.isolated_nodes, 1);
        assert_eq!(stats.connectivity.density, 0.0);
    }

    #[test]
    fn test_top_authors_require_book_endpoint() {
        let nodes = vec![
            node("b1", NodeType::Book),
            node("b2", NodeType::Book),
            node("austen", NodeType::Author),
            node("bronte", NodeType::Author),
        ];
        let edges = vec![
            edge("1", "b1", "austen"),
            edge("2", "austen", "b2"),
            edge("3", "bronte", "austen"),
            edge("4", "bronte", "b2"),
        ];
        let stats = calculate_graph_stats(&nodes, &edges);
        let authors: Vec<_> = stats
            .content
            .top_authors
            .iter()
            .map(|r| (r.node_id.as_str(), r.count))
            .collect();
        assert_eq!(authors, vec![("austen", 2), ("bronte", 1)]);
    }

    #[test]
    fn test_series_and_decades() {
        let nodes = vec![
            node("a", NodeType::Book).with_metadata(NodeMetadata::book(Some(1937), Some("Middle-earth"))),
            node("b", NodeType::Book).with_metadata(NodeMetadata::book(Some(1954), Some("Middle-earth"))),
            node("c", NodeType::Book).with_metadata(NodeMetadata::book(Some(1955), Some("Narnia"))),
            node("d", NodeType::Book),
        ];
        let stats = calculate_graph_stats(&nodes, &[]);
        assert_eq!(stats.nodes.with_series, 3);
        assert_eq!(stats.content.series_distribution[0].label, "Middle-earth");
        assert_eq!(stats.content.series_distribution[0].count, 2);
        assert_eq!(stats.temporal.earliest_year, Some(1937));
        assert_eq!(stats.temporal.latest_year, Some(1955));
        assert_eq!(stats.temporal.year_range, 18);
        let decades: Vec<_> = stats
            .temporal
            .decades
            .iter()
            .map(|d| (d.label.as_str(), d.count))
            .collect();
        assert_eq!(decades, vec![("1930s", 1), ("1950s", 2)]);
    }

    #[test]
    fn test_negative_years_floor_to_decade() {
        let nodes = vec![node("iliad", NodeType::Book)
            .with_metadata(NodeMetadata::book(Some(-762), None))];
        let stats = calculate_graph_stats(&nodes, &[]);
        assert_eq!(stats.temporal.decades[0].decade, -770);
        assert_eq!(stats.temporal.decades[0].label, "-770s");
    }

    #[test]
    fn test_top_themes_ranked_by_connections() {
        let nodes = vec![
            node("b1", NodeType::Book),
            node("b2", NodeType::Book),
            node("love", NodeType::Theme),
            node("war", NodeType::Theme),
            node("unused", NodeType::Theme),
        ];
        let edges = vec![
            edge("1", "b1", "war"),
            edge("2", "b1", "love"),
            edge("3", "b2", "love"),
        ];
        let stats = calculate_graph_stats(&nodes, &edges);
        let themes: Vec<_> = stats
            .content
            .top_themes
            .iter()
            .map(|r| (r.node_id.as_str(), r.count))
            .collect();
        assert_eq!(themes, vec![("love", 2), ("war", 1)]);
    }
}
