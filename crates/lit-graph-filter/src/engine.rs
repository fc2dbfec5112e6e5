//! Criterion evaluation and AND composition.

use std::collections::HashSet;

use lit_graph_analytics::{calculate_graph_stats, GraphStats};
use lit_graph_core::{Graph, Node};
use tracing::debug;

use crate::criteria::{FilterCriterion, FilterKind, KeywordMatch, SeriesMode};

/// Evaluate one criterion against a node. Disabled criteria pass.
pub fn evaluate(node: &Node, criterion: &FilterCriterion) -> bool {
    !criterion.enabled || matches(node, &criterion.kind)
}

/// Test a node against a criterion kind, ignoring the enabled flag.
pub fn matches(node: &Node, kind: &FilterKind) -> bool {
    match kind {
        FilterKind::NodeType { types } => types.is_empty() || types.contains(&node.node_type),

        FilterKind::PublicationYear(filter) => node
            .metadata
            .publication_year()
            .is_some_and(|year| filter.matches(year)),

        FilterKind::Series { mode, values } => {
            let values: Vec<String> = values
                .iter()
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect();
            if values.is_empty() {
                return true;
            }
            let listed = node
                .metadata
                .series()
                .is_some_and(|series| values.contains(&series.to_lowercase()));
            match mode {
                SeriesMode::Include => listed,
                SeriesMode::Exclude => !listed,
            }
        }

        FilterKind::Description {
            keywords,
            match_mode,
            case_sensitive,
        } => {
            let fold = |s: &str| {
                if *case_sensitive {
                    s.to_string()
                } else {
                    s.to_lowercase()
                }
            };
            let keywords: Vec<String> = keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(fold)
                .collect();
            if keywords.is_empty() {
                return true;
            }
            let Some(description) = node.metadata.description() else {
                return false;
            };
            let haystack = fold(description);
            match match_mode {
                KeywordMatch::Any => keywords.iter().any(|k| haystack.contains(k.as_str())),
                KeywordMatch::All => keywords.iter().all(|k| haystack.contains(k.as_str())),
            }
        }
    }
}

/// True iff the node passes every enabled criterion.
pub fn passes_all(node: &Node, criteria: &[FilterCriterion]) -> bool {
    criteria.iter().all(|criterion| evaluate(node, criterion))
}

/// Nodes that pass every enabled criterion, in input order.
pub fn filter_nodes<'a>(nodes: &'a [Node], criteria: &[FilterCriterion]) -> Vec<&'a Node> {
    let visible: Vec<&Node> = nodes.iter().filter(|n| passes_all(n, criteria)).collect();
    debug!(
        criteria = criteria.iter().filter(|c| c.enabled).count(),
        total = nodes.len(),
        visible = visible.len(),
        "Filtered nodes"
    );
    visible
}

/// The filtered view of a graph: visible nodes plus the edges whose
/// endpoints are both visible.
pub fn filter_graph(graph: &Graph, criteria: &[FilterCriterion]) -> Graph {
    let nodes: Vec<Node> = filter_nodes(&graph.nodes, criteria)
        .into_iter()
        .cloned()
        .collect();
    let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
        .cloned()
        .collect();
    Graph::new(nodes, edges)
}

/// Statistics over the filtered view of a graph.
pub fn calculate_filtered_stats(graph: &Graph, criteria: &[FilterCriterion]) -> GraphStats {
    let view = filter_graph(graph, criteria);
    calculate_graph_stats(&view.nodes, &view.edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::YearFilter;
    use lit_graph_core::{NodeMetadata, NodeType};

    fn book(id: &str, year: Option<i32>, series: Option<&str>) -> Node {
        Node::new(id, NodeType::Book, id).with_metadata(NodeMetadata::book(year, series))
    }

    #[test]
    fn test_missing_year_is_excluded() {
        let criterion = FilterCriterion::publication_year("y", YearFilter::After(1900));
        assert!(!evaluate(&book("a", None, None), &criterion));
        assert!(evaluate(&book("b", Some(1901), None), &criterion));
    }

    #[test]
    fn test_disabled_criterion_passes() {
        let criterion =
            FilterCriterion::publication_year("y", YearFilter::Exact(1)).enabled(false);
        assert!(evaluate(&book("a", None, None), &criterion));
    }

    #[test]
    fn test_empty_type_list_passes() {
        let criterion = FilterCriterion::node_types("t", []);
        assert!(evaluate(&Node::new("x", NodeType::Theme, "X"), &criterion));
    }

    #[test]
    fn test_series_include_and_exclude() {
        let include = FilterCriterion::series("s", SeriesMode::Include, ["  discworld "]);
        let exclude = FilterCriterion::series("s", SeriesMode::Exclude, ["Discworld"]);
        let in_series = book("a", None, Some("Discworld"));
        let standalone = book("b", None, None);

        assert!(evaluate(&in_series, &include));
        assert!(!evaluate(&standalone, &include));
        assert!(!evaluate(&in_series, &exclude));
        assert!(evaluate(&standalone, &exclude));
    }

    #[test]
    fn test_description_keywords() {
        let node = Node::new("a", NodeType::Book, "A").with_metadata(
            NodeMetadata::default().with_description("A whaling voyage and an obsession."),
        );
        let any = FilterCriterion::description("d", ["WHALING", "dragon"], KeywordMatch::Any, false);
        let all = FilterCriterion::description("d", ["whaling", "dragon"], KeywordMatch::All, false);
        let sensitive =
            FilterCriterion::description("d", ["Whaling"], KeywordMatch::Any, true);

        assert!(evaluate(&node, &any));
        assert!(!evaluate(&node, &all));
        assert!(!evaluate(&node, &sensitive));
        assert!(!evaluate(&Node::new("b", NodeType::Book, "B"), &any));
    }
}
