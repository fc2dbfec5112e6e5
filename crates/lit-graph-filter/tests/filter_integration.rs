//! Integration tests for filter composition and preset persistence.

use lit_graph_core::{Edge, EdgeType, Graph, Node, NodeMetadata, NodeType};
use lit_graph_filter::{
    calculate_filtered_stats, evaluate, filter_graph, filter_nodes, passes_all, FileStore,
    FilterCriterion, KeyValueStore, KeywordMatch, MemoryStore, PresetManager, PresetUpdate,
    SeriesMode, YearFilter, PRESETS_KEY,
};

// ============================================================================
// Fixtures
// ============================================================================

fn shelf() -> Graph {
    Graph::new(
        vec![
            Node::new("emma", NodeType::Book, "Emma").with_metadata(
                NodeMetadata::book(Some(1815), None)
                    .with_description("A comedy of manners about matchmaking."),
            ),
            Node::new("dune", NodeType::Book, "Dune").with_metadata(
                NodeMetadata::book(Some(1965), Some("Dune"))
                    .with_description("Desert planet politics and ecology."),
            ),
            Node::new("messiah", NodeType::Book, "Dune Messiah")
                .with_metadata(NodeMetadata::book(Some(1969), Some("Dune"))),
            Node::new("undated", NodeType::Book, "Undated Manuscript"),
            Node::new("herbert", NodeType::Author, "Frank Herbert").with_depth(1),
            Node::new("austen", NodeType::Author, "Jane Austen").with_depth(1),
        ],
        vec![
            Edge::new("e1", "dune", "herbert", EdgeType::WrittenBy),
            Edge::new("e2", "messiah", "herbert", EdgeType::WrittenBy),
            Edge::new("e3", "emma", "austen", EdgeType::WrittenBy),
            Edge::new("e4", "dune", "messiah", EdgeType::SimilarTo),
        ],
    )
}

fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_no_criteria_keeps_everything() {
    let graph = shelf();
    assert_eq!(filter_nodes(&graph.nodes, &[]).len(), graph.nodes.len());

    let disabled = vec![
        FilterCriterion::node_types("t", [NodeType::Genre]).enabled(false),
        FilterCriterion::publication_year("y", YearFilter::Exact(1)).enabled(false),
    ];
    assert_eq!(filter_nodes(&graph.nodes, &disabled).len(), graph.nodes.len());
}

#[test]
fn test_and_composition_matches_individual_results() {
    let graph = shelf();
    let criteria = vec![
        FilterCriterion::node_types("books", [NodeType::Book]),
        FilterCriterion::publication_year("after-1900", YearFilter::After(1900)),
        FilterCriterion::series("dune", SeriesMode::Include, ["dune"]),
        FilterCriterion::description("eco", ["ecology"], KeywordMatch::Any, false)
            .enabled(false),
    ];

    for node in &graph.nodes {
        let individually = criteria.iter().all(|c| evaluate(node, c));
        assert_eq!(passes_all(node, &criteria), individually, "node {}", node.id);
    }
    assert_eq!(ids(&filter_nodes(&graph.nodes, &criteria)), vec!["dune", "messiah"]);
}

#[test]
fn test_year_filter_drops_undated_nodes() {
    let graph = shelf();
    let criteria = vec![FilterCriterion::publication_year(
        "range",
        YearFilter::Range {
            min: Some(1800),
            max: Some(2000),
        },
    )];
    let visible = ids(&filter_nodes(&graph.nodes, &criteria));
    assert_eq!(visible, vec!["emma", "dune", "messiah"]);
}

#[test]
fn test_filter_graph_restricts_edges() {
    let graph = shelf();
    let criteria = vec![FilterCriterion::series("no-dune", SeriesMode::Exclude, ["Dune"])];
    let view = filter_graph(&graph, &criteria);

    assert_eq!(view.node_count(), 4);
    assert_eq!(view.edge_count(), 1);
    assert_eq!(view.edges[0].id, "e3");
    assert_eq!(graph.node_count(), 6);
}

#[test]
fn test_filtered_stats() {
    let graph = shelf();
    let criteria = vec![FilterCriterion::node_types("books", [NodeType::Book])];
    let stats = calculate_filtered_stats(&graph, &criteria);

    assert_eq!(stats.nodes.total, 4);
    assert_eq!(stats.edges.total, 1);
    assert_eq!(stats.edges.dangling, 0);
    assert_eq!(stats.connectivity.clusters, 3);
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_preset_lifecycle_in_memory() {
    let mut presets = PresetManager::new(MemoryStore::new());
    let saved = presets
        .save_preset(
            "Modern",
            "Books after 1900",
            vec![FilterCriterion::publication_year("y", YearFilter::After(1900))],
        )
        .unwrap();

    let used = presets.update_last_used(&saved.id).unwrap();
    assert!(used.last_used.is_some());
    assert!(used.last_used.unwrap() >= saved.created_at);

    let renamed = presets
        .update_preset(
            &saved.id,
            PresetUpdate {
                name: Some("Twentieth century".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Twentieth century");
    assert_eq!(renamed.description, "Books after 1900");
    assert_eq!(renamed.created_at, saved.created_at);

    presets.delete_preset(&saved.id).unwrap();
    assert!(presets.load_presets().unwrap().is_empty());
    assert_eq!(presets.store().get(PRESETS_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_presets_survive_reopen_on_disk() {
    let temp = tempfile::tempdir().unwrap();
    let criteria = vec![
        FilterCriterion::node_types("t", [NodeType::Book, NodeType::Author]),
        FilterCriterion::description("d", ["war", "peace"], KeywordMatch::All, true),
    ];

    let saved = {
        let mut presets = PresetManager::new(FileStore::new(temp.path()));
        presets.save_preset("War", "", criteria.clone()).unwrap()
    };

    let presets = PresetManager::new(FileStore::new(temp.path()));
    let loaded = presets.find_by_name("War").unwrap().unwrap();
    assert_eq!(loaded.id, saved.id);
    assert_eq!(loaded.criteria, criteria);
    assert_eq!(loaded.created_at, saved.created_at);
    assert!(temp.path().join(format!("{PRESETS_KEY}.json")).exists());
}
