//! Integration tests for the lg CLI.
//!
//! Run with: `cargo test --package lit-graph-cli --test cli_integration`

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Run lg with config and presets isolated under `home`.
fn run_lg(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lg"))
        .env("LIT_GRAPH_CONFIG_DIR", home.join("config"))
        .env("LIT_GRAPH_PRESETS_DIR", home.join("presets"))
        .args(args)
        .output()
        .expect("Failed to execute lg command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Write a small exploration graph and return its path.
fn write_graph(dir: &Path) -> String {
    let graph = serde_json::json!({
        "nodes": [
            {"id": "dune", "type": "book", "label": "Dune", "depth": 0,
             "metadata": {"description": "Desert ecology.",
                          "details": {"kind": "book", "publicationYear": 1965, "series": "Dune"}}},
            {"id": "messiah", "type": "book", "label": "Dune Messiah", "depth": 1,
             "metadata": {"details": {"kind": "book", "publicationYear": 1969, "series": "Dune"}}},
            {"id": "emma", "type": "book", "label": "Emma", "depth": 2,
             "metadata": {"details": {"kind": "book", "publicationYear": 1815}}},
            {"id": "herbert", "type": "author", "label": "Frank Herbert", "depth": 1},
            {"id": "scifi", "type": "genre", "label": "Science Fiction", "depth": 1}
        ],
        "edges": [
            {"id": "e1", "source": "dune", "target": "herbert", "type": "written_by"},
            {"id": "e2", "source": "messiah", "target": "herbert", "type": "written_by"},
            {"id": "e3", "source": "dune", "target": "scifi", "type": "belongs_to_genre"},
            {"id": "e4", "source": "dune", "target": "missing", "type": "related"}
        ]
    });
    let path = dir.join("graph.json");
    fs::write(&path, serde_json::to_string_pretty(&graph).unwrap()).unwrap();
    path.display().to_string()
}

// =============================================================================
// Stats
// =============================================================================

#[test]
fn test_stats_json() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());

    let output = run_lg(temp.path(), &["stats", &graph, "--format", "json"]);
    assert!(output.status.success(), "lg stats should succeed");

    let stats: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(stats["nodes"]["total"], 5);
    assert_eq!(stats["edges"]["total"], 4);
    assert_eq!(stats["edges"]["dangling"], 1);
    assert_eq!(stats["connectivity"]["clusters"], 2);
    assert_eq!(stats["connectivity"]["isolatedNodes"], 1);
    assert_eq!(stats["edges"]["mostConnected"][0]["nodeId"], "dune");
}

#[test]
fn test_stats_csv_to_file() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());
    let out = temp.path().join("out/stats.csv");

    let output = run_lg(
        temp.path(),
        &["stats", &graph, "-f", "csv", "-o", out.to_str().unwrap()],
    );
    assert!(output.status.success());

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("Node Statistics\nTotal Nodes,5\n"));
    assert!(csv.contains("Total Edges,4"));
    assert!(csv.contains("\nDecades\n1810s,1\n1960s,2\n"));
}

#[test]
fn test_stats_text_default() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());

    let output = run_lg(temp.path(), &["stats", &graph]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Graph Statistics"));
    assert!(text.contains("Clusters:       2"));
}

#[test]
fn test_stats_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_lg(temp.path(), &["stats", "does-not-exist.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load graph"));
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_layout_places_every_node() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());

    let output = run_lg(
        temp.path(),
        &["layout", &graph, "--ticks", "200", "--width", "400", "--height", "400"],
    );
    assert!(output.status.success());

    let laid_out: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let nodes = laid_out["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    for node in nodes {
        assert!(node["x"].as_f64().unwrap().is_finite());
        assert!(node["y"].as_f64().unwrap().is_finite());
    }
    assert_eq!(laid_out["edges"].as_array().unwrap().len(), 4);
}

// =============================================================================
// Filter and presets
// =============================================================================

#[test]
fn test_filter_by_type_and_year() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());

    let output = run_lg(
        temp.path(),
        &["filter", &graph, "--type", "book", "--year-after", "1900"],
    );
    assert!(output.status.success());

    let view: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<&str> = view["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["dune", "messiah"]);
    assert!(view["edges"].as_array().unwrap().is_empty());
}

#[test]
fn test_filter_rejects_unknown_type() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());
    let output = run_lg(temp.path(), &["filter", &graph, "--type", "poem"]);
    assert!(!output.status.success());
}

#[test]
fn test_preset_saved_and_used_by_stats() {
    let temp = TempDir::new().unwrap();
    let graph = write_graph(temp.path());

    let output = run_lg(
        temp.path(),
        &["filter", &graph, "--series-include", "dune", "--save-preset", "Dune saga"],
    );
    assert!(output.status.success());
    assert!(temp
        .path()
        .join("presets/lit-graph.filter-presets.json")
        .exists());

    let output = run_lg(temp.path(), &["presets", "list"]);
    assert!(stdout(&output).contains("Dune saga"));

    let output = run_lg(
        temp.path(),
        &["stats", &graph, "--preset", "Dune saga", "--format", "json"],
    );
    assert!(output.status.success());
    let stats: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(stats["nodes"]["total"], 2);

    let output = run_lg(temp.path(), &["presets", "show", "Dune saga"]);
    let preset: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(preset.get("lastUsed").is_some());

    let output = run_lg(temp.path(), &["presets", "delete", "Dune saga"]);
    assert!(output.status.success());
    let output = run_lg(temp.path(), &["presets", "show", "Dune saga"]);
    assert!(!output.status.success());
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_set_get_round_trip() {
    let temp = TempDir::new().unwrap();

    let output = run_lg(temp.path(), &["config", "set", "link-distance", "80"]);
    assert!(output.status.success());
    assert!(temp.path().join("config/config.json").exists());

    let output = run_lg(temp.path(), &["config", "get", "link-distance"]);
    assert_eq!(stdout(&output).trim(), "80");

    let output = run_lg(temp.path(), &["config", "get", "nope"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_path_honors_env() {
    let temp = TempDir::new().unwrap();
    let output = run_lg(temp.path(), &["config", "path"]);
    assert!(stdout(&output).trim().ends_with("config.json"));
    assert!(stdout(&output).contains(temp.path().to_str().unwrap()));
}
