//! CLI command implementations.

pub mod config;
pub mod filter;
pub mod layout;
pub mod presets;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};
use lit_graph_core::Graph;
use lit_graph_filter::{FileStore, PresetManager};
use tracing::info;

use crate::config::Config;

/// Load a graph document, with the path in the error.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let graph = Graph::load(path)
        .with_context(|| format!("Failed to load graph from {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded graph"
    );
    Ok(graph)
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            eprintln!("Output written to: {}", path.display());
        }
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

/// The preset manager backed by the configured presets directory.
pub fn preset_manager(config: &Config) -> PresetManager<FileStore> {
    PresetManager::new(FileStore::new(&config.presets_dir))
}
