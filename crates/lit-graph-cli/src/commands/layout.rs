//! Layout command implementation.
//!
//! Drives the simulation headlessly: one `tick` per loop iteration instead of
//! one per animation frame, then writes positions back into the graph.

use std::path::{Path, PathBuf};

use anyhow::Result;
use lit_graph_layout::{LayoutEngine, LayoutPatch, LayoutState};
use tracing::info;

use super::{emit, load_graph};
use crate::config::Config;

/// Command-line overrides on top of the configured layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub ticks: Option<usize>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub cluster_by_type: bool,
}

impl LayoutOptions {
    fn patch(&self) -> LayoutPatch {
        LayoutPatch {
            width: self.width,
            height: self.height,
            cluster_by_type: self.cluster_by_type.then_some(true),
            ..Default::default()
        }
    }
}

/// Lay out a graph file.
pub fn execute(
    config: &Config,
    graph_path: &Path,
    options: LayoutOptions,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut graph = load_graph(graph_path)?;

    let mut layout_config = config.layout.clone();
    options.patch().apply_to(&mut layout_config);

    let mut engine = LayoutEngine::new(layout_config);
    engine.initialize(graph.nodes.clone(), graph.edges.clone());

    let max_ticks = options.ticks.unwrap_or(config.max_ticks);
    let steps = engine.run(max_ticks);
    let settled = engine.state() == LayoutState::Settled;
    let placed = engine.apply_geometry(&mut graph);

    info!(
        steps,
        settled,
        alpha = engine.alpha(),
        forces = ?engine.force_names(),
        "Layout finished"
    );
    engine.destroy();

    if output.is_some() {
        eprintln!(
            "✅ Laid out {} nodes in {} ticks ({})",
            placed,
            steps,
            if settled { "settled" } else { "still moving" }
        );
    }
    emit(&graph.to_json()?, output.as_deref())
}
