//! Stats command implementation.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use lit_graph_analytics::{calculate_graph_stats, GraphStats};
use lit_graph_filter::calculate_filtered_stats;
use tracing::info;

use super::{emit, load_graph, preset_manager};
use crate::commands::presets::resolve;
use crate::config::Config;

/// Output format for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!("Unknown format: {}. Use 'text', 'json' or 'csv'", s),
        }
    }
}

/// Compute statistics for a graph file, optionally over a preset's view.
pub fn execute(
    config: &Config,
    graph_path: &Path,
    format: OutputFormat,
    output: Option<PathBuf>,
    preset: Option<&str>,
) -> Result<()> {
    let graph = load_graph(graph_path)?;

    let stats = match preset {
        Some(name_or_id) => {
            let mut presets = preset_manager(config);
            let preset = resolve(&presets, name_or_id)?;
            presets.update_last_used(&preset.id)?;
            info!(preset = %preset.name, "Applying filter preset");
            calculate_filtered_stats(&graph, &preset.criteria)
        }
        None => calculate_graph_stats(&graph.nodes, &graph.edges),
    };

    let content = match format {
        OutputFormat::Text => render_text(&stats),
        OutputFormat::Json => stats.to_json()?,
        OutputFormat::Csv => stats.to_csv(),
    };
    emit(&content, output.as_deref())
}

/// Human-readable summary.
pub fn render_text(stats: &GraphStats) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, stats);
    out
}

fn write_text(out: &mut String, stats: &GraphStats) -> std::fmt::Result {
    writeln!(out, "📊 Graph Statistics")?;
    writeln!(out, "{:─<50}", "")?;
    writeln!(out, "Nodes:          {}", stats.nodes.total)?;
    for (node_type, count) in &stats.nodes.by_type {
        writeln!(out, "   • {node_type}: {count}")?;
    }
    writeln!(out, "Edges:          {}", stats.edges.total)?;
    if stats.edges.dangling > 0 {
        writeln!(out, "   ⚠️  dangling: {}", stats.edges.dangling)?;
    }
    writeln!(out)?;

    let connectivity = &stats.connectivity;
    writeln!(out, "🔗 Connectivity")?;
    writeln!(out, "   Average degree: {:.2}", connectivity.average_degree)?;
    writeln!(out, "   Density:        {:.4}", connectivity.density)?;
    writeln!(out, "   Clusters:       {}", connectivity.clusters)?;
    writeln!(out, "   Isolated nodes: {}", connectivity.isolated_nodes)?;

    if !stats.edges.most_connected.is_empty() {
        writeln!(out)?;
        writeln!(out, "⭐ Most connected")?;
        for node in &stats.edges.most_connected {
            writeln!(out, "   {} ({}): {}", node.label, node.node_type, node.connections)?;
        }
    }

    let temporal = &stats.temporal;
    if let (Some(earliest), Some(latest)) = (temporal.earliest_year, temporal.latest_year) {
        writeln!(out)?;
        writeln!(out, "📅 Publication years {earliest}–{latest}")?;
        for decade in &temporal.decades {
            writeln!(out, "   {:>6}: {}", decade.label, decade.count)?;
        }
    }
    Ok(())
}
