//! Filter command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lit_graph_core::NodeType;
use lit_graph_filter::{filter_graph, FilterCriterion, KeywordMatch, SeriesMode, YearFilter};
use tracing::info;

use super::{emit, load_graph, preset_manager};
use crate::config::Config;
use crate::FilterArgs;

/// Translate command-line flags into an ordered criteria list.
pub fn build_criteria(args: &FilterArgs) -> Result<Vec<FilterCriterion>> {
    let mut criteria = Vec::new();

    if !args.types.is_empty() {
        let types = args
            .types
            .iter()
            .map(|tag| parse_node_type(tag))
            .collect::<Result<Vec<_>>>()?;
        criteria.push(FilterCriterion::node_types("type", types));
    }

    if args.year_min.is_some() || args.year_max.is_some() {
        criteria.push(FilterCriterion::publication_year(
            "year-range",
            YearFilter::Range {
                min: args.year_min,
                max: args.year_max,
            },
        ));
    }
    if let Some(year) = args.year_before {
        criteria.push(FilterCriterion::publication_year(
            "year-before",
            YearFilter::Before(year),
        ));
    }
    if let Some(year) = args.year_after {
        criteria.push(FilterCriterion::publication_year(
            "year-after",
            YearFilter::After(year),
        ));
    }
    if let Some(year) = args.year_exact {
        criteria.push(FilterCriterion::publication_year(
            "year-exact",
            YearFilter::Exact(year),
        ));
    }

    if !args.series_include.is_empty() {
        criteria.push(FilterCriterion::series(
            "series-include",
            SeriesMode::Include,
            args.series_include.iter().cloned(),
        ));
    }
    if !args.series_exclude.is_empty() {
        criteria.push(FilterCriterion::series(
            "series-exclude",
            SeriesMode::Exclude,
            args.series_exclude.iter().cloned(),
        ));
    }

    if !args.keyword.is_empty() {
        let match_mode = if args.all_keywords {
            KeywordMatch::All
        } else {
            KeywordMatch::Any
        };
        criteria.push(FilterCriterion::description(
            "keywords",
            args.keyword.iter().cloned(),
            match_mode,
            args.case_sensitive,
        ));
    }

    Ok(criteria)
}

fn parse_node_type(tag: &str) -> Result<NodeType> {
    match NodeType::parse(tag) {
        NodeType::Unknown if !tag.eq_ignore_ascii_case("unknown") => {
            let known: Vec<&str> = NodeType::KNOWN.iter().map(NodeType::as_str).collect();
            anyhow::bail!("Unknown node type: {}. Valid types: {}", tag, known.join(", "))
        }
        node_type => Ok(node_type),
    }
}

/// Filter a graph file and emit the visible subgraph.
pub fn execute(
    config: &Config,
    graph_path: &Path,
    criteria: Vec<FilterCriterion>,
    save_preset: Option<&str>,
    description: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let graph = load_graph(graph_path)?;
    let view = filter_graph(&graph, &criteria);

    info!(
        criteria = criteria.len(),
        visible = view.node_count(),
        hidden = graph.node_count() - view.node_count(),
        "Filtered graph"
    );

    if let Some(name) = save_preset {
        let preset = preset_manager(config)
            .save_preset(name, description, criteria)
            .with_context(|| format!("Failed to save preset {name}"))?;
        eprintln!("💾 Saved preset {} ({})", preset.name, preset.id);
    }

    emit(&view.to_json()?, output.as_deref())
}
