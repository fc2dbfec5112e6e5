//! Sectioned CSV rendering of [`GraphStats`].
//!
//! Each section is a title line followed by `key,value` rows; sections are
//! separated by a blank line. Values are written verbatim without quoting.

use std::fmt;

use crate::types::{GraphStats, LabelCount, NodeConnections, RankedNode};

/// One titled block of a stats CSV document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSection {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl CsvSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    fn row(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.rows.push((key.to_string(), value.to_string()));
        self
    }

    fn rows<I, K, V>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: ToString,
    {
        self.rows
            .extend(rows.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Value of the first row with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CsvSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (key, value) in &self.rows {
            writeln!(f, "{key},{value}")?;
        }
        Ok(())
    }
}

fn connections(list: &[NodeConnections]) -> impl Iterator<Item = (&str, usize)> {
    list.iter().map(|n| (n.label.as_str(), n.connections))
}

fn ranked(list: &[RankedNode]) -> impl Iterator<Item = (&str, usize)> {
    list.iter().map(|n| (n.label.as_str(), n.count))
}

fn labels(list: &[LabelCount]) -> impl Iterator<Item = (&str, usize)> {
    list.iter().map(|n| (n.label.as_str(), n.count))
}

impl GraphStats {
    /// Break the stats into titled sections in export order.
    pub fn csv_sections(&self) -> Vec<CsvSection> {
        let nodes = &self.nodes;
        let edges = &self.edges;
        let connectivity = &self.connectivity;
        let temporal = &self.temporal;
        let year = |y: Option<i32>| y.map_or_else(|| "N/A".to_string(), |y| y.to_string());

        vec![
            CsvSection::new("Node Statistics")
                .row("Total Nodes", nodes.total)
                .row("Nodes With Images", nodes.with_images)
                .row("Nodes With Descriptions", nodes.with_descriptions)
                .row("Nodes With Series", nodes.with_series),
            CsvSection::new("Nodes By Type").rows(&nodes.by_type),
            CsvSection::new("Edge Statistics")
                .row("Total Edges", edges.total)
                .row("Dangling Edges", edges.dangling)
                .row(
                    "Average Connections",
                    format!("{:.2}", edges.average_connections),
                ),
            CsvSection::new("Edges By Type").rows(&edges.by_type),
            CsvSection::new("Most Connected").rows(connections(&edges.most_connected)),
            CsvSection::new("Least Connected").rows(connections(&edges.least_connected)),
            CsvSection::new("Connectivity")
                .row(
                    "Average Degree",
                    format!("{:.2}", connectivity.average_degree),
                )
                .row("Density", format!("{:.4}", connectivity.density))
                .row("Clusters", connectivity.clusters)
                .row("Isolated Nodes", connectivity.isolated_nodes),
            CsvSection::new("Series Distribution")
                .rows(labels(&self.content.series_distribution)),
            CsvSection::new("Top Themes").rows(ranked(&self.content.top_themes)),
            CsvSection::new("Top Authors").rows(ranked(&self.content.top_authors)),
            CsvSection::new("Top Genres").rows(ranked(&self.content.top_genres)),
            CsvSection::new("Temporal")
                .row("Earliest Year", year(temporal.earliest_year))
                .row("Latest Year", year(temporal.latest_year))
                .row("Year Range", temporal.year_range),
            CsvSection::new("Decades")
                .rows(temporal.decades.iter().map(|d| (d.label.as_str(), d.count))),
        ]
    }

    /// Render as a sectioned CSV document.
    pub fn to_csv(&self) -> String {
        self.csv_sections()
            .iter()
            .map(CsvSection::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a document produced by [`GraphStats::to_csv`] back into sections.
///
/// Lines without a comma are treated as section titles; the value of a row
/// is everything after its last comma, so labels containing commas survive.
pub fn read_csv_sections(csv: &str) -> Vec<CsvSection> {
    let mut sections: Vec<CsvSection> = Vec::new();
    let mut current: Option<CsvSection> = None;

    for line in csv.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            sections.extend(current.take());
            continue;
        }
        match (line.rsplit_once(','), current.as_mut()) {
            (Some((key, value)), Some(section)) => {
                section.rows.push((key.to_string(), value.to_string()));
            }
            _ => {
                sections.extend(current.take());
                current = Some(CsvSection::new(line));
            }
        }
    }
    sections.extend(current);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_render_every_section() {
        let csv = GraphStats::default().to_csv();
        let sections = read_csv_sections(&csv);
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles.len(), 13);
        assert_eq!(titles[0], "Node Statistics");
        assert_eq!(titles[12], "Decades");
        assert_eq!(sections[0].get("Total Nodes"), Some("0"));
        assert_eq!(sections[11].get("Earliest Year"), Some("N/A"));
    }

    #[test]
    fn test_blank_line_between_sections() {
        let csv = GraphStats::default().to_csv();
        assert!(csv.starts_with("Node Statistics\nTotal Nodes,0\n"));
        assert!(csv.contains("\n\nEdge Statistics\n"));
    }

    #[test]
    fn test_section_display_matches_document_block() {
        let section = CsvSection::new("Temporal")
            .row("Earliest Year", 1815)
            .row("Year Range", 150);
        assert_eq!(
            section.to_string(),
            "Temporal\nEarliest Year,1815\nYear Range,150\n"
        );
        assert!(GraphStats::default()
            .to_csv()
            .contains(&GraphStats::default().csv_sections()[11].to_string()));
    }

    #[test]
    fn test_labels_with_commas_keep_value() {
        let sections = read_csv_sections("Top Authors\nTolkien, J. R. R.,4\n");
        assert_eq!(sections[0].get("Tolkien, J. R. R."), Some("4"));
    }
}
