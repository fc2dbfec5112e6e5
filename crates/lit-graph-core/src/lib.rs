//! Core domain types shared across the entire lit-graph workspace.
//!
//! The [`Graph`] is owned by the host application. The layout engine mutates
//! only the geometry fields of a [`Node`] (`x`, `y`, `vx`, `vy`, `fx`, `fy`);
//! analytics and filtering read immutable snapshots.

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or saving a graph document.
#[derive(Debug, Error)]
pub enum CoreError {
    /// I/O error while reading or writing a graph file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The graph document is not valid JSON for the data model.
    #[error("graph serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Node and Edge Kinds
// =============================================================================

/// Enumerates the kinds of nodes that can populate the exploration graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A person who wrote one or more books.
    Author,
    /// A single published work.
    Book,
    /// A literary genre.
    Genre,
    /// A recurring theme or subject.
    Theme,
    /// A fictional character.
    Character,
    /// A literary movement or school.
    Movement,
    /// Any tag not in the curated list. Unrecognized input lands here.
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeType {
    /// All curated node types, in display order.
    pub const KNOWN: [NodeType; 6] = [
        NodeType::Author,
        NodeType::Book,
        NodeType::Genre,
        NodeType::Theme,
        NodeType::Character,
        NodeType::Movement,
    ];

    /// Stable lowercase tag used in JSON and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Author => "author",
            NodeType::Book => "book",
            NodeType::Genre => "genre",
            NodeType::Theme => "theme",
            NodeType::Character => "character",
            NodeType::Movement => "movement",
            NodeType::Unknown => "unknown",
        }
    }

    /// Parse a tag, falling back to [`NodeType::Unknown`].
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "author" => NodeType::Author,
            "book" => NodeType::Book,
            "genre" => NodeType::Genre,
            "theme" => NodeType::Theme,
            "character" => NodeType::Character,
            "movement" => NodeType::Movement,
            _ => NodeType::Unknown,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship carried by an edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Book was written by author.
    WrittenBy,
    /// Book belongs to genre.
    BelongsToGenre,
    /// Book explores theme.
    HasTheme,
    /// Book features character.
    FeaturesCharacter,
    /// Author or book is part of a movement.
    PartOfMovement,
    /// Author was influenced by another author.
    InfluencedBy,
    /// Two works are similar.
    SimilarTo,
    /// Generic association.
    Related,
    /// Any tag not in the curated list.
    #[default]
    #[serde(other)]
    Unknown,
}

impl EdgeType {
    /// Stable snake_case tag used in JSON and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::WrittenBy => "written_by",
            EdgeType::BelongsToGenre => "belongs_to_genre",
            EdgeType::HasTheme => "has_theme",
            EdgeType::FeaturesCharacter => "features_character",
            EdgeType::PartOfMovement => "part_of_movement",
            EdgeType::InfluencedBy => "influenced_by",
            EdgeType::SimilarTo => "similar_to",
            EdgeType::Related => "related",
            EdgeType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Identifiers in external catalogues.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_books: Option<String>,
}

impl ExternalIds {
    /// True when no identifier is set.
    pub fn is_empty(&self) -> bool {
        self.open_library.is_none() && self.google_books.is_none()
    }
}

/// Kind-specific attributes of a node.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NodeDetails {
    /// Attributes of a published work.
    Book {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        publication_year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        series: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        series_position: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page_count: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        isbn: Option<String>,
    },
    /// Attributes of a person.
    Author {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        birth_year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        death_year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nationality: Option<String>,
    },
    /// Active period of a genre or movement.
    Period {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_year: Option<i32>,
    },
    /// No kind-specific attributes.
    #[default]
    None,
}

/// Extra attributes attached to a node.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    /// Cover or portrait reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Identifiers in external catalogues.
    #[serde(default, skip_serializing_if = "ExternalIds::is_empty")]
    pub external_ids: ExternalIds,
    /// Kind-specific attributes.
    #[serde(default)]
    pub details: NodeDetails,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl NodeMetadata {
    /// Metadata for a book with an optional year and series.
    pub fn book(publication_year: Option<i32>, series: Option<&str>) -> Self {
        Self {
            details: NodeDetails::Book {
                publication_year,
                series: series.map(str::to_string),
                series_position: None,
                page_count: None,
                isbn: None,
            },
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the image reference.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Publication year, only present on books.
    pub fn publication_year(&self) -> Option<i32> {
        match &self.details {
            NodeDetails::Book {
                publication_year, ..
            } => *publication_year,
            _ => None,
        }
    }

    /// Series name with surrounding whitespace removed; blank names count as absent.
    pub fn series(&self) -> Option<&str> {
        match &self.details {
            NodeDetails::Book { series, .. } => non_blank(series),
            _ => None,
        }
    }

    /// Description text; blank descriptions count as absent.
    pub fn description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    /// Whether a non-empty image reference is set.
    pub fn has_image(&self) -> bool {
        non_blank(&self.image_url).is_some()
    }

    /// Whether a non-empty description is set.
    pub fn has_description(&self) -> bool {
        self.description().is_some()
    }
}

// =============================================================================
// Graph
// =============================================================================

/// A node in the exploration graph.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier.
    pub id: String,
    /// Category of the node.
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    /// Display string.
    pub label: String,
    /// Distance from the seed node of the current exploration.
    #[serde(default)]
    pub depth: u32,
    /// Horizontal position, unset until the layout places the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical position, unset until the layout places the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    /// Pinned horizontal position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    /// Pinned vertical position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
    #[serde(default)]
    pub metadata: NodeMetadata,
    /// Whether this node's neighborhood has been materialized.
    #[serde(default)]
    pub expanded: bool,
}

impl Node {
    /// Create an unpositioned node at depth 0.
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the depth from the seed node.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Place the node at a position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Current position, if the node has been placed.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }

    /// Whether the node is pinned in place.
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }
}

fn default_strength() -> f64 {
    0.5
}

/// A relationship between two nodes.
///
/// Endpoints are weak references: an edge may name a node that is not (yet)
/// part of the graph. Such edges are ignored by every engine.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique identifier.
    pub id: String,
    /// Originating node id.
    pub source: String,
    /// Destination node id.
    pub target: String,
    /// Relationship kind.
    #[serde(rename = "type", default)]
    pub edge_type: EdgeType,
    /// Coupling strength in `[0, 1]`.
    #[serde(default = "default_strength")]
    pub strength: f64,
}

impl Edge {
    /// Create an edge with the default strength.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            edge_type,
            strength: default_strength(),
        }
    }

    /// Set the coupling strength.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Whether the edge touches `id`.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// The full node/edge collection owned by the host.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Create a graph from parts.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Returns the number of nodes currently tracked.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges currently tracked.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by id, mutably.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Map from node id to its position in `nodes`.
    ///
    /// With duplicate ids the first occurrence wins.
    pub fn node_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(i);
        }
        index
    }

    /// Edges whose endpoints both exist in the node set.
    pub fn valid_edges(&self) -> impl Iterator<Item = &Edge> {
        let index = self.node_index();
        self.edges
            .iter()
            .filter(move |e| index.contains_key(e.source.as_str()) && index.contains_key(e.target.as_str()))
    }

    /// Parse a graph from its JSON document form.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the graph as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a graph from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save the graph as a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Convert to an undirected petgraph graph for analysis.
    /// Returns the graph and a mapping from node id to `NodeIndex`.
    /// Dangling edges are skipped.
    pub fn to_petgraph(&self) -> (UnGraph<String, EdgeType>, HashMap<String, NodeIndex>) {
        let mut graph = UnGraph::new_undirected();
        let mut id_to_index = HashMap::new();

        for node in &self.nodes {
            if id_to_index.contains_key(&node.id) {
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            id_to_index.insert(node.id.clone(), idx);
        }

        for edge in &self.edges {
            if let (Some(&from_idx), Some(&to_idx)) =
                (id_to_index.get(&edge.source), id_to_index.get(&edge.target))
            {
                graph.add_edge(from_idx, to_idx, edge.edge_type);
            }
        }

        (graph, id_to_index)
    }
}
