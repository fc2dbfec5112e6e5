//! Node sizing, coloring, and clustering anchors.

use lit_graph_core::{Node, NodeType};

/// Neutral color for node types without a curated color.
pub const DEFAULT_COLOR: &str = "#9ca3af";

/// Size multiplier for a node type.
pub fn type_multiplier(node_type: NodeType) -> f64 {
    match node_type {
        NodeType::Author => 1.2,
        NodeType::Book => 1.0,
        NodeType::Genre => 1.4,
        NodeType::Theme => 0.9,
        NodeType::Character => 0.8,
        NodeType::Movement => 1.3,
        NodeType::Unknown => 1.0,
    }
}

/// Fill color for a node type.
pub fn node_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Author => "#8b5cf6",
        NodeType::Book => "#3b82f6",
        NodeType::Genre => "#10b981",
        NodeType::Theme => "#f59e0b",
        NodeType::Character => "#ef4444",
        NodeType::Movement => "#ec4899",
        NodeType::Unknown => DEFAULT_COLOR,
    }
}

/// Screen-space anchor the clustering force pulls a node type toward.
pub fn cluster_anchor(node_type: NodeType, width: f64, height: f64) -> (f64, f64) {
    let (fx, fy) = match node_type {
        NodeType::Author => (0.25, 0.25),
        NodeType::Book => (0.75, 0.25),
        NodeType::Genre => (0.25, 0.75),
        NodeType::Theme => (0.75, 0.75),
        NodeType::Character => (0.5, 0.15),
        NodeType::Movement => (0.5, 0.85),
        NodeType::Unknown => (0.5, 0.5),
    };
    (width * fx, height * fy)
}

/// Computes drawn node radii from a base radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub base_radius: f64,
}

impl NodeStyle {
    pub fn new(base_radius: f64) -> Self {
        Self { base_radius }
    }

    /// Depth scaling: nodes closer to the seed are drawn larger.
    /// Depths past 3 keep shrinking; the result is not clamped.
    pub fn depth_multiplier(depth: u32) -> f64 {
        1.0 + (3.0 - f64::from(depth)) * 0.2
    }

    /// Drawn radius of `node`.
    pub fn radius(&self, node: &Node) -> f64 {
        self.base_radius * type_multiplier(node.node_type) * Self::depth_multiplier(node.depth)
    }

    /// First node, in slice order, whose disk contains `(x, y)`.
    /// Nodes without a position are skipped.
    pub fn find_node_at<'a>(&self, x: f64, y: f64, nodes: &'a [Node]) -> Option<&'a Node> {
        nodes.iter().find(|node| {
            node.position().is_some_and(|(nx, ny)| {
                let (dx, dy) = (x - nx, y - ny);
                (dx * dx + dy * dy).sqrt() <= self.radius(node)
            })
        })
    }
}
