//! Named forces contributing to per-node velocity.
//!
//! Each force mirrors the corresponding d3-force primitive: forces add to
//! `vx`/`vy` scaled by alpha, except center (translates positions) and
//! collision (alpha-independent overlap resolution).

use std::collections::HashMap;

use lit_graph_core::{Edge, Node};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::LayoutConfig;
use crate::quadtree::QuadTree;
use crate::style::{cluster_anchor, NodeStyle};
use crate::{
    CENTER_STRENGTH, CLUSTER_STRENGTH, COLLISION_PADDING, RADIAL_RING_SPACING, RADIAL_STRENGTH,
};

const THETA2: f64 = 0.81;
const DISTANCE_MIN2: f64 = 1.0;
const MAX_TREE_DEPTH: usize = 12;
const COLLISION_STRENGTH: f64 = 1.0;

fn jiggle(rng: &mut StdRng) -> f64 {
    (rng.gen::<f64>() - 0.5) * 1e-6
}

fn xy(node: &Node) -> (f64, f64) {
    (node.x.unwrap_or(0.0), node.y.unwrap_or(0.0))
}

struct Link {
    source: usize,
    target: usize,
    distance: f64,
    strength: f64,
    bias: f64,
}

/// Springs between edge endpoints.
struct LinkForce {
    links: Vec<Link>,
}

impl LinkForce {
    fn new(edges: &[Edge], index: &HashMap<String, usize>, config: &LayoutConfig) -> Self {
        let resolved: Vec<(usize, usize, f64)> = edges
            .iter()
            .filter_map(|edge| {
                let source = *index.get(&edge.source)?;
                let target = *index.get(&edge.target)?;
                (source != target).then_some((source, target, edge.strength))
            })
            .collect();

        let mut count: HashMap<usize, f64> = HashMap::new();
        for &(s, t, _) in &resolved {
            *count.entry(s).or_default() += 1.0;
            *count.entry(t).or_default() += 1.0;
        }

        let links = resolved
            .into_iter()
            .map(|(source, target, strength)| {
                let (cs, ct) = (count[&source], count[&target]);
                Link {
                    source,
                    target,
                    distance: config.link_rest_length(strength),
                    strength: 1.0 / cs.min(ct),
                    bias: cs / (cs + ct),
                }
            })
            .collect();

        Self { links }
    }

    fn apply(&self, nodes: &mut [Node], alpha: f64, rng: &mut StdRng) {
        for link in &self.links {
            let (sx, sy) = xy(&nodes[link.source]);
            let (tx, ty) = xy(&nodes[link.target]);
            let mut x = tx + nodes[link.target].vx - sx - nodes[link.source].vx;
            let mut y = ty + nodes[link.target].vy - sy - nodes[link.source].vy;
            if x == 0.0 {
                x = jiggle(rng);
            }
            if y == 0.0 {
                y = jiggle(rng);
            }
            let l = (x * x + y * y).sqrt();
            let k = (l - link.distance) / l * alpha * link.strength;
            x *= k;
            y *= k;

            let target = &mut nodes[link.target];
            target.vx -= x * link.bias;
            target.vy -= y * link.bias;
            let source = &mut nodes[link.source];
            source.vx += x * (1.0 - link.bias);
            source.vy += y * (1.0 - link.bias);
        }
    }
}

/// Uniform pairwise repulsion, approximated with a Barnes-Hut quadtree.
struct ManyBodyForce {
    strength: f64,
}

impl ManyBodyForce {
    fn apply(&self, nodes: &mut [Node], alpha: f64, rng: &mut StdRng) {
        if self.strength == 0.0 || nodes.len() < 2 {
            return;
        }
        let positions: Vec<(f64, f64)> = nodes.iter().map(xy).collect();
        let tree = QuadTree::build(&positions, MAX_TREE_DEPTH);
        if tree.root().is_none() {
            return;
        }

        let mut stack = Vec::new();
        for (i, &(xi, yi)) in positions.iter().enumerate() {
            let (mut fvx, mut fvy) = (0.0, 0.0);
            stack.clear();
            stack.push(0usize);

            while let Some(ci) = stack.pop() {
                let cell = tree.cell(ci);
                let mut dx = cell.center_x - xi;
                let mut dy = cell.center_y - yi;
                let mut l = dx * dx + dy * dy;

                if cell.width * cell.width / THETA2 < l {
                    let value = cell.mass * self.strength;
                    if dx == 0.0 {
                        dx = jiggle(rng);
                        l += dx * dx;
                    }
                    if dy == 0.0 {
                        dy = jiggle(rng);
                        l += dy * dy;
                    }
                    if l < DISTANCE_MIN2 {
                        l = (DISTANCE_MIN2 * l).sqrt();
                    }
                    fvx += dx * value * alpha / l;
                    fvy += dy * value * alpha / l;
                    continue;
                }

                if !cell.is_leaf() {
                    stack.extend(cell.children.iter().flatten().copied());
                    continue;
                }

                for &j in cell.points.iter().filter(|&&j| j != i) {
                    let (xj, yj) = positions[j];
                    let mut dx = xj - xi;
                    let mut dy = yj - yi;
                    let mut l = dx * dx + dy * dy;
                    if dx == 0.0 {
                        dx = jiggle(rng);
                        l += dx * dx;
                    }
                    if dy == 0.0 {
                        dy = jiggle(rng);
                        l += dy * dy;
                    }
                    if l < DISTANCE_MIN2 {
                        l = (DISTANCE_MIN2 * l).sqrt();
                    }
                    fvx += dx * self.strength * alpha / l;
                    fvy += dy * self.strength * alpha / l;
                }
            }

            nodes[i].vx += fvx;
            nodes[i].vy += fvy;
        }
    }
}

/// Translates all nodes so their mean moves toward the canvas center.
struct CenterForce {
    center: (f64, f64),
    strength: f64,
}

impl CenterForce {
    fn apply(&self, nodes: &mut [Node]) {
        if nodes.is_empty() {
            return;
        }
        let n = nodes.len() as f64;
        let (sum_x, sum_y) = nodes.iter().map(xy).fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
        let shift_x = (sum_x / n - self.center.0) * self.strength;
        let shift_y = (sum_y / n - self.center.1) * self.strength;
        for node in nodes.iter_mut() {
            let (x, y) = xy(node);
            node.x = Some(x - shift_x);
            node.y = Some(y - shift_y);
        }
    }
}

/// Resolves overlapping node disks.
///
/// Candidate pairs come from a quadtree over the predicted positions
/// `(x + vx, y + vy)`, pruned at the node's radius plus the largest radius.
struct CollideForce {
    radii: Vec<f64>,
}

impl CollideForce {
    fn apply(&self, nodes: &mut [Node], rng: &mut StdRng) {
        let n = nodes.len().min(self.radii.len());
        if n < 2 {
            return;
        }
        let predicted: Vec<(f64, f64)> = nodes[..n]
            .iter()
            .map(|node| {
                let (x, y) = xy(node);
                (x + node.vx, y + node.vy)
            })
            .collect();
        let tree = QuadTree::build(&predicted, MAX_TREE_DEPTH);
        let max_radius = self.radii[..n].iter().copied().fold(0.0, f64::max);

        let mut near = Vec::new();
        for i in 0..n {
            let ri = self.radii[i];
            let ri2 = ri * ri;
            let (px, py) = xy(&nodes[i]);
            let xi = px + nodes[i].vx;
            let yi = py + nodes[i].vy;

            let (tx, ty) = predicted[i];
            tree.points_near(tx, ty, ri + max_radius, &mut near);
            for &j in near.iter().filter(|&&j| j > i) {
                let rj = self.radii[j];
                let (qx, qy) = xy(&nodes[j]);
                let mut x = xi - (qx + nodes[j].vx);
                let mut y = yi - (qy + nodes[j].vy);
                let mut l = x * x + y * y;
                let r = ri + rj;
                if l >= r * r {
                    continue;
                }
                if x == 0.0 {
                    x = jiggle(rng);
                    l += x * x;
                }
                if y == 0.0 {
                    y = jiggle(rng);
                    l += y * y;
                }
                let dist = l.sqrt();
                let k = (r - dist) / dist * COLLISION_STRENGTH;
                x *= k;
                y *= k;
                let rj2 = rj * rj;
                let share = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };

                nodes[i].vx += x * share;
                nodes[i].vy += y * share;
                nodes[j].vx -= x * (1.0 - share);
                nodes[j].vy -= y * (1.0 - share);
            }
        }
    }
}

/// Pulls each node toward the ring at `depth * RADIAL_RING_SPACING`.
struct RadialForce {
    center: (f64, f64),
    radii: Vec<f64>,
}

impl RadialForce {
    fn apply(&self, nodes: &mut [Node], alpha: f64) {
        for (node, &radius) in nodes.iter_mut().zip(&self.radii) {
            let (x, y) = xy(node);
            let mut dx = x - self.center.0;
            let mut dy = y - self.center.1;
            if dx == 0.0 {
                dx = 1e-6;
            }
            if dy == 0.0 {
                dy = 1e-6;
            }
            let r = (dx * dx + dy * dy).sqrt();
            let k = (radius - r) * RADIAL_STRENGTH * alpha / r;
            node.vx += dx * k;
            node.vy += dy * k;
        }
    }
}

/// Weak per-axis pull toward a per-type anchor. X and Y always travel together.
struct ClusterForce {
    anchors: Vec<(f64, f64)>,
}

impl ClusterForce {
    fn apply(&self, nodes: &mut [Node], alpha: f64) {
        for (node, &(ax, ay)) in nodes.iter_mut().zip(&self.anchors) {
            let (x, y) = xy(node);
            node.vx += (ax - x) * CLUSTER_STRENGTH * alpha;
            node.vy += (ay - y) * CLUSTER_STRENGTH * alpha;
        }
    }
}

/// The composed force set for one node/edge snapshot.
pub(crate) struct Forces {
    link: LinkForce,
    charge: ManyBodyForce,
    center: CenterForce,
    collision: Option<CollideForce>,
    radial: RadialForce,
    cluster: Option<ClusterForce>,
}

impl Forces {
    /// Derive all forces from the current nodes, edges and configuration.
    /// Edges naming unknown nodes are skipped.
    pub(crate) fn build(
        nodes: &[Node],
        edges: &[Edge],
        index: &HashMap<String, usize>,
        config: &LayoutConfig,
    ) -> Self {
        let center = config.center();
        let style = NodeStyle::new(config.node_radius);

        let collision = config.enable_collision.then(|| CollideForce {
            radii: nodes
                .iter()
                .map(|n| style.radius(n) + COLLISION_PADDING)
                .collect(),
        });

        let cluster = config.cluster_by_type.then(|| ClusterForce {
            anchors: nodes
                .iter()
                .map(|n| cluster_anchor(n.node_type, config.width, config.height))
                .collect(),
        });

        Self {
            link: LinkForce::new(edges, index, config),
            charge: ManyBodyForce {
                strength: config.charge_strength,
            },
            center: CenterForce {
                center,
                strength: CENTER_STRENGTH,
            },
            collision,
            radial: RadialForce {
                center,
                radii: nodes
                    .iter()
                    .map(|n| f64::from(n.depth) * RADIAL_RING_SPACING)
                    .collect(),
            },
            cluster,
        }
    }

    /// Apply every force once, in registration order.
    pub(crate) fn apply(&self, nodes: &mut [Node], alpha: f64, rng: &mut StdRng) {
        self.link.apply(nodes, alpha, rng);
        self.charge.apply(nodes, alpha, rng);
        self.center.apply(nodes);
        if let Some(collision) = &self.collision {
            collision.apply(nodes, rng);
        }
        self.radial.apply(nodes, alpha);
        if let Some(cluster) = &self.cluster {
            cluster.apply(nodes, alpha);
        }
    }

    /// Names of the active forces, in registration order.
    pub(crate) fn names(&self) -> Vec<&'static str> {
        let mut names = vec!["link", "charge", "center"];
        if self.collision.is_some() {
            names.push("collision");
        }
        names.push("radial");
        if self.cluster.is_some() {
            names.extend(["cluster-x", "cluster-y"]);
        }
        names
    }

    /// Number of links that resolved to two known, distinct nodes.
    pub(crate) fn link_count(&self) -> usize {
        self.link.links.len()
    }
}
