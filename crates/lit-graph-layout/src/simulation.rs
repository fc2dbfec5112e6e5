//! The layout engine: a tick-driven force simulation over the host's nodes.

use std::collections::HashMap;
use std::f64::consts::PI;

use lit_graph_core::{Edge, Graph, Node};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{LayoutConfig, LayoutPatch};
use crate::forces::Forces;
use crate::style::NodeStyle;
use crate::{DRAG_ALPHA_TARGET, REHEAT_ALPHA};

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const INITIAL_RADIUS: f64 = 10.0;
const JIGGLE_SEED: u64 = 0x5eed;

type TickCallback = Box<dyn FnMut(&[Node])>;
type EndCallback = Box<dyn FnMut()>;

/// Current state of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// No graph attached yet.
    Uninitialized,
    /// Ticks advance the simulation.
    Running,
    /// Stopped by the host.
    Paused,
    /// Alpha fell below its minimum; the simulation has settled.
    Settled,
}

/// Force-directed layout over a geometric view of the host's graph.
///
/// The engine copies node and edge data on [`initialize`](Self::initialize)
/// and [`update_graph`](Self::update_graph); topology is always supplied by
/// the host. Only geometry (`x`, `y`, `vx`, `vy`, `fx`, `fy`) is owned here and
/// can be written back with [`apply_geometry`](Self::apply_geometry).
pub struct LayoutEngine {
    config: LayoutConfig,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
    forces: Forces,
    state: LayoutState,
    alpha: f64,
    alpha_target: f64,
    alpha_decay: f64,
    iteration: u64,
    dragging: Option<String>,
    rng: StdRng,
    on_tick: Option<TickCallback>,
    on_end: Option<EndCallback>,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("state", &self.state)
            .field("alpha", &self.alpha)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    /// Create an engine with no graph attached.
    pub fn new(config: LayoutConfig) -> Self {
        let forces = Forces::build(&[], &[], &HashMap::new(), &config);
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            forces,
            state: LayoutState::Uninitialized,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            iteration: 0,
            dragging: None,
            rng: StdRng::seed_from_u64(JIGGLE_SEED),
            on_tick: None,
            on_end: None,
        }
    }

    /// Attach the simulation to a fresh node/edge set at full energy.
    ///
    /// Positions supplied by the host are kept; unplaced nodes are seeded on
    /// a phyllotaxis spiral around the canvas center.
    pub fn initialize(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.iteration = 0;
        self.dragging = None;
        self.rebuild();
        self.state = LayoutState::Running;

        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            links = self.forces.link_count(),
            "Layout initialized"
        );
    }

    /// Replace the node/edge set while preserving the layout.
    ///
    /// Previously known nodes keep their position, velocity and pin; only
    /// new nodes are seeded. The simulation is reheated rather than
    /// restarted. Before [`initialize`](Self::initialize) this is equivalent
    /// to it.
    ///
    /// `fx`/`fy` on incoming nodes are honored only for nodes the engine has
    /// not seen yet. Pins on known nodes are owned by the engine and change
    /// through [`pin`](Self::pin) and [`release_pin`](Self::release_pin).
    pub fn update_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        if self.state == LayoutState::Uninitialized {
            self.initialize(nodes, edges);
            return;
        }

        let mut previous: HashMap<String, Node> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();

        let mut added = 0usize;
        self.nodes = nodes
            .into_iter()
            .map(|mut node| {
                match previous.remove(&node.id) {
                    Some(old) => {
                        node.x = old.x;
                        node.y = old.y;
                        node.vx = old.vx;
                        node.vy = old.vy;
                        node.fx = old.fx;
                        node.fy = old.fy;
                    }
                    None => added += 1,
                }
                node
            })
            .collect();
        self.edges = edges;
        self.rebuild();

        // A node removed mid-drag ends the gesture.
        if let Some(id) = &self.dragging {
            if !self.index.contains_key(id) {
                self.dragging = None;
                self.alpha_target = 0.0;
            }
        }

        self.reheat();

        debug!(
            nodes = self.nodes.len(),
            added,
            removed = previous.len(),
            edges = self.edges.len(),
            "Layout graph updated"
        );
    }

    /// Re-index nodes, seed unplaced ones and rebuild every force.
    fn rebuild(&mut self) {
        self.index.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            self.index.entry(node.id.clone()).or_insert(i);
        }

        let (cx, cy) = self.config.center();
        let initial_angle = PI * (3.0 - 5f64.sqrt());
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if let Some(fx) = node.fx {
                node.x = Some(fx);
            }
            if let Some(fy) = node.fy {
                node.y = Some(fy);
            }
            if node.position().is_none() {
                let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * initial_angle;
                node.x = Some(cx + radius * angle.cos());
                node.y = Some(cy + radius * angle.sin());
            }
            if !node.vx.is_finite() || !node.vy.is_finite() {
                node.vx = 0.0;
                node.vy = 0.0;
            }
        }

        self.forces = Forces::build(&self.nodes, &self.edges, &self.index, &self.config);
    }

    /// Register the per-step callback. It runs synchronously inside
    /// [`tick`](Self::tick) and should only schedule a redraw.
    pub fn on_tick(&mut self, callback: impl FnMut(&[Node]) + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    /// Register the callback fired once when the simulation settles.
    pub fn on_end(&mut self, callback: impl FnMut() + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    /// Advance the simulation by one step.
    ///
    /// Returns `false` without doing anything unless the engine is running.
    pub fn tick(&mut self) -> bool {
        if self.state != LayoutState::Running {
            return false;
        }

        self.step();

        if let Some(callback) = self.on_tick.as_mut() {
            callback(&self.nodes);
        }

        if self.alpha < ALPHA_MIN {
            self.state = LayoutState::Settled;
            info!(iterations = self.iteration, "Layout settled");
            if let Some(callback) = self.on_end.as_mut() {
                callback();
            }
        }

        true
    }

    /// Tick until the simulation settles or `max_ticks` steps have run.
    /// Returns the number of steps taken.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut steps = 0;
        while steps < max_ticks && self.tick() {
            steps += 1;
        }
        steps
    }

    fn step(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.forces.apply(&mut self.nodes, self.alpha, &mut self.rng);

        let keep = 1.0 - VELOCITY_DECAY;
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = Some(fx);
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.x = Some(node.x.unwrap_or(0.0) + node.vx);
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = Some(fy);
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= keep;
                    node.y = Some(node.y.unwrap_or(0.0) + node.vy);
                }
            }
        }
        self.iteration += 1;
    }

    /// Resume ticking without changing the energy.
    pub fn start(&mut self) {
        if self.state != LayoutState::Uninitialized {
            self.state = LayoutState::Running;
        }
    }

    /// Stop ticking; geometry is left as is.
    pub fn stop(&mut self) {
        if self.state == LayoutState::Running {
            self.state = LayoutState::Paused;
        }
    }

    /// Raise the simulation energy so settled nodes resume moving.
    pub fn reheat(&mut self) {
        self.alpha = self.alpha.max(REHEAT_ALPHA);
        self.start();
    }

    /// Merge a partial configuration, rebuild the forces and reheat.
    pub fn update_config(&mut self, patch: &LayoutPatch) {
        patch.apply_to(&mut self.config);
        self.forces = Forces::build(&self.nodes, &self.edges, &self.index, &self.config);
        debug!(config = ?self.config, "Layout config updated");
        self.reheat();
    }

    /// Toggle the per-type clustering force (both axes together).
    pub fn set_cluster_by_type(&mut self, enabled: bool) {
        self.update_config(&LayoutPatch {
            cluster_by_type: Some(enabled),
            ..LayoutPatch::default()
        });
    }

    /// Begin a drag gesture: pin the node where it is and keep the
    /// simulation warm so neighbours react live.
    pub fn drag_started(&mut self, id: &str) {
        let Some(&i) = self.index.get(id) else {
            debug!(id, "Drag started on unknown node");
            return;
        };
        if self.dragging.is_none() {
            self.alpha_target = DRAG_ALPHA_TARGET;
            self.start();
        }
        let node = &mut self.nodes[i];
        node.fx = node.x;
        node.fy = node.y;
        self.dragging = Some(id.to_string());
    }

    /// Move the pin of a dragged node to the pointer position.
    pub fn dragged(&mut self, id: &str, x: f64, y: f64) {
        if let Some(&i) = self.index.get(id) {
            self.nodes[i].fx = Some(x);
            self.nodes[i].fy = Some(y);
        }
    }

    /// End a drag gesture. The pin stays unless
    /// [`LayoutConfig::release_pin_on_drag_end`] is set.
    pub fn drag_ended(&mut self, id: &str) {
        self.alpha_target = 0.0;
        self.dragging = None;
        if self.config.release_pin_on_drag_end {
            self.release_pin(id);
        }
    }

    /// Pin a node at a position.
    pub fn pin(&mut self, id: &str, x: f64, y: f64) {
        if let Some(&i) = self.index.get(id) {
            self.nodes[i].fx = Some(x);
            self.nodes[i].fy = Some(y);
        }
    }

    /// Clear a node's pin so the simulation moves it again.
    pub fn release_pin(&mut self, id: &str) {
        if let Some(&i) = self.index.get(id) {
            self.nodes[i].fx = None;
            self.nodes[i].fy = None;
        }
    }

    /// Drawn radius of `node` under the current configuration.
    pub fn node_radius(&self, node: &Node) -> f64 {
        NodeStyle::new(self.config.node_radius).radius(node)
    }

    /// First node in `nodes` whose disk contains `(x, y)`.
    pub fn find_node_at<'a>(&self, x: f64, y: f64, nodes: &'a [Node]) -> Option<&'a Node> {
        NodeStyle::new(self.config.node_radius).find_node_at(x, y, nodes)
    }

    /// Hit-test against the engine's own nodes.
    pub fn node_at(&self, x: f64, y: f64) -> Option<&Node> {
        self.find_node_at(x, y, &self.nodes)
    }

    /// Copy geometry back into the host's graph, matching nodes by id.
    /// Returns the number of nodes updated.
    pub fn apply_geometry(&self, graph: &mut Graph) -> usize {
        let mut updated = 0;
        for node in &mut graph.nodes {
            if let Some(&i) = self.index.get(&node.id) {
                let source = &self.nodes[i];
                node.x = source.x;
                node.y = source.y;
                node.vx = source.vx;
                node.vy = source.vy;
                node.fx = source.fx;
                node.fy = source.fy;
                updated += 1;
            }
        }
        updated
    }

    /// Stop the simulation and release it.
    pub fn destroy(mut self) {
        self.stop();
        self.on_tick = None;
        self.on_end = None;
        debug!(iterations = self.iteration, "Layout destroyed");
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LayoutState::Running
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Names of the active forces, in application order.
    pub fn force_names(&self) -> Vec<&'static str> {
        self.forces.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lit_graph_core::{EdgeType, NodeType};

    fn triangle() -> (Vec<Node>, Vec<Edge>) {
        (
            vec![
                Node::new("a", NodeType::Book, "A"),
                Node::new("b", NodeType::Author, "B").with_depth(1),
                Node::new("c", NodeType::Theme, "C").with_depth(1),
            ],
            vec![
                Edge::new("ab", "a", "b", EdgeType::WrittenBy),
                Edge::new("ac", "a", "c", EdgeType::HasTheme),
            ],
        )
    }

    #[test]
    fn test_update_before_initialize() {
        let (nodes, edges) = triangle();
        let mut engine = LayoutEngine::default();
        assert_eq!(engine.state(), LayoutState::Uninitialized);
        engine.update_graph(nodes, edges);
        assert_eq!(engine.state(), LayoutState::Running);
        assert_eq!(engine.alpha(), 1.0);
        assert!(engine.nodes().iter().all(|n| n.position().is_some()));
    }

    #[test]
    fn test_tick_noop_until_initialized() {
        let mut engine = LayoutEngine::default();
        assert!(!engine.tick());
        engine.start();
        assert_eq!(engine.state(), LayoutState::Uninitialized);
    }

    #[test]
    fn test_stop_and_start() {
        let (nodes, edges) = triangle();
        let mut engine = LayoutEngine::default();
        engine.initialize(nodes, edges);
        engine.stop();
        assert!(!engine.tick());
        engine.start();
        assert!(engine.tick());
        assert_eq!(engine.iteration(), 1);
    }

    #[test]
    fn test_host_positions_kept_on_initialize() {
        let mut engine = LayoutEngine::default();
        engine.initialize(vec![Node::new("a", NodeType::Book, "A").at(3.0, 4.0)], vec![]);
        assert_eq!(engine.node("a").unwrap().position(), Some((3.0, 4.0)));
    }

    #[test]
    fn test_drag_raises_and_restores_alpha_target() {
        let (nodes, edges) = triangle();
        let mut engine = LayoutEngine::default();
        engine.initialize(nodes, edges);
        engine.drag_started("a");
        assert_eq!(engine.alpha_target(), DRAG_ALPHA_TARGET);
        engine.drag_ended("a");
        assert_eq!(engine.alpha_target(), 0.0);
    }

    #[test]
    fn test_drag_unknown_node_is_noop() {
        let (nodes, edges) = triangle();
        let mut engine = LayoutEngine::default();
        engine.initialize(nodes, edges);
        engine.drag_started("zzz");
        engine.dragged("zzz", 1.0, 1.0);
        assert_eq!(engine.alpha_target(), 0.0);
        assert!(engine.nodes().iter().all(|n| !n.is_pinned()));
    }

    #[test]
    fn test_update_config_rebuilds_forces() {
        let (nodes, edges) = triangle();
        let mut engine = LayoutEngine::default();
        engine.initialize(nodes, edges);
        assert!(engine.force_names().contains(&"collision"));
        engine.update_config(&LayoutPatch {
            enable_collision: Some(false),
            ..Default::default()
        });
        assert!(!engine.force_names().contains(&"collision"));
        engine.set_cluster_by_type(true);
        assert!(engine.force_names().contains(&"cluster-x"));
        assert!(engine.force_names().contains(&"cluster-y"));
    }
}
