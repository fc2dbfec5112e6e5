//! Force-directed layout engine for the lit-graph exploration view.
//!
//! The engine owns a geometric view of the host's nodes and advances a
//! d3-style physical simulation one step per [`LayoutEngine::tick`]. It never
//! spawns threads: the host calls `tick` from its animation-frame scheduler
//! and reads positions back after each step.
//!
//! ## Forces
//!
//! ```text
//!   link ──▶ charge ──▶ center ──▶ collision? ──▶ radial ──▶ cluster?
//!    │         │          │           │             │           │
//!  springs  Barnes-Hut  mean shift  disk overlap  depth ring  per-type
//!  on edges repulsion   to canvas   resolution    × 150       anchors
//! ```
//!
//! Positions are integrated with velocity decay after all forces have
//! contributed. Pinned nodes (`fx`/`fy`) are held in place.

mod config;
mod forces;
mod quadtree;
mod simulation;
mod style;

pub use config::{LayoutConfig, LayoutPatch};
pub use quadtree::QuadTree;
pub use simulation::{LayoutEngine, LayoutState};
pub use style::{cluster_anchor, node_color, type_multiplier, NodeStyle};

/// Alpha restored by [`LayoutEngine::reheat`] and graph updates.
pub const REHEAT_ALPHA: f64 = 0.3;

/// Alpha target held while a drag gesture is active.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Distance between consecutive depth rings of the radial force.
pub const RADIAL_RING_SPACING: f64 = 150.0;

/// Fraction of the mean offset corrected by the center force each tick.
pub const CENTER_STRENGTH: f64 = 0.1;

/// Strength of the radial force.
pub const RADIAL_STRENGTH: f64 = 0.3;

/// Strength of the per-type clustering force.
pub const CLUSTER_STRENGTH: f64 = 0.1;

/// Padding added to the drawn radius for collision detection.
pub const COLLISION_PADDING: f64 = 4.0;
