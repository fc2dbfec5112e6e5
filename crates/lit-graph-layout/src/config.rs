//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the layout engine.
///
/// Values are not validated. Out-of-range settings (negative radius, positive
/// charge) produce odd but well-defined layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Base node radius before type and depth scaling.
    pub node_radius: f64,
    /// Base rest length of link springs.
    pub link_distance: f64,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    /// Resolve overlapping node disks.
    pub enable_collision: bool,
    /// Pull same-type nodes toward a shared anchor.
    pub cluster_by_type: bool,
    /// Clear the pin when a drag gesture ends.
    pub release_pin_on_drag_end: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            node_radius: 8.0,
            link_distance: 100.0,
            charge_strength: -300.0,
            enable_collision: true,
            cluster_by_type: false,
            release_pin_on_drag_end: false,
        }
    }
}

impl LayoutConfig {
    /// Canvas midpoint.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Rest length of a link with the given strength.
    pub fn link_rest_length(&self, strength: f64) -> f64 {
        self.link_distance * (1.0 + strength * 0.5)
    }
}

/// Partial configuration update; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub node_radius: Option<f64>,
    pub link_distance: Option<f64>,
    pub charge_strength: Option<f64>,
    pub enable_collision: Option<bool>,
    pub cluster_by_type: Option<bool>,
    pub release_pin_on_drag_end: Option<bool>,
}

impl LayoutPatch {
    /// Merge this patch into `config`.
    pub fn apply_to(&self, config: &mut LayoutConfig) {
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.node_radius {
            config.node_radius = v;
        }
        if let Some(v) = self.link_distance {
            config.link_distance = v;
        }
        if let Some(v) = self.charge_strength {
            config.charge_strength = v;
        }
        if let Some(v) = self.enable_collision {
            config.enable_collision = v;
        }
        if let Some(v) = self.cluster_by_type {
            config.cluster_by_type = v;
        }
        if let Some(v) = self.release_pin_on_drag_end {
            config.release_pin_on_drag_end = v;
        }
    }
}
