use std::time::Duration;

use eframe::egui::{Vec2, vec2};

use super::geometry::boundary_radius;

/// Tuning for the layout simulation. The defaults are the values the viewer
/// ships with; the CLI only overrides viewport, seed and settle timeout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Size of the area the graph is laid out in. World coordinates are
    /// centered on the origin, so the viewport spans `-viewport / 2..viewport / 2`.
    pub viewport: Vec2,
    /// Extra distance added to the sum of both endpoint radii for links.
    pub link_padding: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub charge_theta: f32,
    pub charge_distance_min: f32,
    pub center_strength: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub boundary_padding: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub reheat_alpha: f32,
    pub drag_alpha_target: f32,
    /// Wall-clock budget after a (re)start before every node is pinned.
    /// `None` settles on alpha decay alone.
    pub settle_timeout: Option<Duration>,
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport: vec2(1200.0, 800.0),
            link_padding: 100.0,
            link_strength: 0.05,
            charge_strength: -400.0,
            charge_theta: 0.9,
            charge_distance_min: 1.0,
            center_strength: 0.01,
            collision_padding: 30.0,
            collision_strength: 0.9,
            boundary_padding: 20.0,
            alpha_decay: 0.05,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            reheat_alpha: 0.3,
            drag_alpha_target: 0.3,
            settle_timeout: Some(Duration::from_secs(3)),
            seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn center(&self) -> Vec2 {
        Vec2::ZERO
    }

    pub fn boundary_radius(&self) -> f32 {
        boundary_radius(self.viewport)
    }
}
