//! Force-directed layout of a normalized code graph.
//!
//! A [`Simulation`] owns named forces, constraints and an integrator and
//! advances a slice of [`LayoutNode`]s one tick at a time. [`LayoutEngine`]
//! wraps it with the load/simulate/settle lifecycle, drag pinning and the
//! position reset.

mod config;
mod engine;
mod forces;
mod geometry;
mod quadtree;
mod simulation;

use eframe::egui::Vec2;

use crate::graph::NodeKind;

pub use config::LayoutConfig;
pub use engine::{EngineState, LayoutEngine};
pub use forces::{BoundaryConstraint, CenterForce, CollisionForce, LinkForce, ManyBodyForce};
pub use geometry::{boundary_radius, node_radius, random_disk_position, spiral_position};
pub use simulation::{Constraint, Force, Integrator, Simulation, TickListener, VelocityDecay};

#[derive(Clone, Debug)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position. While set, the integrator keeps the node here.
    pub pin: Option<Vec2>,
    pub radius: f32,
    pub level: usize,
}

impl LayoutNode {
    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    pub kind: String,
}
