use std::time::Duration;

use eframe::egui::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::config::LayoutConfig;
use super::forces::{BoundaryConstraint, CenterForce, CollisionForce, LinkForce, ManyBodyForce};
use super::geometry::{node_radius, random_disk_position, spiral_position};
use super::simulation::Simulation;
use super::{LayoutEdge, LayoutNode};
use crate::graph::CodeGraph;

/// Fixed integration step. Ticks are counted per frame, not scaled by the
/// frame time; the wall clock only drives the settle timeout.
const STEP: f32 = 1.0;

/// Fraction of the boundary radius covered by the reset spiral.
const SPIRAL_FILL: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loaded,
    Simulating,
    Settled,
}

pub struct LayoutEngine {
    config: LayoutConfig,
    state: EngineState,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    simulation: Simulation,
    rng: StdRng,
    elapsed: Duration,
    dragging: Option<usize>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            simulation: Simulation::new(&config),
            config,
            state: EngineState::Unloaded,
            nodes: Vec::new(),
            edges: Vec::new(),
            rng,
            elapsed: Duration::ZERO,
            dragging: None,
        }
    }

    /// Replaces whatever was laid out before with `graph`: fresh nodes at
    /// random disk positions, fresh edges and a fresh set of forces. Tick
    /// listeners survive.
    pub fn load(&mut self, graph: &CodeGraph) {
        let center = self.config.center();
        let seed_radius = self.config.boundary_radius();

        self.nodes = graph
            .nodes
            .iter()
            .map(|node| LayoutNode {
                id: node.id.clone(),
                kind: node.kind,
                position: random_disk_position(&mut self.rng, center, seed_radius),
                velocity: Vec2::ZERO,
                pin: None,
                radius: node_radius(node.kind, node.child_count),
                level: node.level,
            })
            .collect();

        self.edges = graph
            .edges
            .iter()
            .map(|edge| LayoutEdge {
                source: edge.source,
                target: edge.target,
                kind: edge.kind.clone(),
            })
            .collect();

        let config = self.config;
        self.simulation.clear_forces();
        self.simulation
            .add_force(
                "link",
                LinkForce::new(
                    &self.edges,
                    &self.nodes,
                    config.link_padding,
                    config.link_strength,
                ),
            )
            .add_force(
                "charge",
                ManyBodyForce::new(config.charge_strength)
                    .with_theta(config.charge_theta)
                    .with_distance_min(config.charge_distance_min),
            )
            .add_force("center", CenterForce::new(center, config.center_strength))
            .add_force(
                "collision",
                CollisionForce::new(config.collision_padding, config.collision_strength),
            )
            .add_constraint(
                "boundary",
                BoundaryConstraint::new(
                    center,
                    config.boundary_radius(),
                    config.boundary_padding,
                ),
            );
        self.simulation.set_alpha(1.0);
        self.simulation.set_alpha_target(0.0);

        self.elapsed = Duration::ZERO;
        self.dragging = None;
        self.state = EngineState::Loaded;
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "layout loaded"
        );
    }

    pub fn start(&mut self) {
        if self.state == EngineState::Unloaded {
            return;
        }
        self.elapsed = Duration::ZERO;
        if self.nodes.is_empty() {
            self.settle();
            return;
        }
        self.state = EngineState::Simulating;
        debug!(alpha = self.simulation.alpha(), "layout simulating");
    }

    /// Advances the simulation by one step. Returns whether anything moved,
    /// i.e. whether the host should repaint.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state != EngineState::Simulating {
            return false;
        }

        self.elapsed += elapsed;
        self.simulation.step(&mut self.nodes, STEP);

        if self.dragging.is_none() {
            let timed_out = self
                .config
                .settle_timeout
                .is_some_and(|timeout| self.elapsed >= timeout);
            if self.simulation.is_settled() || timed_out {
                self.settle();
            }
        }
        true
    }

    /// Pins every node where it currently is and stops simulating.
    pub fn settle(&mut self) {
        if self.state == EngineState::Unloaded {
            return;
        }

        for node in &mut self.nodes {
            node.pin = Some(node.position);
            node.velocity = Vec2::ZERO;
        }
        self.state = EngineState::Settled;
        info!(
            nodes = self.nodes.len(),
            alpha = self.simulation.alpha(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "layout settled"
        );
    }

    /// Lays nodes out on a golden-angle spiral, unpins them and restarts the
    /// simulation at reheat energy.
    pub fn reset_positions(&mut self) {
        if self.state == EngineState::Unloaded {
            return;
        }

        let center = self.config.center();
        let radius = self.config.boundary_radius() * SPIRAL_FILL;
        let count = self.nodes.len();
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.position = spiral_position(index, count, center, radius);
            node.velocity = Vec2::ZERO;
            node.pin = None;
        }

        self.dragging = None;
        self.simulation.set_alpha(self.config.reheat_alpha);
        self.simulation.set_alpha_target(0.0);
        self.start();
    }

    pub fn drag_start(&mut self, index: usize) -> bool {
        if matches!(self.state, EngineState::Unloaded) {
            return false;
        }
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };

        node.pin = Some(node.position);
        self.dragging = Some(index);
        self.simulation.set_alpha_target(self.config.drag_alpha_target);
        self.start();
        true
    }

    /// Moves the dragged node's pin to `pointer` (world coordinates).
    pub fn drag_to(&mut self, pointer: Vec2) {
        let Some(index) = self.dragging else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(pointer);
        }
    }

    pub fn drag_end(&mut self) {
        let Some(index) = self.dragging.take() else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
        self.simulation.set_alpha_target(0.0);
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragging
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Topmost node whose disk contains `point`, among those `visible` accepts.
    /// Later nodes are drawn over earlier ones, so the search runs backwards.
    pub fn node_at(&self, point: Vec2, visible: impl Fn(usize) -> bool) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(index, node)| {
                visible(*index) && (node.position - point).length_sq() <= node.radius * node.radius
            })
            .map(|(index, _)| index)
    }

    pub fn on_tick(&mut self, listener: impl FnMut(&[LayoutNode]) + 'static) {
        self.simulation.on_tick(listener);
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Single step that ignores the engine state. Used to check that a
    /// settled layout really is at rest.
    pub fn step_simulation(&mut self) {
        self.simulation.step(&mut self.nodes, STEP);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use eframe::egui::vec2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::{GraphDocument, normalize, parse_graph_document};

    const FRAME: Duration = Duration::from_millis(16);

    fn sample_graph() -> CodeGraph {
        let raw = r#"{
            "language": "python",
            "root_path": "/src",
            "hierarchical": [
                {"id": "a.py", "name": "a.py", "type": "file", "file": "a.py", "children": [
                    {"id": "a.py::Shape", "name": "Shape", "type": "class", "file": "a.py", "children": [
                        {"id": "a.py::Shape::area", "name": "area", "type": "method", "file": "a.py"},
                        {"id": "a.py::Shape::scale", "name": "scale", "type": "method", "file": "a.py"}
                    ]},
                    {"id": "a.py::main", "name": "main", "type": "function", "file": "a.py"}
                ]},
                {"id": "b.py", "name": "b.py", "type": "file", "file": "b.py", "children": [
                    {"id": "b.py::os", "name": "os", "type": "import", "file": "b.py"}
                ]}
            ],
            "edges": [
                {"source": "a.py::main", "target": "a.py::Shape::area", "type": "calls"},
                {"source": "a.py::Shape::scale", "target": "b.py::os", "type": "uses"}
            ]
        }"#;
        let document: GraphDocument = parse_graph_document(raw).expect("sample parses");
        normalize(&document)
    }

    fn seeded(settle_timeout: Option<Duration>) -> LayoutEngine {
        LayoutEngine::new(LayoutConfig {
            seed: Some(42),
            settle_timeout,
            ..LayoutConfig::default()
        })
    }

    fn run_until_settled(engine: &mut LayoutEngine, limit: usize) -> usize {
        let mut ticks = 0;
        while engine.state() == EngineState::Simulating {
            engine.tick(FRAME);
            ticks += 1;
            assert!(ticks <= limit, "did not settle within {limit} ticks");
        }
        ticks
    }

    #[test]
    fn load_seeds_nodes_inside_the_disk() {
        let graph = sample_graph();
        let mut engine = seeded(None);

        engine.load(&graph);

        assert_eq!(engine.state(), EngineState::Loaded);
        assert_eq!(engine.nodes().len(), 7);
        assert_eq!(engine.edges().len(), 7);
        let radius = engine.config().boundary_radius();
        assert!(engine.nodes().iter().all(|node| node.position.length() <= radius + 1e-3));
        assert!(engine.nodes().iter().all(|node| !node.is_pinned()));
        assert_eq!(
            engine.simulation().force_names().collect::<Vec<_>>(),
            vec!["link", "charge", "center", "collision"]
        );
    }

    #[test]
    fn ticks_outside_simulating_are_no_ops() {
        let graph = sample_graph();
        let mut engine = seeded(None);

        assert!(!engine.tick(FRAME));

        engine.load(&graph);
        let before = engine.nodes().to_vec();
        assert!(!engine.tick(FRAME));
        assert_eq!(
            engine.nodes().iter().map(|node| node.position).collect::<Vec<_>>(),
            before.iter().map(|node| node.position).collect::<Vec<_>>()
        );
    }

    #[test]
    fn settles_by_alpha_and_pins_every_node() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.start();

        let ticks = run_until_settled(&mut engine, 200);

        assert!(ticks >= 100, "settled after only {ticks} ticks");
        assert_eq!(engine.state(), EngineState::Settled);
        assert!(engine.alpha() < engine.config().alpha_min);
        assert!(engine.nodes().iter().all(|node| node.pin == Some(node.position)));
    }

    #[test]
    fn settles_on_timeout_before_alpha_decays() {
        let graph = sample_graph();
        let mut engine = seeded(Some(Duration::from_millis(100)));
        engine.load(&graph);
        engine.start();

        let ticks = run_until_settled(&mut engine, 20);

        assert_eq!(ticks, 7);
        assert!(engine.alpha() > engine.config().alpha_min);
        assert!(engine.nodes().iter().all(|node| node.is_pinned()));
    }

    #[test]
    fn settled_layout_stays_put() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.start();
        run_until_settled(&mut engine, 200);
        let rest = engine
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();

        assert!(!engine.tick(FRAME));
        engine.step_simulation();

        let after = engine
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert_eq!(after, rest);
    }

    #[test]
    fn nodes_stay_within_the_boundary() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.start();
        run_until_settled(&mut engine, 200);

        let config = *engine.config();
        for node in engine.nodes() {
            let limit = config.boundary_radius() - node.radius - config.boundary_padding;
            assert!(
                node.position.length() <= limit + 1e-2,
                "{} escaped to {:?}",
                node.id,
                node.position
            );
        }
    }

    #[test]
    fn reset_positions_spirals_and_restarts() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.start();
        run_until_settled(&mut engine, 200);

        engine.reset_positions();

        assert_eq!(engine.state(), EngineState::Simulating);
        assert!((engine.alpha() - 0.3).abs() < 1e-6);
        assert!(engine.nodes().iter().all(|node| !node.is_pinned()));
        assert_eq!(engine.nodes()[0].position, Vec2::ZERO);
        let radius = engine.config().boundary_radius() * SPIRAL_FILL;
        for (index, node) in engine.nodes().iter().enumerate() {
            assert_eq!(node.position, spiral_position(index, 7, Vec2::ZERO, radius));
        }
    }

    #[test]
    fn drag_pins_follows_pointer_and_releases() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.start();
        run_until_settled(&mut engine, 200);

        assert!(engine.drag_start(2));
        assert_eq!(engine.state(), EngineState::Simulating);
        assert_eq!(engine.dragged(), Some(2));

        engine.drag_to(vec2(15.0, -20.0));
        for _ in 0..300 {
            engine.tick(FRAME);
        }
        assert_eq!(engine.state(), EngineState::Simulating, "drag keeps it warm");
        assert_eq!(engine.nodes()[2].position, vec2(15.0, -20.0));

        engine.drag_end();
        assert_eq!(engine.dragged(), None);
        assert_eq!(engine.nodes()[2].pin, None);
        run_until_settled(&mut engine, 300);
        assert_eq!(engine.state(), EngineState::Settled);
    }

    #[test]
    fn drag_on_missing_node_is_ignored() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);

        assert!(!engine.drag_start(99));
        assert!(!engine.is_dragging());
        assert_eq!(engine.state(), EngineState::Loaded);
    }

    #[test]
    fn node_at_prefers_visible_topmost_node() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.reset_positions();
        let first = engine.nodes()[0].position;

        assert_eq!(engine.node_at(first, |_| true), Some(0));
        assert_eq!(engine.node_at(first, |index| index != 0), None);
        assert_eq!(engine.node_at(vec2(5_000.0, 0.0), |_| true), None);
    }

    #[test]
    fn load_discards_previous_layout() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        engine.load(&graph);
        engine.start();
        engine.drag_start(1);

        let empty = CodeGraph::default();
        engine.load(&empty);

        assert_eq!(engine.state(), EngineState::Loaded);
        assert!(engine.nodes().is_empty());
        assert!(engine.edges().is_empty());
        assert!(!engine.is_dragging());

        engine.start();
        run_until_settled(&mut engine, 200);
        assert_eq!(engine.state(), EngineState::Settled);
    }

    #[test]
    fn empty_graph_settles_as_soon_as_it_starts() {
        let mut engine = seeded(None);
        engine.load(&CodeGraph::default());

        engine.start();

        assert_eq!(engine.state(), EngineState::Settled);
        assert!(!engine.tick(FRAME));

        engine.reset_positions();
        assert_eq!(engine.state(), EngineState::Settled);
    }

    #[test]
    fn tick_listeners_survive_reload() {
        let graph = sample_graph();
        let mut engine = seeded(None);
        let ticks = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&ticks);
        engine.on_tick(move |_| counter.set(counter.get() + 1));

        engine.load(&graph);
        engine.start();
        engine.tick(FRAME);
        engine.load(&graph);
        engine.start();
        engine.tick(FRAME);

        assert_eq!(ticks.get(), 2);
    }
}
