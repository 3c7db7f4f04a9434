use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use super::simulation::{Constraint, Force};
use super::{LayoutEdge, LayoutNode};

/// Tiny deterministic offset for coincident points. The sign flips with the
/// argument order so the two nodes of a pair are pushed apart, not together.
fn jiggle(a: usize, b: usize) -> Vec2 {
    let (low, high) = (a.min(b), a.max(b));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let offset = vec2(angle.cos(), angle.sin()) * 1e-3;
    if a <= b { offset } else { -offset }
}

struct Link {
    source: usize,
    target: usize,
    distance: f32,
    bias: f32,
}

/// Spring along every edge toward `source.radius + target.radius + padding`.
/// The correction is split by degree so hubs move less than leaves.
pub struct LinkForce {
    links: Vec<Link>,
    strength: f32,
}

impl LinkForce {
    pub fn new(edges: &[LayoutEdge], nodes: &[LayoutNode], padding: f32, strength: f32) -> Self {
        let node_count = nodes.len();
        let mut degree = vec![0usize; node_count];
        for edge in edges {
            if edge.source < node_count && edge.target < node_count {
                degree[edge.source] += 1;
                degree[edge.target] += 1;
            }
        }

        let links = edges
            .iter()
            .filter(|edge| {
                edge.source < node_count && edge.target < node_count && edge.source != edge.target
            })
            .map(|edge| {
                let source_degree = degree[edge.source] as f32;
                let target_degree = degree[edge.target] as f32;
                Link {
                    source: edge.source,
                    target: edge.target,
                    distance: nodes[edge.source].radius + nodes[edge.target].radius + padding,
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        Self { links, strength }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Force for LinkForce {
    fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f32) {
        for link in &self.links {
            let source = &nodes[link.source];
            let target = &nodes[link.target];
            let mut delta =
                (target.position + target.velocity) - (source.position + source.velocity);
            if delta.length_sq() == 0.0 {
                delta = jiggle(link.source, link.target);
            }

            let length = delta.length();
            let correction = delta * ((length - link.distance) / length * alpha * self.strength);

            nodes[link.target].velocity -= correction * link.bias;
            nodes[link.source].velocity += correction * (1.0 - link.bias);
        }
    }
}

#[derive(Clone, Copy)]
struct ChargeParams {
    strength: f32,
    theta: f32,
    distance_min_sq: f32,
    alpha: f32,
}

/// Inverse-distance repulsion between all node pairs, approximated with a
/// Barnes-Hut quadtree for far-away groups.
pub struct ManyBodyForce {
    strength: f32,
    theta: f32,
    distance_min: f32,
    scratch: Vec<Vec2>,
}

impl ManyBodyForce {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            theta: 0.9,
            distance_min: 1.0,
            scratch: Vec::new(),
        }
    }

    pub fn with_theta(mut self, theta: f32) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_distance_min(mut self, distance_min: f32) -> Self {
        self.distance_min = distance_min;
        self
    }
}

fn charge_impulse(mut delta: Vec2, weight: f32, pair: (usize, usize), params: ChargeParams) -> Vec2 {
    if delta.length_sq() == 0.0 {
        delta = jiggle(pair.0, pair.1);
    }

    let mut distance_sq = delta.length_sq();
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }

    delta * (params.strength * weight * params.alpha / distance_sq)
}

fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *velocity += charge_impulse(
                positions[other_index] - point,
                1.0,
                (index, other_index),
                params,
            );
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let distance = delta.length().max(1e-4);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < params.theta
        && node.mass > 1.0;

    if can_approximate {
        *velocity += charge_impulse(delta, node.mass, (index, usize::MAX), params);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge(child, index, positions, params, velocity);
    }
}

impl Force for ManyBodyForce {
    fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f32) {
        if nodes.len() < 2 {
            return;
        }

        self.scratch.clear();
        self.scratch.extend(nodes.iter().map(|node| node.position));
        let Some(tree) = QuadNode::build(&self.scratch) else {
            return;
        };

        let params = ChargeParams {
            strength: self.strength,
            theta: self.theta,
            distance_min_sq: self.distance_min * self.distance_min,
            alpha,
        };
        for (index, node) in nodes.iter_mut().enumerate() {
            accumulate_charge(&tree, index, &self.scratch, params, &mut node.velocity);
        }
    }
}

/// Translates every node so the centroid moves toward `center`.
pub struct CenterForce {
    center: Vec2,
    strength: f32,
}

impl CenterForce {
    pub fn new(center: Vec2, strength: f32) -> Self {
        Self { center, strength }
    }
}

impl Force for CenterForce {
    fn apply(&mut self, nodes: &mut [LayoutNode], _alpha: f32) {
        if nodes.is_empty() {
            return;
        }

        let centroid =
            nodes.iter().fold(Vec2::ZERO, |sum, node| sum + node.position) / nodes.len() as f32;
        let shift = (centroid - self.center) * self.strength;
        for node in nodes {
            node.position -= shift;
        }
    }
}

/// Pushes apart nodes closer than `radius_a + radius_b + 2 * padding`,
/// sharing the correction by squared radius so small nodes yield to big ones.
pub struct CollisionForce {
    padding: f32,
    strength: f32,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
}

impl CollisionForce {
    pub fn new(padding: f32, strength: f32) -> Self {
        Self {
            padding,
            strength,
            predicted: Vec::new(),
            radii: Vec::new(),
        }
    }
}

impl Force for CollisionForce {
    fn apply(&mut self, nodes: &mut [LayoutNode], _alpha: f32) {
        if nodes.len() < 2 {
            return;
        }

        self.predicted.clear();
        self.radii.clear();
        let mut max_radius = 0.0_f32;
        for node in nodes.iter() {
            self.predicted.push(node.position + node.velocity);
            let radius = node.radius + self.padding;
            self.radii.push(radius);
            max_radius = max_radius.max(radius);
        }

        let Some(tree) = QuadNode::build(&self.predicted) else {
            return;
        };

        let predicted = &self.predicted;
        let radii = &self.radii;
        let strength = self.strength;
        let reach = max_radius * 2.0;
        tree.visit_close_pairs(reach * reach, &mut |a: usize, b: usize| {
            let combined = radii[a] + radii[b];
            let mut delta = predicted[a] - predicted[b];
            if delta.length_sq() >= combined * combined {
                return;
            }
            if delta.length_sq() == 0.0 {
                delta = jiggle(a, b);
            }

            let distance = delta.length();
            let push = delta * ((combined - distance) / distance * strength);
            let radius_a_sq = radii[a] * radii[a];
            let radius_b_sq = radii[b] * radii[b];
            let share = radius_b_sq / (radius_a_sq + radius_b_sq);

            nodes[a].velocity += push * share;
            nodes[b].velocity -= push * (1.0 - share);
        });
    }
}

/// Keeps free nodes inside a disk: anything farther than
/// `boundary_radius - node.radius - padding` from the center is pulled back
/// onto that circle.
pub struct BoundaryConstraint {
    center: Vec2,
    boundary_radius: f32,
    padding: f32,
}

impl BoundaryConstraint {
    pub fn new(center: Vec2, boundary_radius: f32, padding: f32) -> Self {
        Self {
            center,
            boundary_radius,
            padding,
        }
    }
}

impl Constraint for BoundaryConstraint {
    fn constrain(&mut self, nodes: &mut [LayoutNode]) {
        for node in nodes.iter_mut().filter(|node| !node.is_pinned()) {
            let limit = (self.boundary_radius - node.radius - self.padding).max(0.0);
            let offset = node.position - self.center;
            let distance = offset.length();
            if distance > limit {
                node.position = self.center + offset * (limit / distance);
            }
        }
    }
}
