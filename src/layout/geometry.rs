use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::graph::NodeKind;

pub fn node_radius(kind: NodeKind, child_count: usize) -> f32 {
    let children = child_count as f32;
    match kind {
        NodeKind::File => (30.0 + 3.0 * children).max(45.0),
        NodeKind::Class | NodeKind::Interface => (20.0 + 2.5 * children).max(30.0),
        NodeKind::Method | NodeKind::Function => 12.0,
        NodeKind::Import => 8.0,
        _ => 10.0,
    }
}

pub fn boundary_radius(viewport: Vec2) -> f32 {
    0.45 * viewport.x.min(viewport.y).max(0.0)
}

/// Uniformly distributed point inside the disk (area-uniform, not
/// radius-uniform).
pub fn random_disk_position<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = radius.max(0.0) * rng.gen_range(0.0_f32..1.0).sqrt();
    center + vec2(angle.cos(), angle.sin()) * distance
}

/// Sunflower placement: golden-angle rotation with `sqrt` radial spacing.
pub fn spiral_position(index: usize, count: usize, center: Vec2, radius: f32) -> Vec2 {
    if count == 0 {
        return center;
    }

    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let theta = index as f32 * golden_angle;
    let distance = (index as f32 / count as f32).sqrt() * radius;
    center + vec2(theta.cos(), theta.sin()) * distance
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn radius_follows_kind_policy() {
        assert_eq!(node_radius(NodeKind::File, 0), 45.0);
        assert_eq!(node_radius(NodeKind::File, 10), 60.0);
        assert_eq!(node_radius(NodeKind::Class, 2), 30.0);
        assert_eq!(node_radius(NodeKind::Interface, 8), 40.0);
        assert_eq!(node_radius(NodeKind::Method, 5), 12.0);
        assert_eq!(node_radius(NodeKind::Function, 0), 12.0);
        assert_eq!(node_radius(NodeKind::Import, 3), 8.0);
        assert_eq!(node_radius(NodeKind::Variable, 3), 10.0);
        assert_eq!(node_radius(NodeKind::Other, 40), 10.0);
    }

    #[test]
    fn radius_is_monotonic_in_child_count_for_containers() {
        for kind in [NodeKind::File, NodeKind::Class, NodeKind::Interface] {
            let radii = (0..64).map(|count| node_radius(kind, count)).collect::<Vec<_>>();
            assert!(radii.windows(2).all(|pair| pair[0] <= pair[1]), "{kind:?}");
        }

        for kind in [NodeKind::Method, NodeKind::Function, NodeKind::Import] {
            let first = node_radius(kind, 0);
            assert!((0..64).all(|count| node_radius(kind, count) == first), "{kind:?}");
        }
    }

    #[test]
    fn random_positions_stay_inside_the_disk() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = vec2(10.0, -4.0);

        for _ in 0..500 {
            let position = random_disk_position(&mut rng, center, 90.0);
            assert!((position - center).length() <= 90.0 + 1e-3);
        }
    }

    #[test]
    fn spiral_spreads_nodes_within_radius() {
        let count = 50;
        let positions = (0..count)
            .map(|index| spiral_position(index, count, Vec2::ZERO, 100.0))
            .collect::<Vec<_>>();

        assert_eq!(positions[0], Vec2::ZERO);
        assert!(positions.iter().all(|position| position.length() <= 100.0 + 1e-3));
        for (index, a) in positions.iter().enumerate() {
            for b in &positions[index + 1..] {
                assert!((*a - *b).length() > 1.0);
            }
        }
    }

    #[test]
    fn boundary_uses_smaller_viewport_side() {
        assert!((boundary_radius(vec2(1000.0, 600.0)) - 270.0).abs() < 1e-3);
    }
}
