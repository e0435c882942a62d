use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) padding: f32,
    pub(super) max_pair_distance_sq: f32,
}

fn separation_direction(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        // Coincident nodes: pick a deterministic direction from the indices so
        // repeated runs produce the same layout.
        let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

fn repulsion_between(point_a: Vec2, point_b: Vec2, strength: f32, softening: f32) -> Vec2 {
    let delta = point_a - point_b;
    let distance_sq = delta.length_sq();
    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        vec2(1.0, 0.0)
    };
    direction * (strength / (distance_sq + softening))
}

/// Barnes-Hut charge force: distant cells are approximated by their center of
/// mass when they subtend less than `theta`.
pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    softening: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other != index {
                *force += repulsion_between(point, positions[other], strength, softening);
            }
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < theta
        && node.mass > 1.0;

    if can_approximate {
        *force += (delta / distance) * ((strength * node.mass) / (distance_sq + softening));
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, strength, softening, theta, force);
    }
}

fn collide_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let delta = positions[from] - positions[to];
    let distance = delta.length();
    let min_distance = radii[from] + radii[to] + params.padding;
    if distance >= min_distance {
        return;
    }

    let direction = separation_direction(delta, distance, from, to);
    let push = (min_distance - distance) * params.strength;
    forces[from] += direction * push;
    forces[to] -= direction * push;
}

/// Dual-tree traversal applying the minimum-separation constraint to every
/// node pair closer than the collision horizon.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_pair_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                for j in (i + 1)..node_a.indices.len() {
                    collide_pair(
                        node_a.indices[i],
                        node_a.indices[j],
                        positions,
                        radii,
                        params,
                        forces,
                    );
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    collide_pair(from, to, positions, radii, params, forces);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, positions, radii, params, forces);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a, child_b, false, positions, radii, params, forces,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, params, forces);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, params, forces);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_pushes_points_apart() {
        let positions = vec![vec2(-10.0, 0.0), vec2(10.0, 0.0)];
        let tree = QuadNode::build(&positions).unwrap();

        let mut force = Vec2::ZERO;
        accumulate_repulsion_for_node(&tree, 0, &positions, 1000.0, 10.0, 0.7, &mut force);
        assert!(force.x < 0.0, "left point should be pushed further left");
        assert!(force.y.abs() < f32::EPSILON);

        let mut force = Vec2::ZERO;
        accumulate_repulsion_for_node(&tree, 1, &positions, 1000.0, 10.0, 0.7, &mut force);
        assert!(force.x > 0.0);
    }

    #[test]
    fn collision_only_fires_inside_minimum_separation() {
        let positions = vec![vec2(0.0, 0.0), vec2(8.0, 0.0), vec2(100.0, 0.0)];
        let radii = vec![6.0, 6.0, 6.0];
        let mut forces = vec![Vec2::ZERO; 3];
        let tree = QuadNode::build(&positions).unwrap();

        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &radii,
            CollisionParams {
                strength: 1.0,
                padding: 2.0,
                max_pair_distance_sq: 200.0 * 200.0,
            },
            &mut forces,
        );

        // 0 and 1 overlap (distance 8 < 6+6+2); 2 is clear of both.
        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        assert_eq!(forces[2], Vec2::ZERO);
    }

    #[test]
    fn coincident_nodes_get_a_deterministic_separation() {
        let positions = vec![vec2(3.0, 3.0), vec2(3.0, 3.0)];
        let radii = vec![5.0, 5.0];
        let mut first = vec![Vec2::ZERO; 2];
        let mut second = vec![Vec2::ZERO; 2];
        let tree = QuadNode::build(&positions).unwrap();
        let params = CollisionParams {
            strength: 1.0,
            padding: 0.0,
            max_pair_distance_sq: 100.0 * 100.0,
        };

        accumulate_collision_pairs(&tree, &tree, true, &positions, &radii, params, &mut first);
        accumulate_collision_pairs(&tree, &tree, true, &positions, &radii, params, &mut second);
        assert_ne!(first[0], Vec2::ZERO);
        assert_eq!(first, second);
    }
}
