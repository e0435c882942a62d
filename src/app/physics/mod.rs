pub(in crate::app) mod boundary;
mod forces;
mod quadtree;

use eframe::egui::Vec2;

use self::boundary::BoundaryParams;
use self::forces::{CollisionParams, accumulate_collision_pairs, accumulate_repulsion_for_node};
use self::quadtree::QuadNode;
use super::RenderGraph;

/// Simulation stops once its temperature decays past this point.
pub(in crate::app) const ALPHA_MIN: f32 = 0.005;
/// Temperature on a freshly built graph.
pub(in crate::app) const ALPHA_INITIAL: f32 = 1.0;
/// Temperature re-seeded when a drag starts, so the layout adapts around the
/// pinned node without a full restart.
pub(in crate::app) const ALPHA_DRAG: f32 = 0.3;

const ALPHA_DECAY: f32 = 0.0228;
const BARNES_HUT_THETA: f32 = 0.72;
const REPULSION_STRENGTH: f32 = 6_000.0;
const REPULSION_SOFTENING: f32 = 400.0;
const LINK_DISTANCE_SCALE: f32 = 30.0;
const SIMILARITY_FLOOR: f32 = 0.1;
const LINK_STRENGTH: f32 = 0.05;
const CENTER_PULL: f32 = 0.03;
const COLLISION_STRENGTH: f32 = 0.7;
const COLLISION_PADDING: f32 = 2.0;
const FORCE_SCALE: f32 = 0.12;
const VELOCITY_DAMPING: f32 = 0.62;
const MAX_FORCE: f32 = 220.0;
const MAX_SPEED: f32 = 28.0;

/// Separation two linked nodes are pulled toward: inversely proportional to
/// similarity, so near-duplicates cluster tight and weak links stay loose.
pub(in crate::app) fn link_target_distance(similarity: f32) -> f32 {
    LINK_DISTANCE_SCALE / similarity.max(SIMILARITY_FLOOR)
}

/// Advances the simulation by one tick. All forces read the positions
/// captured at the start of the tick, so the result is deterministic for a
/// given starting state. Returns whether the simulation is still warm.
pub(super) fn step_simulation(
    cache: &mut RenderGraph,
    bounds: BoundaryParams,
    delta_seconds: f32,
) -> bool {
    let node_count = cache.nodes.len();
    if node_count == 0 {
        return false;
    }
    if cache.alpha < ALPHA_MIN && cache.pinned.is_none() {
        return false;
    }

    // Drag override: the pinned node tracks the pointer and sits out velocity
    // integration entirely.
    if let Some(pin) = cache.pinned
        && let Some(node) = cache.nodes.get_mut(pin.index)
    {
        node.world_pos = pin.position;
        node.velocity = Vec2::ZERO;
    }

    let scratch = &mut cache.physics_scratch;
    scratch.forces.clear();
    scratch.forces.resize(node_count, Vec2::ZERO);
    scratch.positions.clear();
    scratch.radii.clear();
    let mut max_radius = 0.0_f32;
    for node in &cache.nodes {
        scratch.positions.push(node.world_pos);
        scratch.radii.push(node.radius);
        max_radius = max_radius.max(node.radius);
    }

    let forces = &mut scratch.forces;
    let positions = &scratch.positions;
    let radii = &scratch.radii;

    if node_count >= 2
        && let Some(quadtree) = QuadNode::build(positions)
    {
        for (index, force) in forces.iter_mut().enumerate() {
            accumulate_repulsion_for_node(
                &quadtree,
                index,
                positions,
                REPULSION_STRENGTH,
                REPULSION_SOFTENING,
                BARNES_HUT_THETA,
                force,
            );
        }

        let collision_horizon = (max_radius * 2.0) + COLLISION_PADDING;
        accumulate_collision_pairs(
            &quadtree,
            &quadtree,
            true,
            positions,
            radii,
            CollisionParams {
                strength: COLLISION_STRENGTH,
                padding: COLLISION_PADDING,
                max_pair_distance_sq: collision_horizon * collision_horizon,
            },
            forces,
        );
    }

    for edge in &cache.edges {
        if edge.source >= node_count || edge.target >= node_count || edge.source == edge.target {
            continue;
        }

        let delta = positions[edge.source] - positions[edge.target];
        let distance_sq = delta.length_sq();
        if distance_sq <= 0.0001 * 0.0001 {
            continue;
        }
        let distance = distance_sq.sqrt();
        let direction = delta / distance;

        let target = link_target_distance(edge.similarity);
        let correction = direction * ((distance - target) * LINK_STRENGTH);
        forces[edge.source] -= correction;
        forces[edge.target] += correction;
    }

    // Weak global bias pulling the centroid back to the canvas center.
    let mut centroid = Vec2::ZERO;
    for position in positions {
        centroid += *position;
    }
    centroid /= node_count as f32;
    let centering = -centroid * CENTER_PULL;
    for force in forces.iter_mut() {
        *force += centering;
    }

    let alpha = cache.alpha;
    let time_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);
    let damping_factor = VELOCITY_DAMPING.powf(time_scale);
    let pinned_index = cache.pinned.map(|pin| pin.index);

    for (index, node) in cache.nodes.iter_mut().enumerate() {
        if Some(index) == pinned_index {
            node.world_pos = boundary::contain(bounds, node.world_pos);
            continue;
        }

        let mut force = forces[index];
        let force_len_sq = force.length_sq();
        if force_len_sq > MAX_FORCE * MAX_FORCE {
            force *= MAX_FORCE / force_len_sq.sqrt();
        }

        let mut velocity = (node.velocity + (force * (alpha * FORCE_SCALE * time_scale)))
            * damping_factor;
        let speed_sq = velocity.length_sq();
        if speed_sq > MAX_SPEED * MAX_SPEED {
            velocity *= MAX_SPEED / speed_sq.sqrt();
        }

        node.velocity = velocity;
        node.world_pos = boundary::contain(bounds, node.world_pos + (velocity * time_scale));
    }

    cache.alpha *= 1.0 - ALPHA_DECAY;
    if cache.pinned.is_some() {
        cache.alpha = cache.alpha.max(ALPHA_DRAG);
    }
    cache.ticks += 1;

    cache.alpha >= ALPHA_MIN || cache.pinned.is_some()
}
