use std::collections::HashMap;

use eframe::egui::vec2;

use crate::dataset::Dataset;
use crate::util::stable_pair;

use super::super::physics::ALPHA_INITIAL;
use super::super::{PhysicsScratch, RenderGraph, SimEdge, SimNode, ViewScratch};

/// Visual radius from connectivity: better-connected, entity-rich documents
/// draw bigger and claim more collision room.
pub(in crate::app) fn node_radius(degree: usize, entity_count: usize) -> f32 {
    5.0 + ((2.0 * degree as f32) + entity_count as f32).sqrt()
}

/// Builds the simulation arena for a dataset. Returns `None` for an empty
/// node set; the caller renders an explicit empty state instead.
///
/// Node indices match `dataset.nodes` one-to-one, so highlight sets computed
/// over the dataset index directly into the arena. Initial positions come
/// from a stable per-id hash: the same dataset always starts from the same
/// layout.
pub(in crate::app) fn build_render_graph(dataset: &Dataset) -> Option<RenderGraph> {
    if dataset.nodes.is_empty() {
        return None;
    }

    let mut index_by_id = HashMap::with_capacity(dataset.nodes.len());
    for (index, node) in dataset.nodes.iter().enumerate() {
        index_by_id.insert(node.id.clone(), index);
    }

    let mut edges = Vec::with_capacity(dataset.edges.len());
    let mut degree = vec![0usize; dataset.nodes.len()];
    for edge in &dataset.edges {
        let (Some(&source), Some(&target)) = (
            index_by_id.get(edge.source.as_str()),
            index_by_id.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if source == target {
            continue;
        }

        degree[source] += 1;
        degree[target] += 1;
        edges.push(SimEdge {
            source,
            target,
            similarity: edge.similarity,
        });
    }

    let mut adjacency = vec![Vec::new(); dataset.nodes.len()];
    for edge in &edges {
        adjacency[edge.source].push(edge.target);
        adjacency[edge.target].push(edge.source);
    }

    let spread = (dataset.nodes.len() as f32).sqrt() * 30.0;
    let nodes = dataset
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let (jx, jy) = stable_pair(&node.id);
            let mut position = vec2(jx, jy) * spread;
            if position.length_sq() <= 0.0001 {
                // Hash landed on the origin; fan out on the golden angle so
                // coincident starts cannot trap the repulsion force.
                let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
                position = vec2(angle.cos(), angle.sin()) * (spread * 0.2);
            }

            SimNode {
                id: node.id.clone(),
                world_pos: position,
                velocity: eframe::egui::Vec2::ZERO,
                radius: node_radius(degree[index], node.entities.len()),
            }
        })
        .collect();

    Some(RenderGraph {
        nodes,
        edges,
        index_by_id,
        adjacency,
        alpha: ALPHA_INITIAL,
        ticks: 0,
        pinned: None,
        physics_scratch: PhysicsScratch::default(),
        view_scratch: ViewScratch::default(),
    })
}
