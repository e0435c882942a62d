use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, Vec2, vec2};

use crate::util::truncate_label;

use super::super::physics::boundary::BoundaryParams;
use super::super::physics::step_simulation;
use super::super::render_utils::{
    blend_color, dim_color, draw_background, edge_visible, world_to_screen,
};
use super::super::{RenderGraph, ViewModel};
use super::build_render_graph;

const NODE_BASE_COLOR: Color32 = Color32::from_rgb(96, 148, 210);
const NODE_FOCUS_COLOR: Color32 = Color32::from_rgb(118, 198, 255);
const NODE_HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
const NODE_SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const EDGE_HOVER_COLOR: Color32 = Color32::from_rgb(241, 176, 96);

impl ViewModel {
    pub(in crate::app) fn rebuild_graph(&mut self) {
        // Positions are deliberately not carried across rebuilds: a new
        // dataset gets a fresh simulation.
        self.render_graph_revision = self.render_graph_revision.wrapping_add(1);
        self.focus_cache = None;
        self.hovered = None;
        self.graph_cache = build_render_graph(&self.dataset);
        self.graph_dirty = false;

        if self.graph_cache.is_none() {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
        }
    }

    fn update_screen_space(rect: egui::Rect, pan: Vec2, zoom: f32, cache: &mut RenderGraph) {
        let scratch = &mut cache.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        for node in &cache.nodes {
            scratch
                .screen_positions
                .push(world_to_screen(rect, pan, zoom, node.world_pos));
            scratch
                .screen_radii
                .push((node.radius * zoom.powf(0.45)).clamp(2.5, 46.0));
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);

        if self.graph_cache.is_none() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No documents in this dataset yet.",
                FontId::proportional(16.0),
                Color32::from_gray(190),
            );
            return;
        }

        // Drag targeting uses last frame's hover pick; the projection for the
        // current frame does not exist until after the physics step.
        let hovered_previous = self.hovered;
        self.handle_graph_drag(rect, &response, hovered_previous);

        let focused = self.focused_set();
        let filters_active = focused.is_some();
        let pan = self.pan;
        let zoom = self.zoom;
        let selected_id = self.selected.clone();
        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let bounds = BoundaryParams::for_viewport(rect.width(), rect.height());

        let dataset_nodes = &self.dataset.nodes;
        let Some(cache) = self.graph_cache.as_mut() else {
            return;
        };

        let simulation_warm = step_simulation(cache, bounds, frame_delta_seconds);
        if simulation_warm || response.dragged() {
            ui.ctx().request_repaint();
        }

        Self::update_screen_space(rect, pan, zoom, cache);
        Self::visible_indices_into(
            rect,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
            &mut cache.view_scratch.visible_indices,
        );
        cache.view_scratch.visible_mask.clear();
        cache
            .view_scratch
            .visible_mask
            .resize(cache.nodes.len(), false);
        for &index in &cache.view_scratch.visible_indices {
            cache.view_scratch.visible_mask[index] = true;
        }

        let hovered = Self::hovered_index(
            ui,
            &cache.view_scratch.visible_indices,
            &cache.view_scratch.screen_positions,
            &cache.view_scratch.screen_radii,
        );
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let is_in_focus =
            |index: usize| focused.as_ref().is_none_or(|set| set.contains(&index));

        let zoom_sqrt = zoom.sqrt();
        let mut visible_edge_count = 0usize;
        for edge in &cache.edges {
            let start = cache.view_scratch.screen_positions[edge.source];
            let end = cache.view_scratch.screen_positions[edge.target];
            let either_visible = cache.view_scratch.visible_mask[edge.source]
                || cache.view_scratch.visible_mask[edge.target];
            if !either_visible && !edge_visible(rect, start, end, 2.5) {
                continue;
            }

            let incident_to_hover =
                hovered == Some(edge.source) || hovered == Some(edge.target);
            let edge_focused = is_in_focus(edge.source) && is_in_focus(edge.target);

            let base_width = (0.5 + (edge.similarity * 2.4)) * zoom_sqrt;
            let (width, color) = if incident_to_hover {
                (
                    (base_width * 1.7).clamp(1.2, 6.0),
                    EDGE_HOVER_COLOR.gamma_multiply(0.92),
                )
            } else if !edge_focused {
                (
                    (base_width * 0.7).clamp(0.3, 2.4),
                    Color32::from_rgba_unmultiplied(70, 78, 90, 36),
                )
            } else if hovered.is_some() {
                (
                    base_width.clamp(0.4, 3.6),
                    Color32::from_rgba_unmultiplied(96, 108, 124, 60),
                )
            } else {
                let alpha = (70.0 + (edge.similarity * 120.0)) as u8;
                (
                    base_width.clamp(0.4, 3.6),
                    Color32::from_rgba_unmultiplied(110, 124, 142, alpha),
                )
            };

            painter.line_segment([start, end], Stroke::new(width, color));
            visible_edge_count += 1;
        }

        for &index in &cache.view_scratch.visible_indices {
            let node = &cache.nodes[index];
            let position = cache.view_scratch.screen_positions[index];
            let mut radius = cache.view_scratch.screen_radii[index];

            let is_hovered = hovered == Some(index);
            let is_selected = selected_id.as_deref() == Some(node.id.as_str());
            let node_focused = is_in_focus(index);
            let adjacent_to_hover = hovered
                .is_none_or(|h| h == index || cache.adjacency[h].contains(&index));

            if is_hovered {
                radius *= 1.3;
            }

            let mut color = if !node_focused {
                dim_color(NODE_BASE_COLOR, 0.35)
            } else if filters_active {
                NODE_FOCUS_COLOR
            } else {
                NODE_BASE_COLOR
            };
            // Hover dimming is transient: on hover-exit this branch simply
            // stops applying and the predicate styling above stands.
            if !adjacent_to_hover && !is_hovered {
                color = dim_color(color, 0.55);
            }
            if is_selected {
                color = blend_color(color, NODE_SELECTED_COLOR, 0.7);
            }
            if is_hovered {
                color = NODE_HOVER_COLOR;
            }

            painter.circle_filled(position, radius, color);
            let stroke_width = if is_selected || is_hovered { 1.8 } else { 1.0 };
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(stroke_width, Color32::from_rgba_unmultiplied(12, 14, 18, 200)),
            );

            let emphasized = node_focused && filters_active;
            let should_label = is_hovered
                || is_selected
                || (emphasized && zoom > 0.45)
                || radius > 15.0
                || zoom > 1.3;
            if should_label {
                let title = dataset_nodes
                    .get(index)
                    .map(|doc| doc.title.as_str())
                    .filter(|title| !title.is_empty())
                    .unwrap_or(node.id.as_str());
                let label_color = if node_focused {
                    Color32::from_gray(235)
                } else {
                    Color32::from_gray(140)
                };
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(title, 32),
                    FontId::proportional(12.0),
                    label_color,
                );
            }
        }

        let pending_selection = response
            .clicked_by(egui::PointerButton::Primary)
            .then(|| hovered.and_then(|index| cache.nodes.get(index).map(|node| node.id.clone())));

        self.visible_node_count = cache.view_scratch.visible_indices.len();
        self.visible_edge_count = visible_edge_count;
        self.hovered = hovered;
        if let Some(selection) = pending_selection {
            self.selected = selection;
        }
    }
}
