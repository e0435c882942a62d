use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::physics::ALPHA_DRAG;
use super::super::render_utils::screen_to_world;
use super::super::{PinnedNode, ViewModel};

pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 10.0;

impl ViewModel {
    /// Wheel zoom anchored at the pointer, so the world point under the
    /// cursor stays put.
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    /// Primary-button drag: on a node it pins the node to the pointer and
    /// reheats the simulation; on empty space it pans. Releasing the drag
    /// clears the pin, handing the node back to physics on the next tick.
    pub(in crate::app) fn handle_graph_drag(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            let pointer = response
                .interact_pointer_pos()
                .unwrap_or_else(|| rect.center());

            if let (Some(index), Some(cache)) = (hovered, self.graph_cache.as_mut()) {
                cache.pinned = Some(PinnedNode {
                    index,
                    position: screen_to_world(rect, self.pan, self.zoom, pointer),
                });
                cache.alpha = cache.alpha.max(ALPHA_DRAG);
            } else {
                self.dragging_background = true;
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            let pan = self.pan;
            let zoom = self.zoom;
            let pin_active = self
                .graph_cache
                .as_ref()
                .is_some_and(|cache| cache.pinned.is_some());

            if pin_active {
                if let (Some(pointer), Some(cache)) =
                    (response.interact_pointer_pos(), self.graph_cache.as_mut())
                    && let Some(pin) = &mut cache.pinned
                {
                    pin.position = screen_to_world(rect, pan, zoom, pointer);
                }
            } else if self.dragging_background {
                self.pan += response.drag_delta();
            }
        }

        if response.drag_stopped() {
            if let Some(cache) = self.graph_cache.as_mut() {
                cache.pinned = None;
            }
            self.dragging_background = false;
        }
    }

    pub(in crate::app) fn visible_indices_into(
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
        out: &mut Vec<usize>,
    ) {
        out.clear();
        out.extend((0..screen_positions.len()).filter(|&index| {
            super::super::render_utils::circle_visible(
                rect,
                screen_positions[index],
                screen_radii[index],
            )
        }));
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        visible_indices: &[usize],
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer_pos = ui.input(|input| input.pointer.hover_pos());
        pointer_pos.and_then(|pointer| {
            visible_indices
                .iter()
                .filter_map(|index| {
                    let distance = screen_positions[*index].distance(pointer);
                    (distance <= screen_radii[*index]).then_some((*index, distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(index, _distance)| index)
        })
    }
}
