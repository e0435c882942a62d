use eframe::egui::{RichText, ScrollArea, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(super) fn draw_details_panel(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selected.clone() else {
            return;
        };
        let Some(node) = self
            .dataset
            .nodes
            .iter()
            .find(|node| node.id == selected_id)
            .cloned()
        else {
            self.selected = None;
            return;
        };

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading(if node.title.is_empty() {
                node.id.as_str()
            } else {
                node.title.as_str()
            });
            if ui.button("Close").clicked() {
                self.selected = None;
            }
        });

        ScrollArea::vertical().show(ui, |ui| {
            if !node.author.is_empty() {
                ui.label(format!("Author: {}", node.author));
            }
            if !node.modified.is_empty() {
                ui.label(format!("Modified: {}", node.modified));
            }
            if !node.url.is_empty() && ui.link(&node.url).clicked() {
                // Opening the browser belongs to the outer shell.
                tracing::info!(url = %node.url, "document link activated");
            }

            let link_count = self
                .graph_cache
                .as_ref()
                .and_then(|cache| {
                    cache
                        .index_by_id
                        .get(&selected_id)
                        .map(|&index| cache.adjacency[index].len())
                })
                .unwrap_or(0);
            ui.label(format!("Similar documents: {link_count}"));

            if !node.summary.is_empty() {
                ui.add_space(6.0);
                ui.label(RichText::new("Summary").strong());
                ui.label(&node.summary);
            } else if !node.preview.is_empty() {
                ui.add_space(6.0);
                ui.label(RichText::new("Preview").strong());
                ui.label(&node.preview);
            }

            let mut tags = node.all_tags().peekable();
            if tags.peek().is_some() {
                ui.add_space(6.0);
                ui.label(RichText::new("Tags").strong());
                ui.horizontal_wrapped(|ui| {
                    for tag in tags {
                        let selected = self.filters.selected_tags.contains(tag);
                        if ui.selectable_label(selected, tag).clicked() {
                            if !self.filters.selected_tags.remove(tag) {
                                self.filters.selected_tags.insert(tag.to_owned());
                            }
                        }
                    }
                });
            }

            if !node.entities.is_empty() {
                ui.add_space(6.0);
                ui.label(RichText::new("Entities").strong());
                ui.horizontal_wrapped(|ui| {
                    for entity in &node.entities {
                        let selected = self.filters.selected_entities.contains(entity);
                        if ui.selectable_label(selected, entity).clicked() {
                            if !self.filters.selected_entities.remove(entity) {
                                self.filters.selected_entities.insert(entity.clone());
                            }
                        }
                    }
                });
            }
        });
    }
}
