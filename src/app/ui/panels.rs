use std::collections::BTreeSet;
use std::collections::HashMap;

use eframe::egui::{self, Align, Context, Layout, ScrollArea, Ui, Vec2};

use crate::dataset::Dataset;
use crate::search::{Matcher, rank_labels};

use super::super::camera::CameraFocus;
use super::super::highlight::FilterState;
use super::super::physics::ALPHA_MIN;
use super::super::ViewModel;

const LABEL_LIST_HEIGHT: f32 = 150.0;

/// Unique labels ordered by how many documents carry them, most common
/// first; ties alphabetical.
fn collect_labels<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut labels = counts.into_iter().collect::<Vec<_>>();
    labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    labels
        .into_iter()
        .map(|(label, _count)| label.to_owned())
        .collect()
}

fn toggle_selection(set: &mut BTreeSet<String>, label: &str) {
    if !set.remove(label) {
        set.insert(label.to_owned());
    }
}

impl ViewModel {
    pub(in crate::app) fn new(dataset: Dataset) -> Self {
        let all_high_tags =
            collect_labels(dataset.nodes.iter().flat_map(|node| {
                node.tags.high_level.iter().map(String::as_str)
            }));
        let all_low_tags =
            collect_labels(dataset.nodes.iter().flat_map(|node| {
                node.tags.low_level.iter().map(String::as_str)
            }));
        let all_entities = collect_labels(
            dataset
                .nodes
                .iter()
                .flat_map(|node| node.entities.iter().map(String::as_str)),
        );

        tracing::info!(
            nodes = dataset.node_count(),
            edges = dataset.edge_count(),
            "dataset loaded"
        );

        Self {
            dataset,
            matcher: Matcher::default(),
            filters: FilterState::default(),
            high_tag_query: String::new(),
            low_tag_query: String::new(),
            entity_query: String::new(),
            all_high_tags,
            all_low_tags,
            all_entities,
            selected: None,
            hovered: None,
            dragging_background: false,
            pan: Vec2::ZERO,
            zoom: 1.0,
            camera: CameraFocus::default(),
            graph_dirty: true,
            render_graph_revision: 0,
            graph_cache: None,
            focus_cache: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        dataset_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_graph();
        }
        self.advance_camera(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("docgraph");
                    ui.separator();
                    ui.label(format!("documents: {}", self.dataset.node_count()));
                    ui.label(format!("links: {}", self.dataset.edge_count()));
                    if let Some(generated_at) = self
                        .dataset
                        .metadata
                        .as_ref()
                        .and_then(|metadata| metadata.generated_at.as_deref())
                    {
                        ui.label(format!("generated: {generated_at}"));
                    }

                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let (focused, total) = self.focus_counts();
                        ui.label(format!("{focused} of {total} documents in focus"));
                    });
                });
            });

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(dataset_path);
                    ui.separator();
                    let settled = self
                        .graph_cache
                        .as_ref()
                        .is_none_or(|cache| cache.alpha < ALPHA_MIN && cache.pinned.is_none());
                    ui.label(if settled {
                        "layout settled".to_owned()
                    } else {
                        "layout simulating...".to_owned()
                    });
                    ui.separator();
                    ui.label(format!(
                        "visible: {} nodes, {} edges",
                        self.visible_node_count, self.visible_edge_count
                    ));
                });
            });

        egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_filter_panel(ui));

        if self.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| self.draw_details_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_filter_panel(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.heading("Search");
        let now = ui.input(|input| input.time);

        let search_response = ui.add(
            egui::TextEdit::singleline(&mut self.filters.query)
                .hint_text("Search documents...")
                .desired_width(f32::INFINITY),
        );
        if search_response.changed() {
            self.on_query_changed(now);
        }

        let auto_focus_response = ui.checkbox(&mut self.filters.auto_focus, "Auto-focus camera");
        if auto_focus_response.changed() {
            self.on_query_changed(now);
        }

        if ui.button("Clear filters").clicked() {
            self.filters.clear();
            self.high_tag_query.clear();
            self.low_tag_query.clear();
            self.entity_query.clear();
            self.on_query_changed(now);
        }

        ui.add_space(6.0);
        ui.separator();

        let matcher = self.matcher.clone();

        ui.label("High-level tags");
        Self::draw_label_list(
            ui,
            "high_tags",
            &matcher,
            &mut self.high_tag_query,
            &self.all_high_tags,
            &mut self.filters.selected_tags,
        );

        ui.add_space(6.0);
        ui.label("Low-level tags");
        Self::draw_label_list(
            ui,
            "low_tags",
            &matcher,
            &mut self.low_tag_query,
            &self.all_low_tags,
            &mut self.filters.selected_tags,
        );

        ui.add_space(6.0);
        ui.label("Entities");
        Self::draw_label_list(
            ui,
            "entities",
            &matcher,
            &mut self.entity_query,
            &self.all_entities,
            &mut self.filters.selected_entities,
        );
    }

    fn draw_label_list(
        ui: &mut Ui,
        id_salt: &str,
        matcher: &Matcher,
        list_query: &mut String,
        all_labels: &[String],
        selection: &mut BTreeSet<String>,
    ) {
        ui.add(
            egui::TextEdit::singleline(list_query)
                .hint_text("Filter list...")
                .desired_width(f32::INFINITY),
        );

        let ranked = rank_labels(matcher, list_query, all_labels);
        ScrollArea::vertical()
            .id_salt(id_salt)
            .max_height(LABEL_LIST_HEIGHT)
            .show(ui, |ui| {
                if ranked.is_empty() {
                    ui.weak("No matches.");
                    return;
                }
                for label in &ranked {
                    let is_selected = selection.contains(label);
                    if ui.selectable_label(is_selected, label).clicked() {
                        toggle_selection(selection, label);
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_ordered_by_frequency_then_name() {
        let values = ["beta", "alpha", "beta", "gamma", "alpha", "beta"];
        let labels = collect_labels(values.into_iter());
        assert_eq!(labels, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn empty_labels_are_skipped() {
        let values = ["", "tag", ""];
        assert_eq!(collect_labels(values.into_iter()), vec!["tag"]);
    }

    #[test]
    fn toggle_selection_round_trips() {
        let mut set = BTreeSet::new();
        toggle_selection(&mut set, "finance");
        assert!(set.contains("finance"));
        toggle_selection(&mut set, "finance");
        assert!(set.is_empty());
    }
}
