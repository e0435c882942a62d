use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::dataset::{self, Dataset};
use crate::search::Matcher;

mod camera;
mod graph;
mod highlight;
mod physics;
mod render_utils;
mod ui;

use highlight::FilterState;

pub struct DocGraphApp {
    dataset_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: Dataset,
    matcher: Matcher,
    filters: FilterState,
    high_tag_query: String,
    low_tag_query: String,
    entity_query: String,
    all_high_tags: Vec<String>,
    all_low_tags: Vec<String>,
    all_entities: Vec<String>,
    selected: Option<String>,
    hovered: Option<usize>,
    dragging_background: bool,
    pan: Vec2,
    zoom: f32,
    camera: camera::CameraFocus,
    graph_dirty: bool,
    render_graph_revision: u64,
    graph_cache: Option<RenderGraph>,
    focus_cache: Option<FocusCache>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Cached highlight-predicate output, keyed by graph revision and the filter
/// state that produced it. `None` focus sets never get here: a neutral filter
/// state means everything is focused and nothing is cached.
struct FocusCache {
    revision: u64,
    filters: FilterState,
    focused: Arc<HashSet<usize>>,
}

/// Simulation state in an arena keyed by node index. The dataset itself stays
/// immutable; positions and velocities live only here, and the renderer reads
/// per-frame projections out of `view_scratch`.
struct RenderGraph {
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    index_by_id: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    alpha: f32,
    ticks: u64,
    pinned: Option<PinnedNode>,
    physics_scratch: PhysicsScratch,
    view_scratch: ViewScratch,
}

struct SimNode {
    id: String,
    world_pos: Vec2,
    velocity: Vec2,
    radius: f32,
}

struct SimEdge {
    source: usize,
    target: usize,
    similarity: f32,
}

/// User-driven position override; present only while a drag is in progress.
#[derive(Clone, Copy)]
pub(in crate::app) struct PinnedNode {
    pub(in crate::app) index: usize,
    pub(in crate::app) position: Vec2,
}

#[derive(Default)]
struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
    visible_mask: Vec<bool>,
}

impl DocGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset_path: String) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: String) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                dataset::load_dataset(Path::new(&dataset_path)).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for DocGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(data) => AppState::Ready(Box::new(ViewModel::new(data))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load knowledge graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.dataset_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            // Replacing the dataset replaces the whole view
                            // model; any in-flight drag or camera-focus retry
                            // dies with the old one.
                            transition = Some(match result {
                                Ok(data) => AppState::Ready(Box::new(ViewModel::new(data))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
