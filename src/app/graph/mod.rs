mod build;
mod interaction;
mod view;

pub(in crate::app) use build::build_render_graph;
pub(in crate::app) use interaction::{MAX_ZOOM, MIN_ZOOM};
