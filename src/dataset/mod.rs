mod load;
mod model;

pub use load::load_dataset;
pub use model::{Dataset, Edge, Metadata, Node, Tags};
