mod lexical;
mod rank;
mod relevance;

pub use lexical::{Matcher, ScoreWeights, SynonymTable, edit_distance};
pub use rank::rank_labels;
pub use relevance::node_matches;
