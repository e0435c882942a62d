use serde::Deserialize;

/// One document in the knowledge graph. The backend emits sparse records for
/// documents that have not finished processing, so everything except `id`
/// defaults to empty.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub preview: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub high_level: Vec<String>,
    #[serde(default)]
    pub low_level: Vec<String>,
}

impl Node {
    /// High- and low-level tags in one pass, in stored order.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .high_level
            .iter()
            .chain(self.tags.low_level.iter())
            .map(String::as_str)
    }
}

/// A semantic-similarity link between two documents.
#[derive(Clone, Debug, Deserialize)]
pub struct Edge {
    #[serde(alias = "source_id")]
    pub source: String,
    #[serde(alias = "target_id")]
    pub target: String,
    pub similarity: f32,
    #[serde(default, rename = "type")]
    pub edge_type: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub total_nodes: Option<usize>,
    #[serde(default)]
    pub total_edges: Option<usize>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl Dataset {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
