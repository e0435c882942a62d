use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::Dataset;

/// Loads and validates a dataset file.
///
/// Missing `nodes`/`edges` keys or duplicate node ids reject the whole file.
/// Edges pointing at unknown node ids are dropped; one bad edge must not block
/// an otherwise valid graph.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;
    let dataset: Dataset =
        serde_json::from_str(&raw).context("invalid dataset JSON; expected `nodes` and `edges`")?;
    validate(dataset)
}

fn validate(mut dataset: Dataset) -> Result<Dataset> {
    let mut ids = HashSet::with_capacity(dataset.nodes.len());
    for node in &dataset.nodes {
        if node.id.is_empty() {
            return Err(anyhow!("dataset contains a node with an empty id"));
        }
        if !ids.insert(node.id.as_str()) {
            return Err(anyhow!("duplicate node id in dataset: {}", node.id));
        }
    }

    let before = dataset.edges.len();
    dataset
        .edges
        .retain(|edge| ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()));
    let dropped = before - dataset.edges.len();
    if dropped > 0 {
        tracing::warn!(dropped, "dropped edges referencing unknown node ids");
    }

    for edge in &mut dataset.edges {
        edge.similarity = edge.similarity.clamp(0.0, 1.0);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Dataset> {
        let dataset: Dataset = serde_json::from_str(raw).context("invalid dataset JSON")?;
        validate(dataset)
    }

    #[test]
    fn rejects_missing_edges_key() {
        let result = parse(r#"{"nodes": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let result = parse(r#"{"nodes": [{"id": "a"}, {"id": "a"}], "edges": []}"#);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn drops_dangling_edges_without_failing() {
        let dataset = parse(
            r#"{
                "nodes": [{"id": "A"}, {"id": "B"}],
                "edges": [
                    {"source": "A", "target": "B", "similarity": 0.5, "type": "semantic"},
                    {"source": "A", "target": "Z", "similarity": 0.9, "type": "semantic"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(dataset.node_count(), 2);
        assert_eq!(dataset.edge_count(), 1);
        assert_eq!(dataset.edges[0].target, "B");
    }

    #[test]
    fn clamps_similarity_into_unit_range() {
        let dataset = parse(
            r#"{
                "nodes": [{"id": "A"}, {"id": "B"}],
                "edges": [{"source": "A", "target": "B", "similarity": 1.7, "type": "semantic"}]
            }"#,
        )
        .unwrap();

        assert_eq!(dataset.edges[0].similarity, 1.0);
    }

    #[test]
    fn counts_round_trip_against_metadata() {
        let dataset = parse(
            r#"{
                "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
                "edges": [{"source": "A", "target": "B", "similarity": 0.4, "type": "semantic"}],
                "metadata": {"total_nodes": 3, "total_edges": 1, "generated_at": "2025-11-02"}
            }"#,
        )
        .unwrap();

        let metadata = dataset.metadata.as_ref().unwrap();
        assert_eq!(Some(dataset.node_count()), metadata.total_nodes);
        assert_eq!(Some(dataset.edge_count()), metadata.total_edges);
    }

    #[test]
    fn accepts_sparse_nodes_and_source_id_alias() {
        let dataset = parse(
            r#"{
                "nodes": [
                    {"id": "A", "title": "Quarterly Report", "tags": {"high_level": ["finance"]}},
                    {"id": "B"}
                ],
                "edges": [{"source_id": "A", "target_id": "B", "similarity": 0.3, "type": "semantic"}]
            }"#,
        )
        .unwrap();

        assert_eq!(dataset.nodes[1].title, "");
        assert!(dataset.nodes[1].entities.is_empty());
        assert_eq!(dataset.edges[0].source, "A");
    }
}
