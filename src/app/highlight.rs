use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::dataset::Node;
use crate::search::node_matches;

use super::{FocusCache, ViewModel};

/// Search/filter state owned by the UI shell. The simulation never touches
/// it; changing it only ever changes which nodes count as focused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct FilterState {
    pub(in crate::app) query: String,
    pub(in crate::app) selected_tags: BTreeSet<String>,
    pub(in crate::app) selected_entities: BTreeSet<String>,
    pub(in crate::app) auto_focus: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected_tags: BTreeSet::new(),
            selected_entities: BTreeSet::new(),
            auto_focus: true,
        }
    }
}

impl FilterState {
    /// Neutral state: nothing to dim, every node is in focus.
    pub(in crate::app) fn is_neutral(&self) -> bool {
        self.query.trim().is_empty()
            && self.selected_tags.is_empty()
            && self.selected_entities.is_empty()
    }

    pub(in crate::app) fn clear(&mut self) {
        self.query.clear();
        self.selected_tags.clear();
        self.selected_entities.clear();
    }
}

/// The highlight predicate: all active filter clauses must hold.
pub(in crate::app) fn is_focused(filters: &FilterState, node: &Node) -> bool {
    if filters.is_neutral() {
        return true;
    }

    if !filters.query.trim().is_empty() && !node_matches(&filters.query, node) {
        return false;
    }

    if !filters.selected_tags.is_empty()
        && !node.all_tags().any(|tag| filters.selected_tags.contains(tag))
    {
        return false;
    }

    if !filters.selected_entities.is_empty()
        && !node
            .entities
            .iter()
            .any(|entity| filters.selected_entities.contains(entity))
    {
        return false;
    }

    true
}

impl ViewModel {
    /// Indices of focused nodes under the current filters, or `None` when the
    /// filter state is neutral (everything focused, nothing worth caching).
    ///
    /// Recomputed only when the graph revision or the filter state changes;
    /// node indices match both `dataset.nodes` and the simulation arena.
    pub(in crate::app) fn focused_set(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.filters.is_neutral() {
            return None;
        }

        if let Some(cached) = &self.focus_cache
            && cached.revision == self.render_graph_revision
            && cached.filters == self.filters
        {
            return Some(Arc::clone(&cached.focused));
        }

        let focused = self
            .dataset
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| is_focused(&self.filters, node).then_some(index))
            .collect::<HashSet<_>>();
        let focused = Arc::new(focused);

        self.focus_cache = Some(FocusCache {
            revision: self.render_graph_revision,
            filters: self.filters.clone(),
            focused: Arc::clone(&focused),
        });

        Some(focused)
    }

    /// (focused, total) for the "N of M documents" readout.
    pub(in crate::app) fn focus_counts(&mut self) -> (usize, usize) {
        let total = self.dataset.node_count();
        match self.focused_set() {
            None => (total, total),
            Some(focused) => (focused.len(), total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Tags};

    fn node(id: &str, title: &str, high_tags: &[&str], entities: &[&str]) -> Node {
        Node {
            id: id.to_owned(),
            title: title.to_owned(),
            tags: Tags {
                high_level: high_tags.iter().map(|tag| (*tag).to_owned()).collect(),
                low_level: Vec::new(),
            },
            entities: entities.iter().map(|entity| (*entity).to_owned()).collect(),
            ..Node::default()
        }
    }

    fn filters() -> FilterState {
        FilterState::default()
    }

    #[test]
    fn neutral_state_focuses_everything() {
        let doc = node("a", "Anything", &[], &[]);
        assert!(is_focused(&filters(), &doc));
    }

    #[test]
    fn query_clause_uses_the_strict_filter() {
        let doc = node("a", "Budget Review", &[], &[]);
        let mut state = filters();
        state.query = "budget".to_owned();
        assert!(is_focused(&state, &doc));

        state.query = "unrelated".to_owned();
        assert!(!is_focused(&state, &doc));
    }

    #[test]
    fn tag_clause_accepts_any_selected_tag() {
        let doc = node("a", "Doc", &["finance"], &[]);
        let mut state = filters();
        state.selected_tags.insert("finance".to_owned());
        state.selected_tags.insert("legal".to_owned());
        assert!(is_focused(&state, &doc));

        let other = node("b", "Doc", &["research"], &[]);
        assert!(!is_focused(&state, &other));
    }

    #[test]
    fn all_active_clauses_must_hold() {
        let doc = node("a", "Hiring Plan", &["people"], &["Acme Corp"]);
        let mut state = filters();
        state.query = "hiring".to_owned();
        state.selected_tags.insert("people".to_owned());
        state.selected_entities.insert("Acme Corp".to_owned());
        assert!(is_focused(&state, &doc));

        state.selected_entities.clear();
        state.selected_entities.insert("Other Corp".to_owned());
        assert!(!is_focused(&state, &doc));
    }

    #[test]
    fn focused_set_is_idempotent_and_cached() {
        let dataset = Dataset {
            nodes: vec![
                node("a", "Budget Review", &["finance"], &[]),
                node("b", "Chemistry Lab", &["science"], &[]),
            ],
            edges: Vec::new(),
            metadata: None,
        };
        let mut model = ViewModel::new(dataset);
        model.filters.query = "budget".to_owned();

        let first = model.focused_set().unwrap();
        let second = model.focused_set().unwrap();
        assert_eq!(first, second);
        // Second call is served from the cache, not recomputed.
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains(&0));
        assert!(!first.contains(&1));

        assert_eq!(model.focus_counts(), (1, 2));
        model.filters.clear();
        assert_eq!(model.focus_counts(), (2, 2));
    }
}
