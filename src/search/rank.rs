use super::Matcher;

/// Ranks short labels (tags, entities) against a query.
///
/// Stable descending sort by lexical score; zero-score labels are excluded.
/// An empty query is the identity: the list comes back unchanged, in its
/// original order.
pub fn rank_labels(matcher: &Matcher, query: &str, items: &[String]) -> Vec<String> {
    if query.trim().is_empty() {
        return items.to_vec();
    }

    let mut scored = items
        .iter()
        .filter_map(|item| {
            let score = matcher.score(query, item);
            (score > 0).then(|| (score, item.clone()))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_score, item)| item).collect()
}
