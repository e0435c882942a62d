use crate::dataset::Node;

/// Strict free-text matcher deciding whether a document satisfies a query.
///
/// Deliberately stricter than [`super::Matcher`]: no fuzzy or synonym
/// expansion, because this gates which documents are visually emphasized
/// rather than which labels are suggested.
pub fn node_matches(query: &str, node: &Node) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let title = node.title.to_lowercase();
    let summary = node.summary.to_lowercase();
    let tags = node
        .all_tags()
        .map(str::to_lowercase)
        .collect::<Vec<String>>();
    let entities = node
        .entities
        .iter()
        .map(|entity| entity.to_lowercase())
        .collect::<Vec<String>>();

    let in_labels = |needle: &str| {
        title.contains(needle)
            || tags.iter().any(|tag| tag.contains(needle))
            || entities.iter().any(|entity| entity.contains(needle))
    };

    if in_labels(&query) {
        return true;
    }
    if summary.contains(&query) {
        return true;
    }

    // Word mode: every query word of length >= 2 must appear somewhere;
    // shorter words are vacuously satisfied.
    query
        .split_whitespace()
        .filter(|word| word.chars().count() >= 2)
        .all(|word| in_labels(word) || summary.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Tags;

    fn node(title: &str, summary: &str, tags: &[&str], entities: &[&str]) -> Node {
        Node {
            id: "test".to_owned(),
            title: title.to_owned(),
            summary: summary.to_owned(),
            tags: Tags {
                high_level: tags.iter().map(|tag| (*tag).to_owned()).collect(),
                low_level: Vec::new(),
            },
            entities: entities.iter().map(|entity| (*entity).to_owned()).collect(),
            ..Node::default()
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let doc = node("Anything", "", &[], &[]);
        assert!(node_matches("", &doc));
        assert!(node_matches("   ", &doc));
    }

    #[test]
    fn full_query_in_title_matches() {
        let engineer = node("Senior Software Engineer", "Job description", &[], &[]);
        let chemistry = node("Chemistry Lab Report", "Titration results", &[], &[]);
        assert!(node_matches("software engineer", &engineer));
        assert!(!node_matches("software engineer", &chemistry));
    }

    #[test]
    fn full_query_in_tag_or_entity_matches() {
        let doc = node("Untitled", "", &["machine learning"], &["OpenAI"]);
        assert!(node_matches("machine learning", &doc));
        assert!(node_matches("openai", &doc));
    }

    #[test]
    fn summary_fallback_matches() {
        let doc = node("Q3 Notes", "Covers the quarterly budget review", &[], &[]);
        assert!(node_matches("budget review", &doc));
    }

    #[test]
    fn word_mode_requires_every_long_word() {
        let doc = node("Hiring Plan", "Engineering headcount for next year", &[], &[]);
        // Words land in different fields; both must hit somewhere.
        assert!(node_matches("hiring headcount", &doc));
        assert!(!node_matches("hiring salary", &doc));
    }

    #[test]
    fn single_char_words_are_ignored() {
        let doc = node("Team Roster", "", &[], &[]);
        assert!(node_matches("roster q z", &doc));
    }

    #[test]
    fn no_fuzzy_matching_here() {
        let doc = node("Engineering Review", "", &[], &[]);
        // One edit away, but this matcher is strict substring only.
        assert!(!node_matches("enginering", &doc));
    }
}
