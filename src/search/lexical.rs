use std::collections::HashMap;

/// Classic Levenshtein distance with a rolling row, O(|a|*|b|) time and
/// O(min(|a|,|b|)) space. Operates on chars, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars = a.chars().collect::<Vec<_>>();
    let b_chars = b.chars().collect::<Vec<_>>();

    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if short.is_empty() {
        return long.len();
    }

    let mut row = (0..=short.len()).collect::<Vec<usize>>();
    for (long_index, long_char) in long.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = long_index + 1;

        for (short_index, short_char) in short.iter().enumerate() {
            let substitution_cost = usize::from(long_char != short_char);
            let next = (row[short_index] + 1)
                .min(row[short_index + 1] + 1)
                .min(previous_diagonal + substitution_cost);
            previous_diagonal = row[short_index + 1];
            row[short_index + 1] = next;
        }
    }

    row[short.len()]
}

/// Additive weights for the lexical scorer. Hand-tuned constants, kept as
/// plain data so tests can substitute deterministic fixtures.
#[derive(Clone, Copy, Debug)]
pub struct ScoreWeights {
    pub identical: u32,
    pub full_substring: u32,
    pub mutual_prefix: u32,
    pub word_equal: u32,
    pub word_containment: u32,
    pub word_boundary: u32,
    pub word_edit_one: u32,
    pub word_edit_two: u32,
    pub word_prefix: u32,
    pub synonym_containment: u32,
    pub synonym_edit_one: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            identical: 100,
            full_substring: 60,
            mutual_prefix: 40,
            word_equal: 20,
            word_containment: 12,
            word_boundary: 8,
            word_edit_one: 10,
            word_edit_two: 5,
            word_prefix: 6,
            synonym_containment: 4,
            synonym_edit_one: 3,
        }
    }
}

/// Domain synonym expansion for query words. Keys and expansions are stored
/// lowercased.
#[derive(Clone, Debug)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, Vec<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, values)| {
                (
                    key.into().to_lowercase(),
                    values
                        .into_iter()
                        .map(|value| value.into().to_lowercase())
                        .collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn expand(&self, word: &str) -> &[String] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new([
            (
                "software",
                vec!["computer", "programming", "code", "app", "application", "tech"],
            ),
            (
                "engineer",
                vec!["developer", "programmer", "architect", "technical"],
            ),
            ("document", vec!["file", "doc", "report", "paper", "note"]),
            ("meeting", vec!["call", "sync", "standup", "agenda", "minutes"]),
            (
                "finance",
                vec!["budget", "money", "cost", "revenue", "accounting"],
            ),
            (
                "research",
                vec!["study", "analysis", "paper", "experiment", "survey"],
            ),
            ("design", vec!["ui", "ux", "mockup", "layout", "prototype"]),
            ("data", vec!["analytics", "metrics", "statistics", "dataset"]),
            ("marketing", vec!["campaign", "brand", "advertising", "promotion"]),
            ("legal", vec!["contract", "agreement", "compliance", "policy"]),
            ("plan", vec!["roadmap", "strategy", "schedule", "timeline"]),
            ("hiring", vec!["recruiting", "interview", "candidate", "resume"]),
        ])
    }
}

/// Fuzzy, synonym-aware relevance scorer used for ranking sidebar labels and
/// for picking camera-focus targets. Higher is more relevant; zero means
/// "exclude from ranked output".
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    pub weights: ScoreWeights,
    pub synonyms: SynonymTable,
}

impl Matcher {
    pub fn score(&self, query: &str, candidate: &str) -> u32 {
        let query = query.trim().to_lowercase();
        let candidate = candidate.trim().to_lowercase();
        if query.is_empty() || candidate.is_empty() {
            return 0;
        }

        let weights = &self.weights;
        let mut score = 0u32;

        if query == candidate {
            score += weights.identical;
        }
        if candidate.contains(&query) {
            score += weights.full_substring;
        }
        if candidate.starts_with(&query) || query.starts_with(&candidate) {
            score += weights.mutual_prefix;
        }

        let query_words = query.split_whitespace().collect::<Vec<_>>();
        let candidate_words = candidate.split_whitespace().collect::<Vec<_>>();

        for query_word in &query_words {
            for candidate_word in &candidate_words {
                score += self.word_pair_score(query_word, candidate_word);
            }

            for term in self.synonyms.expand(query_word) {
                for candidate_word in &candidate_words {
                    if candidate_word.contains(term.as_str()) || term.contains(candidate_word) {
                        score += weights.synonym_containment;
                    }
                    if edit_distance(candidate_word, term) == 1 {
                        score += weights.synonym_edit_one;
                    }
                }
            }
        }

        score
    }

    fn word_pair_score(&self, query_word: &str, candidate_word: &str) -> u32 {
        let weights = &self.weights;
        let mut score = 0u32;

        if query_word == candidate_word {
            score += weights.word_equal;
        }
        if candidate_word.contains(query_word) || query_word.contains(candidate_word) {
            score += weights.word_containment;
        }
        if candidate_word.starts_with(query_word) {
            score += weights.word_boundary;
        }

        match edit_distance(query_word, candidate_word) {
            1 => score += weights.word_edit_one,
            2 if query_word.chars().count() > 4 => score += weights.word_edit_two,
            _ => {}
        }

        if query_word.chars().count() >= 3 && candidate_word.starts_with(query_word) {
            score += weights.word_prefix;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_identity_and_symmetry() {
        for (a, b) in [("", ""), ("kitten", "sitting"), ("graph", "grape"), ("a", "")] {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
        assert_eq!(edit_distance("similarity", "similarity"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn edit_distance_known_values() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("graph", "graphs"), 1);
    }

    #[test]
    fn identical_strings_score_highest() {
        let matcher = Matcher::default();
        let exact = matcher.score("budget", "budget");
        let partial = matcher.score("budget", "budget review");
        let unrelated = matcher.score("budget", "zebra");
        assert!(exact > partial);
        assert!(partial > 0);
        assert_eq!(unrelated, 0);
    }

    #[test]
    fn score_is_case_insensitive() {
        let matcher = Matcher::default();
        assert_eq!(
            matcher.score("Machine Learning", "machine learning"),
            matcher.score("machine learning", "MACHINE LEARNING"),
        );
    }

    #[test]
    fn fuzzy_single_edit_still_scores() {
        let matcher = Matcher::default();
        // "enginer" is one edit from "engineer".
        assert!(matcher.score("enginer", "engineer") > 0);
    }

    #[test]
    fn synonym_expansion_reaches_related_terms() {
        let matcher = Matcher::default();
        assert!(matcher.score("software", "programming languages") > 0);
        // With an empty table the same pair is unrelated.
        let bare = Matcher {
            synonyms: SynonymTable::empty(),
            ..Matcher::default()
        };
        assert_eq!(bare.score("software", "programming languages"), 0);
    }

    #[test]
    fn weights_are_swappable_fixtures() {
        let matcher = Matcher {
            weights: ScoreWeights {
                identical: 1,
                full_substring: 0,
                mutual_prefix: 0,
                word_equal: 0,
                word_containment: 0,
                word_boundary: 0,
                word_edit_one: 0,
                word_edit_two: 0,
                word_prefix: 0,
                synonym_containment: 0,
                synonym_edit_one: 0,
            },
            synonyms: SynonymTable::empty(),
        };
        assert_eq!(matcher.score("alpha", "alpha"), 1);
        assert_eq!(matcher.score("alpha", "alphabet"), 0);
    }

    #[test]
    fn short_query_words_skip_second_edit_allowance() {
        let weights = ScoreWeights {
            identical: 0,
            full_substring: 0,
            mutual_prefix: 0,
            word_equal: 0,
            word_containment: 0,
            word_boundary: 0,
            word_edit_one: 0,
            word_edit_two: 5,
            word_prefix: 0,
            synonym_containment: 0,
            synonym_edit_one: 0,
        };
        let matcher = Matcher {
            weights,
            synonyms: SynonymTable::empty(),
        };
        // Two edits apart, but the query word must be longer than 4 chars.
        assert_eq!(matcher.score("cart", "cone"), 0);
        assert_eq!(matcher.score("carton", "cartin"), 0); // one edit, not two
        assert_eq!(matcher.score("carton", "cartas"), 5);
    }
}
