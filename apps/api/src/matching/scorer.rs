use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::normalize::{normalize_skill_set, normalize_tag};

/// A candidate's skills, normalized once and reused across every item scored.
#[derive(Debug, Clone, Default)]
pub struct SkillSet(HashSet<String>);

impl SkillSet {
    pub fn new<S: AsRef<str>>(skills: &[S]) -> Self {
        Self(normalize_skill_set(skills))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(&normalize_tag(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Overlap between a skill set and one item's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
    pub score: usize,
    /// Item tags that matched, in the item's spelling and order. Repeats are kept.
    pub matched_tags: Vec<String>,
}

/// Scores a sequence of raw item tags against a prepared skill set.
///
/// Every tag occurrence counts, so an item listing "rust" twice scores 2 for a
/// Rust candidate. `score` is always `matched_tags.len()`.
pub fn score_tags<'a, I>(skills: &SkillSet, tags: I) -> TagMatch
where
    I: IntoIterator<Item = &'a str>,
{
    if skills.is_empty() {
        return TagMatch::default();
    }

    let matched_tags: Vec<String> = tags
        .into_iter()
        .filter(|tag| skills.contains(tag))
        .map(str::to_string)
        .collect();

    TagMatch {
        score: matched_tags.len(),
        matched_tags,
    }
}

/// One-shot convenience over [`score_tags`] for raw skill and tag lists.
pub fn score<S, T>(candidate_skills: &[S], item_tags: &[T]) -> TagMatch
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let skills = SkillSet::new(candidate_skills);
    score_tags(&skills, item_tags.iter().map(|t| t.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let result = score(&["Python"], &["  python  "]);
        assert_eq!(result.score, 1);
        assert_eq!(result.matched_tags, vec!["  python  "]);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let result = score(&["java"], &["python", "go"]);
        assert_eq!(result.score, 0);
        assert!(result.matched_tags.is_empty());
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let none: [&str; 0] = [];
        assert_eq!(score(&none, &["rust"]), TagMatch::default());
        assert_eq!(score(&["rust"], &none), TagMatch::default());
    }

    #[test]
    fn test_matched_tags_keep_item_spelling_and_order() {
        let result = score(&["React", "node.js", "SQL"], &["react", "graphql", "node.js"]);
        assert_eq!(result.score, 2);
        assert_eq!(result.matched_tags, vec!["react", "node.js"]);
    }

    #[test]
    fn test_duplicate_tags_count_per_occurrence() {
        // Explicit and auxiliary lists are concatenated without de-duplication.
        let result = score(&["rust"], &["Rust", "tokio", "rust"]);
        assert_eq!(result.score, 2);
        assert_eq!(result.matched_tags, vec!["Rust", "rust"]);
    }

    #[test]
    fn test_duplicate_skills_do_not_inflate_score() {
        let result = score(&["go", "Go", " GO "], &["go"]);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_score_equals_matched_len() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec!["a", "b"], vec!["A", "b", "c", "a"]),
            (vec!["x"], vec![]),
            (vec![], vec!["x"]),
            (vec!["docker", "k8s"], vec!["Docker", "docker ", "helm"]),
        ];
        for (skills, tags) in cases {
            let result = score(skills.as_slice(), tags.as_slice());
            assert_eq!(result.score, result.matched_tags.len());
        }
    }

    #[test]
    fn test_empty_tag_matches_only_empty_skill() {
        let result = score(&["  "], &["", "rust"]);
        assert_eq!(result.score, 1);
        assert_eq!(result.matched_tags, vec![""]);
    }
}
