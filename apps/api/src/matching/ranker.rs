//! Ranker: scores a list of items against one candidate and keeps the top K.
//!
//! Ordering contract: descending score, ties keep the caller's input order.
//! `Vec::sort_by` is stable.

use serde::{Deserialize, Serialize};

use crate::matching::scorer::{score_tags, SkillSet};

/// Default result size for recommendation lists.
pub const DEFAULT_LIMIT: usize = 20;

/// Anything that carries author-supplied tags plus machine-generated ones.
pub trait Taggable {
    fn explicit_tags(&self) -> &[String];

    fn auxiliary_tags(&self) -> &[String];

    /// Explicit tags followed by auxiliary tags. No de-duplication.
    fn combined_tags(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(
            self.explicit_tags()
                .iter()
                .chain(self.auxiliary_tags())
                .map(String::as_str),
        )
    }
}

/// Plain rankable item for callers that don't have a richer record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub explicit_tags: Vec<String>,
    #[serde(default)]
    pub auxiliary_tags: Vec<String>,
}

impl Taggable for Item {
    fn explicit_tags(&self) -> &[String] {
        &self.explicit_tags
    }

    fn auxiliary_tags(&self) -> &[String] {
        &self.auxiliary_tags
    }
}

/// An item together with its overlap score for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem<T> {
    pub item: T,
    pub score: usize,
    pub matched_tags: Vec<String>,
}

/// Ranks `items` by tag overlap with `candidate_skills`.
///
/// Items scoring zero are dropped. The result holds at most `limit` entries;
/// a `limit` of 0 yields an empty list.
pub fn rank<S, T, I>(candidate_skills: &[S], items: I, limit: usize) -> Vec<ScoredItem<T>>
where
    S: AsRef<str>,
    T: Taggable,
    I: IntoIterator<Item = T>,
{
    if limit == 0 {
        return Vec::new();
    }

    let skills = SkillSet::new(candidate_skills);

    let mut scored: Vec<ScoredItem<T>> = items
        .into_iter()
        .filter_map(|item| {
            let result = score_tags(&skills, item.combined_tags());
            (result.score > 0).then(|| ScoredItem {
                item,
                score: result.score,
                matched_tags: result.matched_tags,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, explicit: &[&str], auxiliary: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            explicit_tags: explicit.iter().map(|s| s.to_string()).collect(),
            auxiliary_tags: auxiliary.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ids(ranked: &[ScoredItem<Item>]) -> Vec<&str> {
        ranked.iter().map(|r| r.item.id.as_str()).collect()
    }

    #[test]
    fn test_filters_out_non_matching_items() {
        let items = vec![item("a", &["x"], &[]), item("b", &["y"], &[])];
        let ranked = rank(&["x"], items, DEFAULT_LIMIT);
        assert_eq!(ids(&ranked), vec!["a"]);
        assert_eq!(ranked[0].score, 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let skills = ["rust", "go"];
        let items = vec![
            item("A", &["rust", "go"], &[]),
            item("B", &["go"], &["rust"]),
            item("C", &["rust"], &[]),
        ];
        let ranked = rank(&skills, items, DEFAULT_LIMIT);
        assert_eq!(ids(&ranked), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_higher_scores_move_ahead_of_earlier_items() {
        let skills = ["rust", "go"];
        let items = vec![
            item("C", &["rust"], &[]),
            item("A", &["rust", "go"], &[]),
            item("B", &["go", "rust"], &[]),
        ];
        let ranked = rank(&skills, items, DEFAULT_LIMIT);
        assert_eq!(ids(&ranked), vec!["A", "B", "C"]);
        let scores: Vec<usize> = ranked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![2, 2, 1]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let items: Vec<Item> = (0..10)
            .map(|i| {
                // items 7, 8, 9 carry two matching tags
                if i >= 7 {
                    item(&format!("job-{i}"), &["sql"], &["SQL"])
                } else {
                    item(&format!("job-{i}"), &["sql"], &[])
                }
            })
            .collect();
        let ranked = rank(&["sql"], items, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ids(&ranked), vec!["job-7", "job-8", "job-9"]);
    }

    #[test]
    fn test_truncation_ties_resolved_by_input_order() {
        let items: Vec<Item> = (0..10)
            .map(|i| item(&format!("job-{i}"), &["sql"], &[]))
            .collect();
        let ranked = rank(&["sql"], items, 3);
        assert_eq!(ids(&ranked), vec!["job-0", "job-1", "job-2"]);
    }

    #[test]
    fn test_zero_limit_returns_empty() {
        let items = vec![item("a", &["x"], &[])];
        assert!(rank(&["x"], items, 0).is_empty());
    }

    #[test]
    fn test_combined_tags_explicit_first() {
        let items = vec![item("job", &["React", "GraphQL"], &["node.js", "react"])];
        let ranked = rank(&["react", "Node.js"], items, DEFAULT_LIMIT);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 3);
        assert_eq!(ranked[0].matched_tags, vec!["React", "node.js", "react"]);
    }

    #[test]
    fn test_end_to_end_example() {
        let items = vec![item("job", &["react", "graphql"], &["node.js"])];
        let ranked = rank(&["React", "node.js", "SQL"], items, DEFAULT_LIMIT);
        assert_eq!(ranked[0].score, 2);
        assert_eq!(ranked[0].matched_tags, vec!["react", "node.js"]);
    }

    #[test]
    fn test_empty_skills_rank_nothing() {
        let items = vec![item("a", &["x"], &["y"])];
        let none: [&str; 0] = [];
        assert!(rank(&none, items, DEFAULT_LIMIT).is_empty());
    }
}
