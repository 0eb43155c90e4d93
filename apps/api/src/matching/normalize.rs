use std::collections::HashSet;

/// Canonical comparison key for a skill or tag: surrounding whitespace removed, lowercased.
///
/// Inner whitespace is left alone ("node js" and "node  js" stay distinct).
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes a skill list into a set. Duplicates collapse.
pub fn normalize_skill_set<S: AsRef<str>>(skills: &[S]) -> HashSet<String> {
    skills.iter().map(|s| normalize_tag(s.as_ref())).collect()
}
