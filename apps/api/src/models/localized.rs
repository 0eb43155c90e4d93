use serde::{Deserialize, Serialize};

/// Text stored in both supported languages.
///
/// Missing sides deserialize to empty strings so older rows (e.g. a bio with
/// only `en`) still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ar: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Case-insensitive substring match against either language.
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        self.en.to_lowercase().contains(needle_lower)
            || self.ar.to_lowercase().contains(needle_lower)
    }

    /// First `max_chars` characters of each side.
    pub fn truncated(&self, max_chars: usize) -> Self {
        Self {
            en: self.en.chars().take(max_chars).collect(),
            ar: self.ar.chars().take(max_chars).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_side_defaults_to_empty() {
        let text: LocalizedText = serde_json::from_str(r#"{"en": "Hello"}"#).unwrap();
        assert_eq!(text, LocalizedText::new("Hello", ""));
    }

    #[test]
    fn test_contains_ignore_case_either_language() {
        let text = LocalizedText::new("Senior Rust Developer", "مطور رست");
        assert!(text.contains_ignore_case("rust"));
        assert!(text.contains_ignore_case("مطور"));
        assert!(!text.contains_ignore_case("java"));
    }

    #[test]
    fn test_truncated_counts_chars_not_bytes() {
        let text = LocalizedText::new("abcdef", "مرحبا بكم");
        let short = text.truncated(3);
        assert_eq!(short.en, "abc");
        assert_eq!(short.ar, "مرح");
    }
}
