//! Line and tag decomposition of free-text labels.
//!
//! State diagrams drawn in yEd carry metadata in their labels, one
//! `key: value` pair per line:
//!
//! ```text
//! Edge Foo
//! tag1: monkey
//! tag2: chimp
//! ```

use rustc_hash::FxHashMap;

use crate::error::LookupError;

/// A label split into lines, with `key: value` lines collected as tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Labeler {
    text: String,
    lines: Vec<String>,
    tags: FxHashMap<String, String>,
}

impl Labeler {
    /// Decomposes a label.
    ///
    /// The text is split on `\n`, so an empty label still has one (empty)
    /// line. Every line containing a colon is split at its first colon and
    /// both halves are trimmed; when a key repeats, the later line wins.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let mut tags = FxHashMap::default();
        for line in &lines {
            if let Some((key, value)) = line.split_once(':') {
                tags.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { text, lines, tags }
    }

    /// Returns the full label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Returns line `n`.
    pub fn line(&self, n: usize) -> Result<&str, LookupError> {
        self.lines
            .get(n)
            .map(String::as_str)
            .ok_or(LookupError::IndexOutOfRange {
                what: "line",
                index: n,
                len: self.lines.len(),
            })
    }

    pub fn lines(&self) -> impl ExactSizeIterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Returns the value of a tag, if some line defines it.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn tags(&self) -> &FxHashMap<String, String> {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lines_and_tags() {
        let label = Labeler::new("Edge Foo\ntag1: monkey\ntag2: chimp");
        assert_eq!(
            label.lines().collect::<Vec<_>>(),
            vec!["Edge Foo", "tag1: monkey", "tag2: chimp"]
        );
        assert_eq!(label.tags().len(), 2);
        assert_eq!(label.tag("tag1"), Some("monkey"));
        assert_eq!(label.tag("tag2"), Some("chimp"));
        assert_eq!(label.tag("Edge Foo"), None);
    }

    #[test]
    fn test_empty_label_has_one_line() {
        let label = Labeler::new("");
        assert_eq!(label.num_lines(), 1);
        assert_eq!(label.line(0), Ok(""));
        assert!(label.tags().is_empty());
    }

    #[test]
    fn test_split_at_first_colon() {
        let label = Labeler::new("  url : http://example.com:8080 ");
        assert_eq!(label.tag("url"), Some("http://example.com:8080"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let label = Labeler::new("state: a\nstate: b");
        assert_eq!(label.tag("state"), Some("b"));
    }

    #[test]
    fn test_line_out_of_range() {
        let label = Labeler::new("one\ntwo");
        assert_eq!(label.num_lines(), 2);
        assert_eq!(
            label.line(2),
            Err(LookupError::IndexOutOfRange { what: "line", index: 2, len: 2 })
        );
    }

    proptest! {
        #[test]
        fn prop_line_count_matches_newlines(text in "[a-z: \n]{0,64}") {
            let label = Labeler::new(text.as_str());
            prop_assert_eq!(label.num_lines(), text.matches('\n').count() + 1);
            prop_assert_eq!(label.text(), text.as_str());
        }

        #[test]
        fn prop_tags_come_from_colon_lines(text in "[a-c: \n]{0,64}") {
            let label = Labeler::new(text.as_str());
            let colon_lines = label.lines().filter(|l| l.contains(':')).count();
            prop_assert!(label.tags().len() <= colon_lines);
            for (key, value) in label.tags() {
                prop_assert_eq!(key.trim(), key.as_str());
                prop_assert_eq!(value.trim(), value.as_str());
            }
        }
    }
}
