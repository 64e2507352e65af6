//! Applies a pattern table to document text.

use std::collections::HashMap;

use regex::Regex;
use tracing::trace;

/// Raw captures of one document, keyed by capture group name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: HashMap<String, String>,
}

impl FieldMap {
    /// Captured value of `field`, if any rule captured it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set `field`, replacing any earlier capture.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Run every pattern against `text` and merge the named captures.
///
/// Patterns are applied in order; a group only contributes when it took part
/// in the match, and a later pattern overwrites an earlier capture of the same
/// name. Returns `None` when nothing at all was captured.
pub fn search_all_patterns(patterns: &[Regex], text: &str) -> Option<FieldMap> {
    let fields = patterns.iter().fold(FieldMap::default(), |mut fields, pattern| {
        if let Some(caps) = pattern.captures(text) {
            for name in pattern.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    trace!("{} = {:?}", name, m.as_str());
                    fields.insert(name, m.as_str());
                }
            }
        }
        fields
    });

    if fields.is_empty() { None } else { Some(fields) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(sources: &[&str]) -> Vec<Regex> {
        sources.iter().map(|s| Regex::new(s).unwrap()).collect()
    }

    #[test]
    fn test_no_match_is_none() {
        let patterns = compile(&[r"Weight (?P<weight>\d+)", r"Size (?P<size>\d+)"]);
        assert_eq!(search_all_patterns(&patterns, "nothing relevant here"), None);
    }

    #[test]
    fn test_merges_all_rules() {
        let patterns = compile(&[r"Weight (?P<weight>\d+)", r"Size (?P<size>\d+)"]);
        let fields = search_all_patterns(&patterns, "Size 14 and Weight 2").unwrap();

        assert_eq!(fields.get("weight"), Some("2"));
        assert_eq!(fields.get("size"), Some("14"));
        assert_eq!(fields.names(), vec!["size", "weight"]);
    }

    #[test]
    fn test_later_rule_wins() {
        let patterns = compile(&[r"first (?P<value>\d+)", r"second (?P<value>\d+)"]);
        let fields = search_all_patterns(&patterns, "second 2, first 1").unwrap();
        assert_eq!(fields.get("value"), Some("2"));

        let reversed = compile(&[r"second (?P<value>\d+)", r"first (?P<value>\d+)"]);
        let fields = search_all_patterns(&reversed, "second 2, first 1").unwrap();
        assert_eq!(fields.get("value"), Some("1"));
    }

    #[test]
    fn test_unmatched_optional_group_keeps_earlier_value() {
        let patterns = compile(&[
            r"deviation (?P<error>\d+)",
            r"footprint (?P<footprint>\d+)(?: \+/- (?P<error>\d+))?",
        ]);
        let fields = search_all_patterns(&patterns, "footprint 500; deviation 40").unwrap();

        assert_eq!(fields.get("footprint"), Some("500"));
        assert_eq!(fields.get("error"), Some("40"));
    }
}
