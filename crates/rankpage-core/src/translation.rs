//! Display-string lookup.
//!
//! A translation file is a JSON object whose entries are either plain labels
//! (`"Results": "Wyniki"`) or named groups of labels
//! (`"category": {"color": "kolor"}`). Lookups never fail: an absent group or
//! key falls back to the key itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed UI label keys.
pub const KEY_PARAMETERS: &str = "Parameters";
pub const KEY_RESULTS: &str = "Results";
pub const KEY_EMPTY: &str = "empty";
pub const KEY_FILTER_SEPARATOR: &str = "filterseparator";
pub const KEY_NAVIGATION: &str = "navigation";

/// Group used for attribute and value labels.
pub const GROUP_CATEGORY: &str = "category";

pub const DEFAULT_FILTER_SEPARATOR: &str = "|";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum TranslationEntry {
    Label(String),
    Group(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    entries: BTreeMap<String, TranslationEntry>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn insert_label(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.entries
            .insert(key.into(), TranslationEntry::Label(label.into()));
    }

    pub fn insert_group_label(
        &mut self,
        group: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
    ) {
        let group = group.into();
        let entry = self
            .entries
            .entry(group)
            .or_insert_with(|| TranslationEntry::Group(BTreeMap::new()));
        if let TranslationEntry::Label(_) = entry {
            *entry = TranslationEntry::Group(BTreeMap::new());
        }
        if let TranslationEntry::Group(labels) = entry {
            labels.insert(key.into(), label.into());
        }
    }

    /// Label for `key`, optionally inside `group`; `key` itself when absent.
    pub fn get(&self, key: &str, group: Option<&str>) -> String {
        self.lookup(key, group).unwrap_or(key).to_string()
    }

    /// Label for `key` only if a translation exists.
    pub fn lookup(&self, key: &str, group: Option<&str>) -> Option<&str> {
        match group {
            Some(group) => match self.entries.get(group)? {
                TranslationEntry::Group(labels) => labels.get(key).map(String::as_str),
                TranslationEntry::Label(_) => None,
            },
            None => match self.entries.get(key)? {
                TranslationEntry::Label(label) => Some(label.as_str()),
                TranslationEntry::Group(_) => None,
            },
        }
    }

    /// Separator between filter links; `|` unless translated.
    pub fn filter_separator(&self) -> String {
        self.lookup(KEY_FILTER_SEPARATOR, None)
            .unwrap_or(DEFAULT_FILTER_SEPARATOR)
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLISH: &str = r#"{
        "Parameters": "Parametry",
        "Results": "Wyniki",
        "filterseparator": "/",
        "category": {"color": "kolor", "red": "czerwony"}
    }"#;

    #[test]
    fn labels_and_groups() {
        let t = Translations::from_json_str(POLISH).unwrap();
        assert_eq!(t.get(KEY_PARAMETERS, None), "Parametry");
        assert_eq!(t.get("color", Some(GROUP_CATEGORY)), "kolor");
        assert_eq!(t.filter_separator(), "/");
    }

    #[test]
    fn missing_entries_fall_back_to_key() {
        let t = Translations::from_json_str(POLISH).unwrap();
        assert_eq!(t.get("size", Some(GROUP_CATEGORY)), "size");
        assert_eq!(t.get("red", Some("nope")), "red");
        assert_eq!(t.get("category", None), "category");
        assert_eq!(t.get("Results", Some(GROUP_CATEGORY)), "Results");
        assert_eq!(Translations::new().filter_separator(), "|");
    }

    #[test]
    fn builder_matches_parsed_form() {
        let mut t = Translations::new();
        t.insert_label("Results", "Wyniki");
        t.insert_group_label(GROUP_CATEGORY, "red", "czerwony");
        assert_eq!(t.get("red", Some(GROUP_CATEGORY)), "czerwony");
        assert_eq!(t.get(KEY_RESULTS, None), "Wyniki");
    }
}
