//! Owned `KeyValues` tree
//!
//! Key lookups ignore ASCII case, like the engine's own `KeyValues` class.

use super::{KeyValuesSection, KvEntry};
use serde::{Deserialize, Serialize};

/// The value half of a `KeyValues` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvValue {
    /// A scalar string.
    String(String),
    /// A nested section.
    Section(KvNode),
}

/// A section of a `KeyValues` document: an ordered list of items.
///
/// Duplicate keys are kept; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KvNode {
    items: Vec<(String, KvValue)>,
}

impl KvNode {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a scalar pair and return the node (builder style).
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_value(key, value);
        self
    }

    /// Append a nested section and return the node (builder style).
    #[must_use]
    pub fn with_section(mut self, key: impl Into<String>, section: KvNode) -> Self {
        self.push_section(key, section);
        self
    }

    pub fn push_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.push((key.into(), KvValue::String(value.into())));
    }

    pub fn push_section(&mut self, key: impl Into<String>, section: KvNode) {
        self.items.push((key.into(), KvValue::Section(section)));
    }

    /// Number of items (pairs and sections) in this node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find(&self, key: &str) -> impl Iterator<Item = &KvValue> {
        self.items
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

impl KeyValuesSection for KvNode {
    fn section(&self, name: &str) -> Option<&Self> {
        self.find(name).find_map(|value| match value {
            KvValue::Section(node) => Some(node),
            KvValue::String(_) => None,
        })
    }

    fn entries(&self) -> Vec<KvEntry<'_>> {
        self.items
            .iter()
            .map(|(key, value)| match value {
                KvValue::String(value) => KvEntry::Pair {
                    key: key.as_str(),
                    value: value.as_str(),
                },
                KvValue::Section(_) => KvEntry::Section { key: key.as_str() },
            })
            .collect()
    }

    fn scalar<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str> {
        self.find(key)
            .find_map(|value| match value {
                KvValue::String(s) => Some(s.as_str()),
                KvValue::Section(_) => None,
            })
            .or(default)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KvNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut node = KvNode::new();
        for (key, value) in iter {
            node.push_value(key, value);
        }
        node
    }
}
