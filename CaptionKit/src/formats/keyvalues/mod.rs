//! Caption script trees
//!
//! Caption scripts (`closecaption_english.txt` and friends) are `KeyValues`
//! text files. Parsing that text is left to an external parser; this module
//! only defines the view of an already-parsed tree that the codec needs,
//! plus [`KvNode`], an owned tree implementing it.

mod node;

pub use node::{KvNode, KvValue};

/// A single item of a section, as returned by [`KeyValuesSection::entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvEntry<'a> {
    /// A `"key" "value"` pair.
    Pair {
        /// The key, exactly as written.
        key: &'a str,
        /// The scalar value.
        value: &'a str,
    },
    /// A nested `"key" { ... }` section. Only the key is exposed here.
    Section {
        /// The section name.
        key: &'a str,
    },
}

impl<'a> KvEntry<'a> {
    /// The key of this entry, whatever its kind.
    #[must_use]
    pub fn key(&self) -> &'a str {
        match self {
            KvEntry::Pair { key, .. } | KvEntry::Section { key } => key,
        }
    }

    /// The key and value if this entry is a scalar pair.
    #[must_use]
    pub fn as_pair(&self) -> Option<(&'a str, &'a str)> {
        match self {
            KvEntry::Pair { key, value } => Some((key, value)),
            KvEntry::Section { .. } => None,
        }
    }
}

/// Read access to one section of a parsed caption script.
pub trait KeyValuesSection {
    /// Get a named child section.
    fn section(&self, name: &str) -> Option<&Self>;

    /// Enumerate every entry of this section in file order.
    fn entries(&self) -> Vec<KvEntry<'_>>;

    /// Get a scalar value by key, or `default` when absent.
    fn scalar<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str>;
}
