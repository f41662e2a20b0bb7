//! Fingerprint hints for decompiling
//!
//! A compiled container only stores fingerprints. Hint maps translate those
//! back into token names, either from a caption script that used them or
//! from a plain list of candidate names.

use super::Key;
use crate::error::{Error, Result};
use crate::formats::keyvalues::{KeyValuesSection, KvEntry};
use crate::utils::hash::{fingerprint, fingerprint_exact};
use std::collections::HashMap;

/// Fingerprint to token name lookup
pub type HintMap = HashMap<u32, String>;

/// Build hints from a caption script's `lang/Tokens` section.
///
/// Every token name is registered under both its case-folded and its
/// exact-case fingerprint. On collision, the later token wins.
/// Nested sections inside `Tokens` are not captions, so their keys are not
/// registered.
///
/// # Errors
///
/// Returns [`Error::MissingSection`] if the tree has no `lang` or `Tokens` section.
pub fn hints_from_script_tree<T: KeyValuesSection>(tree: &T) -> Result<HintMap> {
    let tokens = tree
        .section("lang")
        .ok_or_else(|| Error::MissingSection { name: "lang".to_string() })?
        .section("Tokens")
        .ok_or_else(|| Error::MissingSection { name: "Tokens".to_string() })?;

    let mut hints = HintMap::new();
    for entry in tokens.entries() {
        let KvEntry::Pair { key, .. } = entry else {
            continue;
        };
        hints.insert(fingerprint(key), key.to_string());
        hints.insert(fingerprint_exact(key), key.to_string());
    }

    tracing::debug!("Built {} hints from caption script", hints.len());
    Ok(hints)
}

/// Build hints from a list of candidate token names.
pub fn hints_from_strings<I, S>(strings: I) -> HintMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strings
        .into_iter()
        .map(|s| {
            let s = s.as_ref();
            (fingerprint(s), s.to_string())
        })
        .collect()
}

/// Ordered list of hint maps. Earlier maps take priority.
#[derive(Debug, Clone, Copy)]
pub struct HintChain<'a> {
    maps: &'a [HintMap],
}

impl<'a> HintChain<'a> {
    #[must_use]
    pub fn new(maps: &'a [HintMap]) -> Self {
        Self { maps }
    }

    /// First token name registered for `hash`, if any.
    #[must_use]
    pub fn lookup(&self, hash: u32) -> Option<&'a str> {
        self.maps
            .iter()
            .find_map(|map| map.get(&hash))
            .map(String::as_str)
    }

    /// Resolve a fingerprint to a key, falling back to the fingerprint itself.
    #[must_use]
    pub fn resolve(&self, hash: u32) -> Key {
        self.lookup(hash)
            .map_or(Key::Hashed(hash), |name| Key::Raw(name.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
