//! .dat closed-captions container (VCCD)
//!
//! Binary format for Source engine closed captions. Caption strings are
//! keyed by a CRC-32 fingerprint of their lower-cased token name and stored
//! as null-terminated UTF-16LE in fixed-size blocks.
//!
//! | Field             | Offset      | Size  |
//! |-------------------|-------------|-------|
//! | magic `VCCD`      | 0           | 4     |
//! | version           | 4           | 4     |
//! | block count       | 8           | 4     |
//! | block size        | 12          | 4     |
//! | directory count   | 16          | 4     |
//! | header length     | 20          | 4     |
//! | directory\[i\]    | 24 + 12*i   | 12    |
//! | blocks            | header len  | block size each |
//!
//! Since the original token names are lost when compiling, decompiling takes
//! a list of [`HintMap`]s to recover readable keys.

mod hints;
mod reader;
mod text;
mod writer;

pub use hints::{HintChain, HintMap, hints_from_script_tree, hints_from_strings};
pub use reader::{VccdInfo, inspect_vccd};

use crate::utils::hash::fingerprint;
use byteorder::{ByteOrder, LittleEndian};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// "VCCD" magic signature
pub const VCCD_MAGIC: [u8; 4] = *b"VCCD";

/// The only container version in use
pub const VCCD_VERSION: u32 = 1;

/// Size of the fixed header before the directory
pub const HEADER_SIZE: usize = 24;

/// Size of each directory entry (4 + 4 + 2 + 2 = 12 bytes)
pub const DIRECTORY_ENTRY_SIZE: usize = 12;

/// Size of every data block
pub const BLOCK_SIZE: usize = 8192;

/// The header (including the directory) is padded to this alignment
pub const HEADER_ALIGNMENT: usize = 512;

/// Header length for a container holding `token_count` tokens.
#[must_use]
pub fn header_length(token_count: usize) -> usize {
    (HEADER_SIZE + token_count * DIRECTORY_ENTRY_SIZE).div_ceil(HEADER_ALIGNMENT) * HEADER_ALIGNMENT
}

/// A token key: either the original name or an already computed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Fingerprint whose name is unknown
    Hashed(u32),
    /// Token name, case preserved
    Raw(String),
}

impl Key {
    /// The fingerprint stored in the container for this key.
    #[must_use]
    pub fn fingerprint(&self) -> u32 {
        match self {
            Key::Hashed(hash) => *hash,
            Key::Raw(name) => fingerprint(name),
        }
    }

    /// The token name, if known.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Raw(name) => Some(name),
            Key::Hashed(_) => None,
        }
    }

    /// Whether the token name is unknown.
    #[must_use]
    pub fn is_hashed(&self) -> bool {
        matches!(self, Key::Hashed(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Hashed(hash) => write!(f, "{hash}"),
            Key::Raw(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Raw(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Raw(name)
    }
}

impl From<u32> for Key {
    fn from(hash: u32) -> Self {
        Key::Hashed(hash)
    }
}

/// Insertion-ordered token collection
pub type Tokens = IndexMap<Key, String>;

/// A closed-captions language: an optional name and its tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LanguageRepr", into = "LanguageRepr")]
pub struct Language {
    /// Language name (e.g. "english")
    name: Option<String>,
    tokens: Tokens,
}

impl Language {
    /// Create a language from an existing token collection.
    #[must_use]
    pub fn new(tokens: Tokens) -> Self {
        Self { name: None, tokens }
    }

    /// Create a language from key/value pairs, keeping their order.
    ///
    /// A repeated key keeps its first position and its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Set the language name and return the language (builder style).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The language name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rename the language.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    #[must_use]
    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Tokens {
        self.tokens
    }

    /// Look up a caption by key.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    /// Fingerprint of every token, in token order.
    pub fn fingerprints(&self) -> impl Iterator<Item = u32> + '_ {
        self.tokens.keys().map(Key::fingerprint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<K: Into<Key>, V: Into<String>> FromIterator<(K, V)> for Language {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Tokens> for Language {
    fn from(tokens: Tokens) -> Self {
        Self::new(tokens)
    }
}

/// Serialized form of a [`Language`].
///
/// Tokens are written as a list of pairs since hashed keys cannot survive as
/// JSON object keys.
#[derive(Serialize, Deserialize)]
struct LanguageRepr {
    #[serde(default)]
    name: Option<String>,
    tokens: Vec<(Key, String)>,
}

impl From<LanguageRepr> for Language {
    fn from(repr: LanguageRepr) -> Self {
        Self {
            name: repr.name,
            tokens: repr.tokens.into_iter().collect(),
        }
    }
}

impl From<Language> for LanguageRepr {
    fn from(language: Language) -> Self {
        Self {
            name: language.name,
            tokens: language.tokens.into_iter().collect(),
        }
    }
}

/// Fixed header of a VCCD container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VccdHeader {
    pub version: u32,
    pub block_count: u32,
    pub block_size: u32,
    pub directory_count: u32,
    pub header_length: u32,
}

/// One directory record: where a caption lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub fingerprint: u32,
    pub block_index: u32,
    /// Byte offset of the string inside its block
    pub offset: u16,
    /// Encoded length in bytes, including the null terminator
    pub length: u16,
}

impl DirectoryEntry {
    /// Absolute position of the payload within the container.
    #[must_use]
    pub fn absolute_offset(&self, header: &VccdHeader) -> u64 {
        u64::from(self.block_index) * u64::from(header.block_size)
            + u64::from(header.header_length)
            + u64::from(self.offset)
    }
}

/// Encode a string as UTF-16LE with a trailing null code unit.
#[must_use]
pub fn encode_str16(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
    let mut bytes = vec![0u8; units.len() * 2];
    LittleEndian::write_u16_into(&units, &mut bytes);
    bytes
}

/// Decode UTF-16LE bytes, stopping at the first null code unit.
///
/// A trailing odd byte is ignored. Unpaired surrogates are replaced.
#[must_use]
pub fn decode_str16(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_length_padding() {
        assert_eq!(header_length(0), 512);
        assert_eq!(header_length(1), 512);
        assert_eq!(header_length(40), 512);
        // 24 + 41 * 12 = 516
        assert_eq!(header_length(41), 1024);
        for count in [0, 7, 100, 1000, 4321] {
            let len = header_length(count);
            assert_eq!(len % HEADER_ALIGNMENT, 0);
            assert!(len >= HEADER_SIZE + count * DIRECTORY_ENTRY_SIZE);
        }
    }

    #[test]
    fn test_key_fingerprint() {
        assert_eq!(Key::from("Hello").fingerprint(), fingerprint("hello"));
        assert_eq!(Key::from(42u32).fingerprint(), 42);
        assert_eq!(Key::from("Hello").to_string(), "Hello");
        assert_eq!(Key::Hashed(7).to_string(), "7");
        assert!(Key::Hashed(7).is_hashed());
        assert_eq!(Key::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_str16() {
        let bytes = encode_str16("Hi");
        assert_eq!(bytes, vec![b'H', 0, b'i', 0, 0, 0]);
        assert_eq!(decode_str16(&bytes), "Hi");
        // No terminator: whole payload is used
        assert_eq!(decode_str16(&bytes[..4]), "Hi");
        assert_eq!(decode_str16(&encode_str16("<clr:255,0,0>\u{263a}")), "<clr:255,0,0>\u{263a}");
        assert_eq!(decode_str16(&[]), "");
    }

    #[test]
    fn test_language_keeps_order() {
        let mut lang = Language::from_pairs([("b", "1"), ("a", "2"), ("b", "3")]);
        assert_eq!(lang.len(), 2);
        let keys: Vec<String> = lang.tokens().keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(lang.get(&Key::from("b")), Some("3"));

        assert_eq!(lang.name(), None);
        lang.set_name(Some("english".to_string()));
        assert_eq!(lang.name(), Some("english"));
        assert_eq!(lang.clone().with_name("french").name(), Some("french"));
    }

    #[test]
    fn test_entry_absolute_offset() {
        let header = VccdHeader {
            version: 1,
            block_count: 3,
            block_size: 8192,
            directory_count: 1,
            header_length: 512,
        };
        let entry = DirectoryEntry { fingerprint: 0, block_index: 2, offset: 10, length: 4 };
        assert_eq!(entry.absolute_offset(&header), 2 * 8192 + 512 + 10);
    }
}
