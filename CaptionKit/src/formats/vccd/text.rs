//! Caption script (.txt) to [`Language`]

use super::{Key, Language, Tokens};
use crate::error::{Error, Result};
use crate::formats::keyvalues::{KeyValuesSection, KvEntry};

impl Language {
    /// Build a language from a parsed caption script.
    ///
    /// The name comes from `lang/Language`, the tokens from `lang/Tokens`.
    /// Keys are kept as written (unhashed); nested sections inside `Tokens`
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSection`] if the tree has no `lang` or `Tokens` section.
    pub fn parse<T: KeyValuesSection>(tree: &T) -> Result<Self> {
        let lang = tree
            .section("lang")
            .ok_or_else(|| Error::MissingSection { name: "lang".to_string() })?;
        let name = lang.scalar("language", None).map(str::to_string);

        let section = lang
            .section("tokens")
            .ok_or_else(|| Error::MissingSection { name: "tokens".to_string() })?;

        let tokens: Tokens = section
            .entries()
            .iter()
            .filter_map(KvEntry::as_pair)
            .map(|(key, value)| (Key::from(key), value.to_string()))
            .collect();

        tracing::debug!("Parsed caption script: {} tokens", tokens.len());

        let mut language = Language::new(tokens);
        language.set_name(name);
        Ok(language)
    }
}
