//! File format handlers for closed captions
//!
//! `vccd` is the compiled binary container, `keyvalues` the view of a parsed
//! caption script that the compiler and the hint builders read from.

pub mod keyvalues;
pub mod vccd;

// Re-export main types
pub use keyvalues::{KeyValuesSection, KvEntry, KvNode, KvValue};
pub use vccd::{
    DirectoryEntry, HintChain, HintMap, Key, Language, Tokens, VccdHeader, VccdInfo,
    hints_from_script_tree, hints_from_strings, inspect_vccd,
};
