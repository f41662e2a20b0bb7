//! # CaptionKit
//!
//! A pure-Rust library for Source engine closed-captions files.
//!
//! ## Supported Formats
//!
//! - **VCCD** - Compiled caption containers (`closecaption_*.dat`)
//! - **Caption scripts** - Parsed `KeyValues` trees (`closecaption_*.txt`)
//!
//! ## Quick Start
//!
//! ### Compiling and Decompiling
//!
//! ```
//! use captionkit::prelude::*;
//!
//! let lang = Language::from_pairs([("Alyx.Hello", "Hello, Gordon.")]);
//! let data = lang.compile()?;
//!
//! // Without hints, keys come back as fingerprints
//! let bare = Language::decompile(&data, &[], None)?;
//! assert_eq!(bare.get(&Key::Hashed(fingerprint("Alyx.Hello"))), Some("Hello, Gordon."));
//!
//! // Hints recover the original names
//! let hints = [hints_from_strings(["Alyx.Hello"])];
//! let named = Language::decompile(&data, &hints, Some("english".to_string()))?;
//! assert_eq!(named.get(&Key::from("Alyx.Hello")), Some("Hello, Gordon."));
//! # Ok::<(), captionkit::Error>(())
//! ```
//!
//! ### Caption Scripts
//!
//! Parsing script text is left to a `KeyValues` parser. Any parsed tree that
//! implements [`KeyValuesSection`](formats::keyvalues::KeyValuesSection) can
//! be turned into a [`Language`](formats::vccd::Language) or into a hint map:
//!
//! ```
//! use captionkit::prelude::*;
//!
//! let tree = KvNode::new().with_section(
//!     "lang",
//!     KvNode::new()
//!         .with_value("Language", "english")
//!         .with_section("Tokens", KvNode::new().with_value("Barney.Beer", "I owe you a beer.")),
//! );
//!
//! let lang = Language::parse(&tree)?;
//! let hints = [hints_from_script_tree(&tree)?];
//! let name = lang.name().map(str::to_string);
//! let round_trip = Language::decompile(&lang.compile()?, &hints, name)?;
//! assert_eq!(round_trip, lang);
//! # Ok::<(), captionkit::Error>(())
//! ```

pub mod error;
pub mod formats;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::keyvalues::{KeyValuesSection, KvEntry, KvNode};
    pub use crate::formats::vccd::{
        HintChain, HintMap, Key, Language, Tokens, hints_from_script_tree, hints_from_strings,
        inspect_vccd,
    };
    pub use crate::utils::hash::fingerprint;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
