//! Error types for `CaptionKit`

use thiserror::Error;

/// The error type for `CaptionKit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from reading or writing a buffer (e.g. truncated data).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== VCCD Format Errors ====================
    /// The data is not a valid closed-captions container (missing VCCD magic).
    #[error("invalid VCCD magic: expected VCCD, found {0:?}")]
    InvalidVccdMagic([u8; 4]),

    /// The VCCD version is not supported.
    #[error("unsupported VCCD version: {version} (supported: 1)")]
    UnsupportedVccdVersion {
        /// The version number found in the header.
        version: u32,
    },

    /// The header declares a block size that cannot address any string.
    #[error("invalid VCCD block size: {size}")]
    InvalidBlockSize {
        /// The block size found in the header.
        size: u32,
    },

    /// A directory entry points outside of the buffer.
    #[error("directory entry {index} out of bounds: {length} bytes at offset {offset} (buffer is {size} bytes)")]
    EntryOutOfBounds {
        /// Position of the entry in the directory.
        index: usize,
        /// Absolute byte offset of the string payload.
        offset: u64,
        /// Encoded payload length in bytes.
        length: u16,
        /// Total size of the buffer.
        size: usize,
    },

    /// A caption string does not fit into a single block.
    #[error("caption {fingerprint:#010x} is {length} bytes encoded, which does not fit a {block_size}-byte block")]
    StringTooLarge {
        /// Fingerprint of the offending token.
        fingerprint: u32,
        /// Encoded length in bytes, including the null terminator.
        length: usize,
        /// The container block size.
        block_size: usize,
    },

    /// The token collection is too large for the 32-bit header fields.
    #[error("too many tokens for a VCCD directory: {count}")]
    TooManyTokens {
        /// The number of tokens in the language.
        count: usize,
    },

    // ==================== Caption Script Errors ====================
    /// A required section is missing from a caption script tree.
    #[error("caption script is missing the '{name}' section")]
    MissingSection {
        /// Name of the section that was looked up.
        name: String,
    },
}

/// A specialized Result type for `CaptionKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
