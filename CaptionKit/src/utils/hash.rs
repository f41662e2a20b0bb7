//! Hashing utilities
//!
//! Caption keys are stored in the container as standard CRC-32 checksums of
//! the lower-cased key. Text is reduced to one byte per UTF-16 code unit
//! before hashing, so characters outside Latin-1 only contribute their low
//! 8 bits.

/// Fingerprint of a caption key, case-folded.
///
/// This is the hash written into the VCCD directory for string keys.
#[must_use]
pub fn fingerprint(text: &str) -> u32 {
    fingerprint_exact(&text.to_lowercase())
}

/// Fingerprint of a caption key without case-folding.
///
/// Only used when building hint maps, where both casings of a key are
/// registered.
#[must_use]
pub fn fingerprint_exact(text: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&single_byte_encode(text));
    hasher.finalize()
}

/// Narrow each UTF-16 code unit to its low byte.
fn single_byte_encode(text: &str) -> Vec<u8> {
    text.encode_utf16().map(|unit| (unit & 0xFF) as u8).collect()
}
