//! VCCD decompiling and inspection

use super::{
    DIRECTORY_ENTRY_SIZE, DirectoryEntry, HintChain, HintMap, Language, Tokens, VCCD_MAGIC,
    VCCD_VERSION, VccdHeader, decode_str16,
};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Header and directory of a VCCD container
#[derive(Debug, Clone)]
pub struct VccdInfo {
    pub header: VccdHeader,
    pub entries: Vec<DirectoryEntry>,
}

/// Read the header and directory of a VCCD container without decoding any
/// strings.
///
/// # Errors
///
/// Returns [`Error::InvalidVccdMagic`] if the data does not start with `VCCD`.
/// Returns [`Error::UnsupportedVccdVersion`] if the version is not 1.
/// Returns [`Error::InvalidBlockSize`] if the header declares a zero block size.
/// Returns [`Error::Io`] if the header or directory is truncated.
pub fn inspect_vccd(data: &[u8]) -> Result<VccdInfo> {
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != VCCD_MAGIC {
        return Err(Error::InvalidVccdMagic(magic));
    }

    let version = cursor.read_u32::<LittleEndian>()?;
    if version != VCCD_VERSION {
        return Err(Error::UnsupportedVccdVersion { version });
    }

    let header = VccdHeader {
        version,
        block_count: cursor.read_u32::<LittleEndian>()?,
        block_size: cursor.read_u32::<LittleEndian>()?,
        directory_count: cursor.read_u32::<LittleEndian>()?,
        header_length: cursor.read_u32::<LittleEndian>()?,
    };
    if header.block_size == 0 {
        return Err(Error::InvalidBlockSize { size: header.block_size });
    }

    // Don't trust the count for preallocation
    let capacity = (header.directory_count as usize).min(data.len() / DIRECTORY_ENTRY_SIZE);
    let mut entries = Vec::with_capacity(capacity);
    for _ in 0..header.directory_count {
        entries.push(DirectoryEntry {
            fingerprint: cursor.read_u32::<LittleEndian>()?,
            block_index: cursor.read_u32::<LittleEndian>()?,
            offset: cursor.read_u16::<LittleEndian>()?,
            length: cursor.read_u16::<LittleEndian>()?,
        });
    }

    tracing::trace!(
        "VCCD header: {} blocks of {} bytes, {} entries, header {} bytes",
        header.block_count,
        header.block_size,
        header.directory_count,
        header.header_length
    );

    Ok(VccdInfo { header, entries })
}

impl Language {
    /// Decompile a closed-captions container.
    ///
    /// Fingerprints are resolved through `hints` in order; the first map that
    /// knows a fingerprint supplies the key. Unresolved fingerprints are kept
    /// as [`Key::Hashed`](super::Key::Hashed).
    ///
    /// # Errors
    ///
    /// Returns the errors of [`inspect_vccd`], plus [`Error::EntryOutOfBounds`]
    /// if a directory entry addresses bytes past the end of `data`.
    pub fn decompile(data: &[u8], hints: &[HintMap], name: Option<String>) -> Result<Self> {
        let VccdInfo { header, entries } = inspect_vccd(data)?;
        let chain = HintChain::new(hints);

        let mut tokens = Tokens::with_capacity(entries.len());
        let mut resolved = 0usize;

        for (index, entry) in entries.iter().enumerate() {
            let offset = entry.absolute_offset(&header);
            let payload = usize::try_from(offset)
                .ok()
                .and_then(|start| {
                    let end = start.checked_add(usize::from(entry.length))?;
                    data.get(start..end)
                })
                .ok_or(Error::EntryOutOfBounds {
                    index,
                    offset,
                    length: entry.length,
                    size: data.len(),
                })?;

            if !payload.chunks_exact(2).any(|unit| unit == [0, 0]) {
                tracing::warn!(
                    "Caption {:#010x} is not null-terminated, using all {} bytes",
                    entry.fingerprint,
                    entry.length
                );
            }
            let text = decode_str16(payload);

            let key = chain.resolve(entry.fingerprint);
            if !key.is_hashed() {
                resolved += 1;
            }
            tokens.insert(key, text);
        }

        tracing::debug!(
            "Decompiled {} tokens ({} resolved through {} hint maps)",
            tokens.len(),
            resolved,
            hints.len()
        );

        let mut language = Language::new(tokens);
        language.set_name(name);
        Ok(language)
    }
}
