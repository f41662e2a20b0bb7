//! VCCD compiling
//!
//! Strings are packed back-to-back into fixed-size blocks. A string never
//! straddles two blocks: when it does not fit in what is left of the current
//! block, a fresh block is started.

use super::{
    BLOCK_SIZE, DIRECTORY_ENTRY_SIZE, HEADER_SIZE, Language, VCCD_MAGIC, VCCD_VERSION,
    encode_str16, header_length,
};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Seek, SeekFrom, Write};

/// Offset of the block count field, patched once all blocks are allocated
const BLOCK_COUNT_OFFSET: u64 = 8;

/// Whether a string of `length` bytes must go into a new block when the
/// current block's cursor sits at `cursor`.
fn starts_new_block(cursor: usize, length: usize) -> bool {
    cursor + length >= BLOCK_SIZE
}

/// Packs encoded strings into blocks
#[derive(Debug, Default)]
struct BlockAllocator {
    blocks: Vec<Vec<u8>>,
}

impl BlockAllocator {
    /// Append `bytes`, returning the block index and in-block offset used.
    fn place(&mut self, bytes: &[u8]) -> (u32, u16) {
        let needs_block = self
            .blocks
            .last()
            .is_none_or(|block| starts_new_block(block.len(), bytes.len()));
        if needs_block {
            self.blocks.push(Vec::with_capacity(BLOCK_SIZE));
        }

        let index = self.blocks.len() - 1;
        let block = &mut self.blocks[index];
        let offset = block.len();
        block.extend_from_slice(bytes);
        (index as u32, offset as u16)
    }

    fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Write every block, zero-padded to the block size.
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let padding = [0u8; BLOCK_SIZE];
        for block in &self.blocks {
            writer.write_all(block)?;
            writer.write_all(&padding[block.len()..])?;
        }
        Ok(())
    }
}

impl Language {
    /// Compile this language into a closed-captions container.
    ///
    /// String keys are fingerprinted (case-folded); hashed keys are written
    /// as-is. Directory entries follow token order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StringTooLarge`] if a caption does not fit in a single block.
    /// Returns [`Error::TooManyTokens`] if the directory overflows the header fields.
    pub fn compile(&self) -> Result<Vec<u8>> {
        let token_count = self.len();
        let header_len = header_length(token_count);
        let header_len_field =
            u32::try_from(header_len).map_err(|_| Error::TooManyTokens { count: token_count })?;
        let token_count_field =
            u32::try_from(token_count).map_err(|_| Error::TooManyTokens { count: token_count })?;

        let mut header = Cursor::new(Vec::with_capacity(header_len));

        // VCCD <version>
        header.write_all(&VCCD_MAGIC)?;
        header.write_u32::<LittleEndian>(VCCD_VERSION)?;

        // Block count placeholder
        header.write_u32::<LittleEndian>(0)?;

        // Block size, directory size, body data offset
        header.write_u32::<LittleEndian>(BLOCK_SIZE as u32)?;
        header.write_u32::<LittleEndian>(token_count_field)?;
        header.write_u32::<LittleEndian>(header_len_field)?;

        let mut blocks = BlockAllocator::default();
        for (key, value) in self.tokens() {
            let hash = key.fingerprint();
            let encoded = encode_str16(value);
            if encoded.len() >= BLOCK_SIZE {
                return Err(Error::StringTooLarge {
                    fingerprint: hash,
                    length: encoded.len(),
                    block_size: BLOCK_SIZE,
                });
            }

            let (block_index, offset) = blocks.place(&encoded);

            header.write_u32::<LittleEndian>(hash)?;
            header.write_u32::<LittleEndian>(block_index)?;
            header.write_u16::<LittleEndian>(offset)?;
            header.write_u16::<LittleEndian>(encoded.len() as u16)?;
        }
        debug_assert_eq!(
            header.get_ref().len(),
            HEADER_SIZE + token_count * DIRECTORY_ENTRY_SIZE
        );

        header.seek(SeekFrom::Start(BLOCK_COUNT_OFFSET))?;
        header.write_u32::<LittleEndian>(blocks.len() as u32)?;

        let mut file = header.into_inner();
        file.resize(header_len, 0);
        file.reserve_exact(BLOCK_SIZE * blocks.len());
        blocks.write_to(&mut file)?;

        tracing::debug!(
            "Compiled {} tokens into {} blocks (header {} bytes, total {} bytes)",
            token_count,
            blocks.len(),
            header_len,
            file.len()
        );

        Ok(file)
    }
}
