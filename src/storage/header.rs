//! File header codec.
//!
//! Block 0 of every index file holds a [`FileHeader`]: the magic constant,
//! the root node id, and the next-free-id allocator state.

use crate::common::config::MAGIC;
use crate::common::{BlockId, Error, Result};

use super::block::Block;

/// Metadata stored in block 0 of every index file.
///
/// # Layout (24 of 512 bytes used, all big-endian)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       8     magic (ASCII "4348PRJ3")
/// 8       8     root block id (0 = empty tree)
/// 16      8     next free block id (allocator, starts at 1)
/// ```
/// The remaining bytes are zero padding.
///
/// `root` is 0 exactly when the tree is empty. `next_block_id` only ever
/// increases and is persisted so the allocator survives process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Root node of the tree, or [`BlockId::NULL`] if the tree is empty.
    pub root: BlockId,
    /// Next block id to hand out. Block 0 is the header, so this starts at 1.
    pub next_block_id: u64,
}

impl FileHeader {
    pub const OFFSET_MAGIC: usize = 0;
    pub const OFFSET_ROOT: usize = 8;
    pub const OFFSET_NEXT: usize = 16;

    /// Header for a freshly created, empty index.
    pub fn new() -> Self {
        Self {
            root: BlockId::NULL,
            next_block_id: 1,
        }
    }

    /// Decode the header from block 0.
    ///
    /// # Errors
    /// Returns `Error::InvalidFormat` if the magic bytes do not match.
    pub fn from_block(block: &Block) -> Result<Self> {
        if block.as_slice()[..MAGIC.len()] != MAGIC {
            return Err(Error::InvalidFormat);
        }

        Ok(Self {
            root: BlockId::new(block.read_u64(Self::OFFSET_ROOT)),
            next_block_id: block.read_u64(Self::OFFSET_NEXT),
        })
    }

    /// Encode this header into a zeroed block image.
    pub fn to_block(&self) -> Block {
        let mut block = Block::new();
        block.as_mut_slice()[..MAGIC.len()].copy_from_slice(&MAGIC);
        block.write_u64(Self::OFFSET_ROOT, self.root.0);
        block.write_u64(Self::OFFSET_NEXT, self.next_block_id);
        block
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_new() {
        let header = FileHeader::new();
        assert!(header.root.is_null());
        assert_eq!(header.next_block_id, 1);
    }

    #[test]
    fn test_header_roundtrip() {
        let original = FileHeader {
            root: BlockId::new(7),
            next_block_id: 12,
        };

        let block = original.to_block();
        let recovered = FileHeader::from_block(&block).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_header_byte_layout() {
        let header = FileHeader {
            root: BlockId::new(2),
            next_block_id: 3,
        };
        let block = header.to_block();

        assert_eq!(&block.as_slice()[..8], b"4348PRJ3");
        // Big-endian u64: value in the last byte of the field
        assert_eq!(block.as_slice()[15], 2);
        assert_eq!(block.as_slice()[23], 3);
        // Everything past the three fields is zero padding
        assert!(block.as_slice()[24..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_header_bad_magic() {
        let mut block = FileHeader::new().to_block();
        block.as_mut_slice()[0] = b'X';

        match FileHeader::from_block(&block) {
            Err(Error::InvalidFormat) => {}
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }
}
