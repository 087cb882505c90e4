//! Block - the fundamental 512-byte unit of storage.
//!
//! A [`Block`] is a raw 512-byte array that serves as the unit of I/O
//! between disk and memory. Block 0 holds the [`FileHeader`]; every other
//! allocated block holds one encoded B-tree node.
//!
//! [`FileHeader`]: super::FileHeader

use crate::common::config::BLOCK_SIZE;

/// A block of data (512 bytes).
///
/// Every integer field in the on-disk format is 8 bytes, big-endian, so the
/// accessors here come in exactly two widths: `u64` for ids and counters,
/// `i64` for keys and values (two's complement, same byte image).
///
/// # Example
/// ```
/// use blockindex::storage::Block;
///
/// let mut block = Block::new();
/// block.write_u64(8, 0xDEAD);
/// assert_eq!(block.read_u64(8), 0xDEAD);
/// ```
pub struct Block {
    data: [u8; BLOCK_SIZE],
}

impl Block {
    /// Create a new zeroed block.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; BLOCK_SIZE],
        }
    }

    /// Get immutable slice of block data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of block data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the size of a block.
    #[inline]
    pub const fn size() -> usize {
        BLOCK_SIZE
    }

    /// Read a big-endian u64 at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 8` exceeds the block size.
    pub fn read_u64(&self, offset: usize) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.data[offset..offset + 8]);
        u64::from_be_bytes(buf)
    }

    /// Write a big-endian u64 at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 8` exceeds the block size.
    pub fn write_u64(&mut self, offset: usize, value: u64) {
        self.data[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
    }

    /// Read a big-endian i64 at `offset`.
    pub fn read_i64(&self, offset: usize) -> i64 {
        self.read_u64(offset) as i64
    }

    /// Write a big-endian i64 at `offset`.
    pub fn write_i64(&mut self, offset: usize, value: i64) {
        self.write_u64(offset, value as u64);
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}
