//! Block identifier type.

use std::fmt;

use crate::common::config::BLOCK_SIZE;

/// Identifies one 512-byte block of the index file.
///
/// Block ids are handed out by the header's allocator: monotonically
/// increasing, assigned once, never reused. Id 0 is reserved for the file
/// header itself, which is what lets a node use 0 as the "no child /
/// no parent" sentinel.
///
/// # Example
/// ```
/// use blockindex::BlockId;
///
/// let id = BlockId::new(3);
/// assert_eq!(id.offset(), 3 * 512);
/// assert!(!id.is_null());
/// assert!(BlockId::NULL.is_null());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

impl BlockId {
    /// The reserved "absent" id.
    ///
    /// In a node's `parent` field it means "root"; in a child slot it means
    /// "no child".
    pub const NULL: BlockId = BlockId(0);

    /// Create a new BlockId.
    #[inline]
    pub fn new(id: u64) -> Self {
        BlockId(id)
    }

    /// Check if this id is the reserved sentinel.
    #[inline]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Byte offset of this block within the file.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.0 * BLOCK_SIZE as u64
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Block(NULL)")
        } else {
            write!(f, "Block({})", self.0)
        }
    }
}
