//! Configuration constants for blockindex.

/// Size of a block in bytes.
///
/// Every unit of file I/O is one 512-byte block: block 0 holds the file
/// header, every other allocated block holds one B-tree node. 512 bytes is
/// enough for a fully-populated node under the fixed-width 8-byte field
/// encoding (488 bytes used, the rest zero padding).
pub const BLOCK_SIZE: usize = 512;

/// Branching factor of the B-tree.
///
/// A node holds at most `2 * DEGREE - 1` keys and `2 * DEGREE` children;
/// every non-root node holds at least `DEGREE - 1` keys.
pub const DEGREE: usize = 10;

/// Maximum number of keys per node.
pub const MAX_KEYS: usize = 2 * DEGREE - 1;

/// Maximum number of children per node.
pub const MAX_CHILDREN: usize = 2 * DEGREE;

/// Magic bytes at the start of every index file.
pub const MAGIC: [u8; 8] = *b"4348PRJ3";

/// Number of nodes the write-back cache holds before evicting.
pub const CACHE_CAPACITY: usize = 3;
