//! B-tree node record and its on-disk codec.

use crate::common::config::{MAX_CHILDREN, MAX_KEYS};
use crate::common::BlockId;
use crate::storage::Block;

/// One B-tree node, the in-memory image of one block.
///
/// # Layout (all fields 8 bytes, big-endian; 488 of 512 bytes used)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       8     id (this node's own block id)
/// 8       8     parent block id (0 = root)
/// 16      8     key_count
/// 24      152   keys[19]
/// 176     152   values[19]
/// 328     160   children[20]
/// ```
///
/// `keys` and `values` are parallel arrays; only indices below `key_count`
/// are meaningful, and slots beyond it may hold stale bytes from before a
/// split. `key_count` is stored as a full 8-byte integer even though it
/// never exceeds 19 - that width is part of the wire format.
///
/// There is no validity tag and no checksum: decoding is total over any
/// 512-byte block, and the block is trusted to be the one the caller asked
/// the store for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// This node's own block id; immutable once assigned.
    pub id: BlockId,
    /// Parent block id, [`BlockId::NULL`] if this node is the root.
    pub parent: BlockId,
    /// Number of valid entries in `keys`/`values`.
    pub key_count: usize,
    pub keys: [i64; MAX_KEYS],
    pub values: [i64; MAX_KEYS],
    /// Child block ids; an internal node with `key_count` keys has exactly
    /// `key_count + 1` meaningful children.
    pub children: [BlockId; MAX_CHILDREN],
}

impl Node {
    pub const OFFSET_ID: usize = 0;
    pub const OFFSET_PARENT: usize = 8;
    pub const OFFSET_KEY_COUNT: usize = 16;
    pub const OFFSET_KEYS: usize = 24;
    pub const OFFSET_VALUES: usize = Self::OFFSET_KEYS + MAX_KEYS * 8;
    pub const OFFSET_CHILDREN: usize = Self::OFFSET_VALUES + MAX_KEYS * 8;

    /// Create an empty node with the given id.
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            parent: BlockId::NULL,
            key_count: 0,
            keys: [0; MAX_KEYS],
            values: [0; MAX_KEYS],
            children: [BlockId::NULL; MAX_CHILDREN],
        }
    }

    /// A node is a leaf iff every child slot is the null id.
    ///
    /// Leafness is derived, never stored.
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_null())
    }

    /// Encode this node into a block image. Always succeeds.
    pub fn to_block(&self) -> Block {
        let mut block = Block::new();
        block.write_u64(Self::OFFSET_ID, self.id.0);
        block.write_u64(Self::OFFSET_PARENT, self.parent.0);
        block.write_u64(Self::OFFSET_KEY_COUNT, self.key_count as u64);
        for i in 0..MAX_KEYS {
            block.write_i64(Self::OFFSET_KEYS + i * 8, self.keys[i]);
            block.write_i64(Self::OFFSET_VALUES + i * 8, self.values[i]);
        }
        for i in 0..MAX_CHILDREN {
            block.write_u64(Self::OFFSET_CHILDREN + i * 8, self.children[i].0);
        }
        block
    }

    /// Decode a node from a raw block.
    pub fn from_block(block: &Block) -> Self {
        let mut node = Self::new(BlockId::new(block.read_u64(Self::OFFSET_ID)));
        node.parent = BlockId::new(block.read_u64(Self::OFFSET_PARENT));
        node.key_count = block.read_u64(Self::OFFSET_KEY_COUNT) as usize;
        for i in 0..MAX_KEYS {
            node.keys[i] = block.read_i64(Self::OFFSET_KEYS + i * 8);
            node.values[i] = block.read_i64(Self::OFFSET_VALUES + i * 8);
        }
        for i in 0..MAX_CHILDREN {
            node.children[i] = BlockId::new(block.read_u64(Self::OFFSET_CHILDREN + i * 8));
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::BLOCK_SIZE;

    #[test]
    fn test_field_offsets() {
        assert_eq!(Node::OFFSET_VALUES, 176);
        assert_eq!(Node::OFFSET_CHILDREN, 328);
        assert_eq!(Node::OFFSET_CHILDREN + MAX_CHILDREN * 8, 488);
        assert!(Node::OFFSET_CHILDREN + MAX_CHILDREN * 8 <= BLOCK_SIZE);
    }

    #[test]
    fn test_new_node_is_empty_leaf() {
        let node = Node::new(BlockId::new(1));
        assert_eq!(node.key_count, 0);
        assert!(node.parent.is_null());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_leafness_is_derived() {
        let mut node = Node::new(BlockId::new(1));
        assert!(node.is_leaf());

        // Any non-null child slot makes the node internal
        node.children[3] = BlockId::new(7);
        assert!(!node.is_leaf());

        node.children[3] = BlockId::NULL;
        assert!(node.is_leaf());
    }

    #[test]
    fn test_node_roundtrip() {
        let mut node = Node::new(BlockId::new(4));
        node.parent = BlockId::new(2);
        node.key_count = 3;
        node.keys[..3].copy_from_slice(&[-10, 0, 25]);
        node.values[..3].copy_from_slice(&[100, 200, 300]);
        node.children[0] = BlockId::new(5);
        node.children[3] = BlockId::new(9);

        let recovered = Node::from_block(&node.to_block());
        assert_eq!(node, recovered);
    }

    #[test]
    fn test_node_byte_layout() {
        let mut node = Node::new(BlockId::new(2));
        node.parent = BlockId::new(1);
        node.key_count = 1;
        node.keys[0] = 3;
        node.values[0] = 4;
        node.children[0] = BlockId::new(6);

        let block = node.to_block();

        // Big-endian u64: value sits in the last byte of each field
        assert_eq!(block.as_slice()[7], 2); // id
        assert_eq!(block.as_slice()[15], 1); // parent
        assert_eq!(block.as_slice()[23], 1); // key_count
        assert_eq!(block.as_slice()[Node::OFFSET_KEYS + 7], 3); // keys[0]
        assert_eq!(block.as_slice()[Node::OFFSET_VALUES + 7], 4); // values[0]
        assert_eq!(block.as_slice()[Node::OFFSET_CHILDREN + 7], 6); // children[0]
        // Zero padding past the children array
        assert!(block.as_slice()[488..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_is_total_over_any_block() {
        // No checksum, no validity tag: a corrupt block decodes to whatever
        // values its bytes produce.
        let mut block = Block::new();
        block.as_mut_slice().fill(0x7F);
        let node = Node::from_block(&block);
        assert!(!node.is_leaf());
    }
}
