//! B-tree engine: search, insertion with preemptive splitting, and
//! in-order traversal.
//!
//! The engine operates only on nodes obtained through the [`NodeCache`] and
//! writes every node it mutates immediately after the mutation. Splits
//! happen top-down on the way to the leaf: any full node is split *before*
//! it is descended into, so no insert ever needs a pass back up the tree.

use tracing::{debug, trace};

use crate::common::config::{DEGREE, MAX_KEYS};
use crate::common::{BlockId, Result};
use crate::storage::{BlockStore, FileHeader};

use super::cache::{CacheStats, NodeCache};
use super::node::Node;

/// A B-tree over one open index file.
///
/// Holds the open store (inside the cache) plus in-memory mirrors of the
/// header fields. The engine is stateless beyond this triple: the tree on
/// disk is a valid balanced B-tree after every completed `insert`.
///
/// Any store failure aborts the in-progress operation; there is no retry
/// and no partial-state repair. A node allocated in memory whose downstream
/// write failed mid-split may remain unreachable in the file - an accepted
/// limitation, since ids are never reused.
pub struct BTree {
    cache: NodeCache,
    root: BlockId,
    next_block_id: u64,
}

impl BTree {
    /// Open a tree over a store, reading the header.
    pub fn new(mut store: BlockStore) -> Result<Self> {
        let header = store.read_header()?;
        Ok(Self {
            cache: NodeCache::new(store),
            root: header.root,
            next_block_id: header.next_block_id,
        })
    }

    /// Look up `key`, returning its value or `None`.
    ///
    /// With duplicate keys, this returns the first occurrence on the
    /// descent path, which is the leftmost entry in traversal order.
    pub fn search(&mut self, key: i64) -> Result<Option<i64>> {
        if self.root.is_null() {
            return Ok(None);
        }

        let mut current = self.root;
        loop {
            let node = self.cache.get(current)?;

            let mut i = 0;
            while i < node.key_count && key > node.keys[i] {
                i += 1;
            }
            if i < node.key_count && key == node.keys[i] {
                return Ok(Some(node.values[i]));
            }
            if node.is_leaf() {
                return Ok(None);
            }
            current = node.children[i];
        }
    }

    /// Insert one key/value pair.
    ///
    /// Duplicate keys are not rejected: a repeated key becomes an
    /// additional entry adjacent to the existing one.
    pub fn insert(&mut self, key: i64, value: i64) -> Result<()> {
        if self.root.is_null() {
            let mut root = self.allocate_node()?;
            root.keys[0] = key;
            root.values[0] = value;
            root.key_count = 1;
            self.root = root.id;
            self.write_header()?;
            self.cache.write_through(&root)?;
            return Ok(());
        }

        let root = self.cache.get(self.root)?;
        if root.key_count == MAX_KEYS {
            // Preemptive root split: the old root becomes child 0 of a
            // fresh root, which then splits it before the descent begins.
            let mut new_root = self.allocate_node()?;
            new_root.children[0] = root.id;

            let mut old_root = root;
            old_root.parent = new_root.id;

            self.split_child(&mut new_root, 0, old_root)?;
            self.root = new_root.id;
            self.write_header()?;
            debug!(root = %new_root.id, "root split, tree grew one level");

            self.insert_non_full(new_root, key, value)
        } else {
            self.insert_non_full(root, key, value)
        }
    }

    /// Return all pairs in ascending key order.
    ///
    /// The in-order walk already yields ascending order; the final sort is
    /// a stable defensive pass that preserves duplicate order.
    pub fn get_all(&mut self) -> Result<Vec<(i64, i64)>> {
        let mut out = Vec::new();
        if self.root.is_null() {
            return Ok(out);
        }
        self.collect(self.root, &mut out)?;
        out.sort_by_key(|&(k, _)| k);
        Ok(out)
    }

    /// Session-end flush: every cached node, then the header, then fsync.
    ///
    /// Redundant with the write-through done after each mutation, and kept
    /// that way: the double flush is behavior, not a correctness
    /// requirement.
    pub fn flush(&mut self) -> Result<()> {
        self.cache.flush_all()?;
        self.write_header()?;
        self.cache.store_mut().sync()
    }

    /// Cache counters for this session.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Descend from `node` (known non-full) to the destination leaf,
    /// splitting any full child on the way down.
    fn insert_non_full(&mut self, mut node: Node, key: i64, value: i64) -> Result<()> {
        loop {
            if node.is_leaf() {
                // Shift entries one slot right to keep ascending order.
                // An equal key stops the shift, so a duplicate lands just
                // after the existing entry.
                let mut i = node.key_count;
                while i > 0 && key < node.keys[i - 1] {
                    node.keys[i] = node.keys[i - 1];
                    node.values[i] = node.values[i - 1];
                    i -= 1;
                }
                node.keys[i] = key;
                node.values[i] = value;
                node.key_count += 1;
                self.cache.write_through(&node)?;
                return Ok(());
            }

            let mut i = node.key_count;
            while i > 0 && key < node.keys[i - 1] {
                i -= 1;
            }

            let child = self.cache.get(node.children[i])?;
            if child.key_count == MAX_KEYS {
                self.split_child(&mut node, i, child)?;
                // The promoted median landed at index i; step past it when
                // the new key belongs in the upper half.
                if key > node.keys[i] {
                    i += 1;
                }
            }
            node = self.cache.get(node.children[i])?;
        }
    }

    /// Split `full` (holding exactly MAX_KEYS keys), promoting its median
    /// key into `parent` at `index`.
    ///
    /// The new sibling receives the upper DEGREE-1 keys/values (and, for an
    /// internal node, the upper DEGREE children); `full` is truncated to
    /// its lower DEGREE-1 entries by key count alone, leaving stale bytes
    /// in the upper slots exactly as the wire format expects. All three
    /// nodes are written through before the insert continues.
    fn split_child(&mut self, parent: &mut Node, index: usize, mut full: Node) -> Result<()> {
        let mut sibling = self.allocate_node()?;
        sibling.parent = parent.id;
        sibling.key_count = DEGREE - 1;

        for j in 0..DEGREE - 1 {
            sibling.keys[j] = full.keys[j + DEGREE];
            sibling.values[j] = full.values[j + DEGREE];
        }
        if !full.is_leaf() {
            for j in 0..DEGREE {
                sibling.children[j] = full.children[j + DEGREE];
            }
        }

        full.key_count = DEGREE - 1;

        // Make room in the parent: children right of index move one slot
        // right, then keys/values at and right of index.
        let mut j = parent.key_count;
        while j >= index + 1 {
            parent.children[j + 1] = parent.children[j];
            j -= 1;
        }
        parent.children[index + 1] = sibling.id;

        let mut j = parent.key_count;
        while j > index {
            parent.keys[j] = parent.keys[j - 1];
            parent.values[j] = parent.values[j - 1];
            j -= 1;
        }
        parent.keys[index] = full.keys[DEGREE - 1];
        parent.values[index] = full.values[DEGREE - 1];
        parent.key_count += 1;

        trace!(
            parent = %parent.id,
            child = %full.id,
            sibling = %sibling.id,
            median = parent.keys[index],
            "split child"
        );

        self.cache.write_through(&full)?;
        self.cache.write_through(&sibling)?;
        self.cache.write_through(parent)?;
        Ok(())
    }

    /// In-order walk below `id`, appending pairs to `out`.
    fn collect(&mut self, id: BlockId, out: &mut Vec<(i64, i64)>) -> Result<()> {
        let node = self.cache.get(id)?;
        let leaf = node.is_leaf();

        for i in 0..node.key_count {
            if !leaf {
                self.collect(node.children[i], out)?;
            }
            out.push((node.keys[i], node.values[i]));
        }
        if !leaf {
            self.collect(node.children[node.key_count], out)?;
        }
        Ok(())
    }

    /// Hand out the next block id and register the fresh node with the
    /// cache, unwritten.
    fn allocate_node(&mut self) -> Result<Node> {
        let node = Node::new(BlockId::new(self.next_block_id));
        self.next_block_id += 1;
        self.cache.put(node.clone())?;
        Ok(node)
    }

    fn write_header(&mut self) -> Result<()> {
        let header = FileHeader {
            root: self.root,
            next_block_id: self.next_block_id,
        };
        self.cache.store_mut().write_header(&header)
    }
}
