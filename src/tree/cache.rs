//! Bounded write-back node cache.
//!
//! The [`NodeCache`] sits between the B-tree engine and the [`BlockStore`]:
//! a capacity-3, recency-ordered map from block id to node that flushes the
//! least-recently-used entry to the store before dropping it.
//!
//! The eviction write is a safety net, not the primary durability
//! mechanism: the engine already writes every node it mutates through
//! [`NodeCache::write_through`]. Eviction and the session-end
//! [`NodeCache::flush_all`] are deliberately redundant so that no update is
//! lost even if that invariant is ever violated.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::common::config::CACHE_CAPACITY;
use crate::common::{BlockId, Result};
use crate::storage::BlockStore;

use super::node::Node;

/// Counters tracked by the node cache.
///
/// Plain `u64` fields: the engine is single-threaded, so there is nothing
/// to synchronize.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups satisfied from the cache.
    pub hits: u64,
    /// Lookups that had to read the store.
    pub misses: u64,
    /// Entries dropped after being flushed.
    pub evictions: u64,
    /// Node blocks written to the store (write-through, eviction and flush).
    pub blocks_written: u64,
}

/// A capacity-bounded, recency-ordered cache of B-tree nodes.
///
/// Owns the [`BlockStore`]: misses are satisfied from it, and every path
/// that drops an entry writes it back first, as a direct synchronous call
/// before removal.
///
/// Cached nodes are plain values. [`NodeCache::get`] hands out an
/// independent copy; a mutated copy only becomes visible (and durable) once
/// it is put or written back through the cache.
pub struct NodeCache {
    store: BlockStore,
    nodes: HashMap<BlockId, Node>,
    /// Access order; front = least recently used.
    recency: VecDeque<BlockId>,
    capacity: usize,
    stats: CacheStats,
}

impl NodeCache {
    /// Create a cache with the standard capacity over an open store.
    pub fn new(store: BlockStore) -> Self {
        Self {
            store,
            nodes: HashMap::new(),
            recency: VecDeque::new(),
            capacity: CACHE_CAPACITY,
            stats: CacheStats::default(),
        }
    }

    /// Fetch the node for `id`, marking it most-recently-used.
    ///
    /// A hit returns a copy of the cached node; a miss reads the block from
    /// the store and inserts it (possibly evicting the LRU entry).
    pub fn get(&mut self, id: BlockId) -> Result<Node> {
        if let Some(node) = self.nodes.get(&id) {
            self.stats.hits += 1;
            let node = node.clone();
            self.touch(id);
            return Ok(node);
        }

        self.stats.misses += 1;
        let block = self.store.read_block(id)?;
        let node = Node::from_block(&block);
        self.put(node.clone())?;
        Ok(node)
    }

    /// Insert or replace the entry for `node.id`, marking it
    /// most-recently-used.
    ///
    /// If the cache then holds more than its capacity, the single
    /// least-recently-used entry is written to the store and removed.
    pub fn put(&mut self, node: Node) -> Result<()> {
        let id = node.id;
        self.nodes.insert(id, node);
        self.touch(id);

        if self.nodes.len() > self.capacity {
            self.evict_lru()?;
        }
        Ok(())
    }

    /// Insert `node` and write it to the store immediately.
    ///
    /// This is the engine's persist step after every mutation - the primary
    /// durability path.
    pub fn write_through(&mut self, node: &Node) -> Result<()> {
        self.store.write_block(node.id, &node.to_block())?;
        self.stats.blocks_written += 1;
        self.put(node.clone())
    }

    /// Write every cached node to the store without removing entries.
    ///
    /// Used at session end; idempotent with respect to logical content.
    pub fn flush_all(&mut self) -> Result<()> {
        for node in self.nodes.values() {
            self.store.write_block(node.id, &node.to_block())?;
            self.stats.blocks_written += 1;
        }
        debug!(cached = self.nodes.len(), stats = ?self.stats, "cache flushed");
        Ok(())
    }

    /// Whether `id` currently has a cached entry.
    pub fn contains(&self, id: BlockId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counters since the cache was created.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Direct access to the underlying store, for header I/O.
    pub fn store_mut(&mut self) -> &mut BlockStore {
        &mut self.store
    }

    /// Move `id` to the most-recently-used position.
    fn touch(&mut self, id: BlockId) {
        if let Some(pos) = self.recency.iter().position(|&x| x == id) {
            self.recency.remove(pos);
        }
        self.recency.push_back(id);
    }

    /// Flush and drop the least-recently-used entry.
    ///
    /// The write happens before removal; a failed write leaves the entry in
    /// place and aborts the caller's operation.
    fn evict_lru(&mut self) -> Result<()> {
        let Some(&victim) = self.recency.front() else {
            return Ok(());
        };

        if let Some(node) = self.nodes.get(&victim) {
            self.store.write_block(victim, &node.to_block())?;
            self.stats.blocks_written += 1;
        }

        self.recency.pop_front();
        self.nodes.remove(&victim);
        self.stats.evictions += 1;
        trace!(victim = %victim, "evicted node after flush");
        Ok(())
    }
}
