//! B-tree layer - node records, the write-back cache and the engine.
//!
//! # Components
//! - [`Node`] - One node record and its block codec
//! - [`NodeCache`] - Capacity-3 recency-ordered cache with flush-on-evict
//! - [`BTree`] - Search, insert-with-split, in-order traversal

mod btree;
mod cache;
mod node;

pub use btree::BTree;
pub use cache::{CacheStats, NodeCache};
pub use node::Node;
