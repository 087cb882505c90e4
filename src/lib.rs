//! blockindex - a persistent single-file B-tree index.
//!
//! Maps 64-bit integer keys to 64-bit integer values, stored as a B-tree in
//! fixed 512-byte blocks of one file, for callers that need ordered lookup
//! and bulk ingestion without loading the dataset into memory.
//!
//! # Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     blockindex                       │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────┐   │
//! │  │     Session Operations (ops)                  │   │
//! │  │  create / insert / search / load / extract    │   │
//! │  └──────────────────────────────────────────────┘   │
//! │                         ↓                            │
//! │  ┌──────────────────────────────────────────────┐   │
//! │  │     B-Tree Engine (tree/)                     │   │
//! │  │  search + preemptive-split insert + traverse  │   │
//! │  │  ┌────────────────────────────────────────┐  │   │
//! │  │  │  NodeCache: 3 entries, LRU,            │  │   │
//! │  │  │  flush-before-evict                    │  │   │
//! │  │  └────────────────────────────────────────┘  │   │
//! │  └──────────────────────────────────────────────┘   │
//! │                         ↓                            │
//! │  ┌──────────────────────────────────────────────┐   │
//! │  │     Storage Layer (storage/)                  │   │
//! │  │  BlockStore + Block + FileHeader              │   │
//! │  └──────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`storage`] - Block I/O and the fixed binary formats
//! - [`tree`] - Node records, the write-back cache, the engine
//! - [`ops`] - One-session-per-call operations over a file path
//!
//! # Quick Start
//! ```no_run
//! use blockindex::ops;
//!
//! ops::create("my_index.idx").unwrap();
//! ops::insert("my_index.idx", 42, 4200).unwrap();
//! assert_eq!(ops::search("my_index.idx", 42).unwrap(), Some(4200));
//! ```

pub mod common;
pub mod ops;
pub mod storage;
pub mod tree;

// Re-export commonly used items at crate root for convenience
pub use common::config::{BLOCK_SIZE, DEGREE, MAX_CHILDREN, MAX_KEYS};
pub use common::{BlockId, Error, Result};

pub use storage::{Block, BlockStore, FileHeader};
pub use tree::{BTree, CacheStats, Node, NodeCache};
