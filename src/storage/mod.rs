//! Storage layer - block I/O and the fixed binary block formats.
//!
//! This module handles persistent storage:
//! - [`Block`] - The raw 512-byte data container
//! - [`FileHeader`] - The block-0 record (magic, root, allocator)
//! - [`BlockStore`] - Low-level file I/O, one block at a time

mod block;
mod block_store;
mod header;

pub use block::Block;
pub use block_store::BlockStore;
pub use header::FileHeader;
