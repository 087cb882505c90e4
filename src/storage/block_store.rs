//! Block store - low-level file I/O for index blocks.
//!
//! The [`BlockStore`] is a byte-addressed block device over a single file:
//! it reads and writes one 512-byte block at a time and owns the header in
//! block 0. It performs no caching and no validation beyond raw I/O and the
//! magic check on open.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::{BlockId, Error, Result};

use super::block::Block;
use super::header::FileHeader;

/// Manages block I/O for a single index file.
///
/// # File Layout
/// ```text
/// ┌──────────┬──────────┬──────────┬─────────┬──────────┐
/// │ Block 0  │ Block 1  │ Block 2  │  ...    │ Block N  │
/// │ (header) │ (node)   │ (node)   │         │ (node)   │
/// └──────────┴──────────┴──────────┴─────────┴──────────┘
/// Offset:  0       512       1024    ...    N×512
/// ```
///
/// Block N lives at file offset `N × 512`. Writing past the current end of
/// the file extends it.
///
/// # Thread Safety
/// `BlockStore` is single-threaded; exactly one engine instance is expected
/// to hold the file open at a time.
pub struct BlockStore {
    file: File,
}

impl BlockStore {
    /// Create a new index file with an empty-tree header.
    ///
    /// # Errors
    /// Returns `Error::AlreadyExists` if the path already exists (the
    /// existing file is left untouched), or `Error::Io` if the file cannot
    /// be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    Error::AlreadyExists(path.as_ref().to_path_buf())
                } else {
                    Error::Io(e)
                }
            })?;

        let mut store = Self { file };
        store.write_header(&FileHeader::new())?;
        Ok(store)
    }

    /// Open an existing index file, validating the magic bytes.
    ///
    /// The file is opened read-write even for read-only operations: cache
    /// eviction flushes unconditionally, and a flush must never fail on the
    /// handle's access mode.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be opened or is shorter than
    /// one block, `Error::InvalidFormat` if block 0 is not a recognized
    /// index header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let mut store = Self { file };
        store.read_header()?;
        Ok(store)
    }

    /// Read and decode the header from block 0.
    ///
    /// # Errors
    /// Returns `Error::InvalidFormat` if the magic mismatches.
    pub fn read_header(&mut self) -> Result<FileHeader> {
        let block = self.read_block(BlockId::new(0))?;
        FileHeader::from_block(&block)
    }

    /// Overwrite block 0 with the given header.
    pub fn write_header(&mut self, header: &FileHeader) -> Result<()> {
        self.write_block(BlockId::new(0), &header.to_block())
    }

    /// Read the raw block at offset `id × 512`.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file is truncated or unreadable at that
    /// offset.
    pub fn read_block(&mut self, id: BlockId) -> Result<Block> {
        self.file.seek(SeekFrom::Start(id.offset()))?;

        let mut block = Block::new();
        self.file.read_exact(block.as_mut_slice())?;
        Ok(block)
    }

    /// Write a block at offset `id × 512`, extending the file if `id` is
    /// beyond the current length.
    pub fn write_block(&mut self, id: BlockId, block: &Block) -> Result<()> {
        self.file.seek(SeekFrom::Start(id.offset()))?;
        self.file.write_all(block.as_slice())?;
        Ok(())
    }

    /// Flush file contents to stable storage.
    ///
    /// Called once at session flush rather than per block write.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Current file size in bytes.
    pub fn file_size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}
