//! Path-level index operations.
//!
//! Each function here runs one full engine session: open the file, read the
//! header, build a fresh cache, perform the operation, and (for mutations)
//! flush. There is no cross-session cache retention; correctness of
//! repeated sessions rests entirely on every session leaving the on-disk
//! state consistent.

use std::path::Path;

use tracing::debug;

use crate::common::{Error, Result};
use crate::storage::BlockStore;
use crate::tree::BTree;

/// Initialize a new index file with an empty-tree header.
///
/// # Errors
/// `Error::AlreadyExists` if the path exists; the existing file is not
/// modified.
pub fn create<P: AsRef<Path>>(path: P) -> Result<()> {
    BlockStore::create(path)?;
    Ok(())
}

/// Apply one insertion and flush.
pub fn insert<P: AsRef<Path>>(path: P, key: i64, value: i64) -> Result<()> {
    let store = BlockStore::open(path)?;
    let mut tree = BTree::new(store)?;
    tree.insert(key, value)?;
    tree.flush()
}

/// Look up a single key. Absence is `None`, not an error.
pub fn search<P: AsRef<Path>>(path: P, key: i64) -> Result<Option<i64>> {
    let store = BlockStore::open(path)?;
    let mut tree = BTree::new(store)?;
    tree.search(key)
}

/// Return all pairs in ascending key order.
pub fn get_all<P: AsRef<Path>>(path: P) -> Result<Vec<(i64, i64)>> {
    let store = BlockStore::open(path)?;
    let mut tree = BTree::new(store)?;
    tree.get_all()
}

/// Bulk-load `key,value` records from a CSV file.
///
/// Every record that is not exactly two integer fields is skipped without
/// aborting the batch; each valid record is applied through a fresh insert
/// session. Returns `(inserted, skipped)` counts.
///
/// # Errors
/// `Error::Io` if the CSV file cannot be read, or any error from an
/// individual insert session.
pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(path: P, csv_path: Q) -> Result<(usize, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(csv_path.as_ref())?;

    let mut inserted = 0;
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        match parse_record(&record) {
            Ok((key, value)) => {
                insert(path.as_ref(), key, value)?;
                inserted += 1;
            }
            Err(Error::MalformedRecord(line)) => {
                debug!(line = %line, "skipping malformed record");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(inserted, skipped, "bulk load finished");
    Ok((inserted, skipped))
}

/// Write all pairs to a new CSV file as `key,value` lines, ascending.
///
/// # Errors
/// `Error::AlreadyExists` if the destination exists.
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(path: P, out_path: Q) -> Result<usize> {
    let out_path = out_path.as_ref();
    if out_path.exists() {
        return Err(Error::AlreadyExists(out_path.to_path_buf()));
    }

    let pairs = get_all(path)?;

    let mut writer = csv::Writer::from_path(out_path)?;
    for &(key, value) in &pairs {
        writer.write_record([key.to_string(), value.to_string()])?;
    }
    writer.flush()?;
    Ok(pairs.len())
}

/// Decode exactly two integer fields from one CSV record.
fn parse_record(record: &csv::StringRecord) -> Result<(i64, i64)> {
    let malformed = || Error::MalformedRecord(record.iter().collect::<Vec<_>>().join(","));

    if record.len() != 2 {
        return Err(malformed());
    }
    let key: i64 = record[0].parse().map_err(|_| malformed())?;
    let value: i64 = record[1].parse().map_err(|_| malformed())?;
    Ok((key, value))
}
