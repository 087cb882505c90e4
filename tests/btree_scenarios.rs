//! Cross-component tests for the B-tree engine over a real file.
//!
//! These exercise behavior unit tests don't cover: multi-session
//! durability, eviction under small cache pressure, and the on-disk shape
//! after splits.

use blockindex::storage::BlockStore;
use blockindex::tree::{BTree, Node};
use blockindex::{BlockId, DEGREE, MAX_KEYS};
use proptest::prelude::*;
use tempfile::tempdir;

fn create_tree_at(path: &std::path::Path) -> BTree {
    let store = BlockStore::create(path).unwrap();
    BTree::new(store).unwrap()
}

fn open_tree_at(path: &std::path::Path) -> BTree {
    let store = BlockStore::open(path).unwrap();
    BTree::new(store).unwrap()
}

/// Read a node straight from the file, bypassing any cache.
fn read_node(path: &std::path::Path, id: BlockId) -> Node {
    let mut store = BlockStore::open(path).unwrap();
    Node::from_block(&store.read_block(id).unwrap())
}

/// Keys 1..=19 ascending fill the root exactly, with no split.
#[test]
fn test_nineteen_ascending_keys_stay_in_one_node() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario_a.idx");

    let mut tree = create_tree_at(&path);
    for k in 1..=19i64 {
        tree.insert(k, k * 100).unwrap();
    }
    tree.flush().unwrap();

    let mut store = BlockStore::open(&path).unwrap();
    let header = store.read_header().unwrap();
    let root = read_node(&path, header.root);
    assert_eq!(root.key_count, MAX_KEYS);
    assert!(root.is_leaf());

    let pairs = open_tree_at(&path).get_all().unwrap();
    let expected: Vec<(i64, i64)> = (1..=19).map(|k| (k, k * 100)).collect();
    assert_eq!(pairs, expected);
}

/// The twentieth key splits the root: median 10 promoted, 9 keys left,
/// 10 keys (including the new 20) right.
#[test]
fn test_twentieth_key_splits_root_around_median() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario_b.idx");

    let mut tree = create_tree_at(&path);
    for k in 1..=20i64 {
        tree.insert(k, k * 100).unwrap();
    }
    tree.flush().unwrap();

    let mut store = BlockStore::open(&path).unwrap();
    let header = store.read_header().unwrap();
    let root = read_node(&path, header.root);
    assert_eq!(root.key_count, 1);
    assert_eq!(root.keys[0], 10);

    let left = read_node(&path, root.children[0]);
    let right = read_node(&path, root.children[1]);
    assert_eq!(&left.keys[..left.key_count], &(1..=9).collect::<Vec<i64>>()[..]);
    assert_eq!(right.key_count, DEGREE);
    assert_eq!(
        &right.keys[..right.key_count],
        &(11..=20).collect::<Vec<i64>>()[..]
    );
    assert_eq!(left.parent, root.id);
    assert_eq!(right.parent, root.id);

    // The median answers directly from the new root
    assert_eq!(open_tree_at(&path).search(10).unwrap(), Some(1000));
}

/// Closing after N inserts and reopening reproduces the identical sorted
/// pair list.
#[test]
fn test_durability_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("durability.idx");

    let expected: Vec<(i64, i64)>;
    {
        let mut tree = create_tree_at(&path);
        for k in 0..150i64 {
            tree.insert((k * 61) % 150, k).unwrap();
        }
        expected = tree.get_all().unwrap();
        tree.flush().unwrap();
    }

    let mut reopened = open_tree_at(&path);
    assert_eq!(reopened.get_all().unwrap(), expected);
}

/// Touching far more than 3 distinct blocks in one session forces
/// evictions; they must not change the logical content.
#[test]
fn test_eviction_flush_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("eviction.idx");

    let mut tree = create_tree_at(&path);
    for k in 0..300i64 {
        tree.insert(k, k + 7).unwrap();
    }

    let stats = tree.cache_stats();
    assert!(stats.evictions > 0, "expected cache pressure, got {stats:?}");

    let pairs = tree.get_all().unwrap();
    assert_eq!(pairs.len(), 300);
    for (i, &(k, v)) in pairs.iter().enumerate() {
        assert_eq!(k, i as i64);
        assert_eq!(v, k + 7);
    }
}

/// One fresh engine session per insert, the bulk-load pattern: every
/// session must leave the file fully consistent for the next.
#[test]
fn test_session_per_insert() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.idx");

    BlockStore::create(&path).unwrap();
    for k in 0..60i64 {
        let mut tree = open_tree_at(&path);
        tree.insert((k * 13) % 60, k).unwrap();
        tree.flush().unwrap();
    }

    let mut tree = open_tree_at(&path);
    let keys: Vec<i64> = tree.get_all().unwrap().iter().map(|&(k, _)| k).collect();
    assert_eq!(keys, (0..60).collect::<Vec<i64>>());
}

proptest! {
    /// For any set of unique keys, traversal returns exactly those pairs
    /// sorted ascending, and every key is searchable.
    #[test]
    fn prop_traversal_is_sorted_and_complete(
        keys in proptest::collection::hash_set(any::<i64>(), 0..120)
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prop.idx");

        let mut tree = create_tree_at(&path);
        for &k in &keys {
            tree.insert(k, k.wrapping_mul(3)).unwrap();
        }

        let pairs = tree.get_all().unwrap();
        let mut expected: Vec<(i64, i64)> =
            keys.iter().map(|&k| (k, k.wrapping_mul(3))).collect();
        expected.sort_by_key(|&(k, _)| k);
        prop_assert_eq!(pairs, expected);

        for &k in &keys {
            prop_assert_eq!(tree.search(k).unwrap(), Some(k.wrapping_mul(3)));
        }
    }
}
