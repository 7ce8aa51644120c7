//! # Integration Tests for the Threaded Tree
//!
//! End-to-end tests that exercise the tree through its public API with
//! realistic workloads.

use rand::prelude::*;
use std::collections::BTreeMap;
use threadtree::Tree;

// ===========================================================================
// Scenario Tests
// ===========================================================================

#[test]
fn five_key_scenario() {
	let mut tree = Tree::new();
	for (k, v) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
		tree.insert(k, v);
	}

	assert_eq!(tree.search(&3), Some(&"c"));
	assert_eq!(tree.len(), 5);

	let mut keys = Vec::new();
	tree.begin();
	while let Some(k) = tree.next() {
		keys.push(k);
	}
	assert_eq!(keys, vec![1, 3, 4, 5, 8]);
}

#[test]
fn ascending_chain_scenario() {
	let mut tree = Tree::new();
	for k in [10, 20, 30] {
		tree.insert(k, k.to_string());
	}

	assert_eq!(tree.right_key(&10), 20);
	assert_eq!(tree.right_key(&30), 0);
}

#[test]
fn single_key_dump_scenario() {
	let mut tree = Tree::new();
	tree.insert(7, "g");

	let mut out = Vec::new();
	tree.dump(&mut out).unwrap();
	let text = String::from_utf8(out).unwrap();

	let data: Vec<&str> = text.lines().filter(|line| line.starts_with('(')).collect();
	assert_eq!(data, vec!["(7,g)"]);
}

#[test]
fn string_keys() {
	let mut tree: Tree<String, usize> = Tree::new();
	for word in "the quick brown fox jumps over the lazy dog".split(' ') {
		let len = tree.len();
		tree.insert(word.to_string(), len);
	}

	assert_eq!(tree.len(), 8);
	// Borrowed lookups through `str`.
	assert_eq!(tree.search("the"), Some(&0));
	assert_eq!(tree.search("dog"), Some(&7));
	assert!(tree.contains_key("fox"));
	assert!(!tree.contains_key("cat"));
	assert_eq!(tree.right_key("dog"), "fox");

	let words: Vec<&str> = tree.keys().map(String::as_str).collect();
	assert_eq!(words, vec!["brown", "dog", "fox", "jumps", "lazy", "over", "quick", "the"]);
}

// ===========================================================================
// Large Scale Operation Tests
// ===========================================================================

#[test]
fn large_scale_random_insert_and_search() {
	let mut tree: Tree<i64, i64> = Tree::new();
	let mut expected = BTreeMap::new();
	let mut rng = StdRng::seed_from_u64(1234);

	for _ in 0..20_000 {
		let key: i64 = rng.random_range(-50_000..50_000);
		let value: i64 = rng.random();
		tree.insert(key, value);
		expected.entry(key).or_insert(value);
	}

	tree.assert_invariants();
	assert_eq!(tree.len(), expected.len());

	for (k, v) in &expected {
		assert_eq!(tree.search(k), Some(v), "Failed to find key {}", k);
	}

	for _ in 0..1000 {
		let probe: i64 = rng.random_range(-60_000..60_000);
		assert_eq!(tree.search(&probe), expected.get(&probe));
	}

	assert!(tree.iter().eq(expected.iter()));
}

#[test]
fn lookup_or_default_on_missing_keys() {
	let tree: Tree<i32, Vec<u8>> = (0..100).map(|i| (i * 2, vec![i as u8])).collect();

	for i in 0..200 {
		let value = tree.lookup_or_default(&i);
		if i % 2 == 0 {
			assert_eq!(value, vec![(i / 2) as u8]);
		} else {
			assert!(value.is_empty());
		}
	}
}

// ===========================================================================
// Traversal Tests
// ===========================================================================

#[test]
fn cursor_and_iterators_interleave() {
	let mut tree: Tree<i32, i32> = [4, 2, 6, 1, 3, 5, 7].into_iter().map(|k| (k, -k)).collect();

	tree.begin();
	assert_eq!(tree.next(), Some(1));
	assert_eq!(tree.next(), Some(2));

	// A full iterator pass does not disturb the built-in cursor.
	let all: Vec<i32> = tree.keys().copied().collect();
	assert_eq!(all, vec![1, 2, 3, 4, 5, 6, 7]);

	assert_eq!(tree.next(), Some(3));

	let pairs: Vec<(i32, i32)> = (&tree).into_iter().map(|(k, v)| (*k, *v)).collect();
	assert_eq!(pairs[0], (1, -1));
	assert_eq!(pairs.len(), 7);
}

#[test]
fn raw_iter_range_scan() {
	let tree: Tree<u32, u32> = (0..1000).map(|i| (i * 3, i)).collect();

	let mut iter = tree.raw_iter();
	iter.seek(&100);

	let mut scanned = Vec::new();
	while let Some((k, _)) = iter.next() {
		if *k > 130 {
			break;
		}
		scanned.push(*k);
	}
	assert_eq!(scanned, vec![102, 105, 108, 111, 114, 117, 120, 123, 126, 129]);
}

// ===========================================================================
// Copy Tests
// ===========================================================================

#[test]
fn copy_then_mutate_both() {
	let mut original: Tree<i32, i32> = (0..100).map(|i| ((i * 37) % 101, i)).collect();
	let mut copy = original.clone();

	original.insert(1000, 0);
	copy.insert(-1, 0);

	assert!(original.contains_key(&1000));
	assert!(!original.contains_key(&-1));
	assert!(copy.contains_key(&-1));
	assert!(!copy.contains_key(&1000));

	original.assert_invariants();
	copy.assert_invariants();
}

#[test]
fn clone_from_clears_target() {
	let source: Tree<i32, i32> = (0..10).map(|i| (i, i)).collect();
	let mut target: Tree<i32, i32> = (100..200).map(|i| (i, i)).collect();

	target.begin();
	target.clone_from(&source);

	assert_eq!(target.len(), 10);
	assert_eq!(target, source);
	// The old traversal was abandoned with the old contents.
	assert_eq!(target.next(), None);
}
