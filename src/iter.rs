//! Iterators for the [`Tree`] data structure.
//!
//! All iterators here walk the tree in inorder by following thread links, so
//! they carry a single node handle as state: no stack and no parent links.
//! Each borrows the tree immutably, which means any number of them can be
//! live at once.
use crate::node::NodeId;
use crate::Tree;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Ascending iterator over the entries of a [`Tree`].
///
/// Created by [`Tree::iter`].
pub struct Iter<'t, K, V> {
	tree: &'t Tree<K, V>,
	front: Option<NodeId>,
	remaining: usize,
}

impl<'t, K, V> Iter<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Self {
		Iter {
			tree,
			front: tree.leftmost(tree.root),
			remaining: tree.len(),
		}
	}
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
	type Item = (&'t K, &'t V);

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		let id = self.front?;
		let tree = self.tree;
		self.front = tree.inorder_next(id);
		self.remaining = self.remaining.saturating_sub(1);
		let node = tree.node(id);
		Some((&node.key, &node.value))
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
	fn clone(&self) -> Self {
		Iter {
			tree: self.tree,
			front: self.front,
			remaining: self.remaining,
		}
	}
}

/// Ascending iterator over the keys of a [`Tree`].
///
/// Created by [`Tree::keys`].
#[derive(Clone)]
pub struct Keys<'t, K, V> {
	inner: Iter<'t, K, V>,
}

impl<'t, K, V> Keys<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Self {
		Keys {
			inner: Iter::new(tree),
		}
	}
}

impl<'t, K, V> Iterator for Keys<'t, K, V> {
	type Item = &'t K;

	#[inline]
	fn next(&mut self) -> Option<&'t K> {
		self.inner.next().map(|(k, _)| k)
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`Tree`], in ascending key order.
///
/// Created by [`Tree::values`].
#[derive(Clone)]
pub struct Values<'t, K, V> {
	inner: Iter<'t, K, V>,
}

impl<'t, K, V> Values<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Self {
		Values {
			inner: Iter::new(tree),
		}
	}
}

impl<'t, K, V> Iterator for Values<'t, K, V> {
	type Item = &'t V;

	#[inline]
	fn next(&mut self) -> Option<&'t V> {
		self.inner.next().map(|(_, v)| v)
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<'t, K, V> IntoIterator for &'t Tree<K, V> {
	type Item = (&'t K, &'t V);
	type IntoIter = Iter<'t, K, V>;

	fn into_iter(self) -> Iter<'t, K, V> {
		self.iter()
	}
}

/// Raw seekable cursor over the entries of the tree.
///
/// Unlike the cursor built into [`Tree`] ([`Tree::begin`] / [`Tree::next`]),
/// a `RawIter` borrows the tree and owns its position, so several can walk
/// the same tree independently. A fresh `RawIter` is unpositioned and yields
/// nothing until one of the `seek` methods is called.
pub struct RawIter<'t, K, V> {
	tree: &'t Tree<K, V>,
	cursor: Option<NodeId>,
}

impl<'t, K: Ord, V> RawIter<'t, K, V> {
	pub(crate) fn new(tree: &'t Tree<K, V>) -> Self {
		RawIter {
			tree,
			cursor: None,
		}
	}

	/// Positions the cursor on the first (smallest) key of the tree.
	pub fn seek_to_first(&mut self) {
		self.cursor = self.tree.leftmost(self.tree.root);
	}

	/// Positions the cursor on the first key greater than or equal to `key`.
	///
	/// The descent remembers the last node where it turned left: if `key` is
	/// absent, that node holds the smallest larger key.
	pub fn seek<Q>(&mut self, key: &Q)
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let tree = self.tree;
		let mut candidate = None;
		let mut cur = tree.root;

		while let Some(id) = cur {
			let node = tree.node(id);
			match key.cmp(node.key.borrow()) {
				Ordering::Equal => {
					self.cursor = Some(id);
					return;
				}
				Ordering::Less => {
					candidate = Some(id);
					cur = node.left;
				}
				Ordering::Greater => {
					if node.right.is_threaded() {
						// Fell off the right of a threaded node: its successor
						// is the first key above it, or the walk is past the end.
						self.cursor = node.right.target();
						return;
					}
					cur = node.right.target();
				}
			}
		}

		self.cursor = candidate;
	}

	/// Positions the cursor on `key`, returning `false` (and leaving the
	/// cursor exhausted) if it is not present.
	pub fn seek_exact<Q>(&mut self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.cursor = self.tree.find(key);
		self.cursor.is_some()
	}

	/// Returns the entry under the cursor and advances past it.
	///
	/// An advance through a thread link is a single step; an advance through
	/// a real right child descends to the leftmost node of that subtree.
	#[inline]
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<(&'t K, &'t V)> {
		let id = self.cursor?;
		let tree = self.tree;
		self.cursor = tree.inorder_next(id);
		let node = tree.node(id);
		Some((&node.key, &node.value))
	}

	/// Returns the entry under the cursor without advancing.
	pub fn peek(&self) -> Option<(&'t K, &'t V)> {
		let tree = self.tree;
		self.cursor.map(|id| {
			let node = tree.node(id);
			(&node.key, &node.value)
		})
	}
}
