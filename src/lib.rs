//! # threadtree: An Ordered Map on a Right-Threaded Binary Search Tree
//!
//! This crate provides [`Tree`], an ordered key/value container backed by an
//! unbalanced binary search tree whose empty right links are **threaded**:
//! instead of pointing nowhere, they point at the node's inorder successor.
//! Inorder traversal then needs neither a stack nor parent links, and every
//! step through a thread is O(1).
//!
//! ## Design Overview
//!
//! **Right links are a sum type**: each node's right side is one of
//! - `Child` - an owned right subtree,
//! - `Thread` - a non-owning link to the inorder successor,
//! - `End` - the node holds the largest key in the tree.
//!
//! **Nodes live in an arena**: the tree owns a `Vec` of nodes addressed by
//! index handles. Nodes are never removed individually (the tree has no
//! delete operation), so handles stay valid until the tree is cleared and
//! teardown is a single `Vec` drop, whatever the shape of the tree.
//!
//! **No rebalancing**: sorted input builds a degenerate chain, and lookups on
//! it are O(N). Nothing in the crate recurses on tree height, so such chains
//! are slow but never overflow the call stack.
//!
//! ### Tree Structure
//!
//! Inserting 5, 3, 8, 1, 4 produces (`~>` marks a thread link):
//!
//! ```text
//!                 ┌───┐
//!                 │ 5 │
//!                 └─┬─┘
//!            ┌──────┴──────┐
//!          ┌─┴─┐         ┌─┴─┐
//!          │ 3 │         │ 8 │ ~> End
//!          └─┬─┘         └───┘
//!       ┌────┴────┐
//!     ┌─┴─┐     ┌─┴─┐
//!     │ 1 │     │ 4 │ ~> 5
//!     └───┘     └───┘
//!    ~> 3
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use threadtree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert(5, "e");
//! tree.insert(3, "c");
//! tree.insert(8, "h");
//!
//! assert_eq!(tree.search(&3), Some(&"c"));
//! assert!(!tree.insert(3, "again")); // first value wins
//!
//! // Lazy inorder iteration
//! let keys: Vec<_> = tree.keys().copied().collect();
//! assert_eq!(keys, vec![3, 5, 8]);
//!
//! // The built-in begin/next cursor
//! tree.begin();
//! while let Some(key) = tree.next() {
//!     println!("{key}");
//! }
//! ```
//!
//! ## Thread Safety
//!
//! The tree is a plain single-owner value with no internal locking. The
//! built-in cursor is advanced through `&mut self`; the lazy iterators borrow
//! the tree immutably and can be used side by side.

use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

pub mod dump;
pub mod error;
pub mod iter;
mod node;

use node::{Node, NodeId, RightLink};

/// Inline capacity of the work-lists used by copy, height and validation
/// walks. Trees shallower than this never spill the work-list to the heap.
const WORKLIST_INLINE: usize = 32;

type WorkList<T> = SmallVec<[T; WORKLIST_INLINE]>;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered map backed by a right-threaded binary search tree.
///
/// # Type Parameters
///
/// - `K`: The key type. Most operations require `K: Ord`; the built-in
///   cursor and [`Clone`] also require `K: Clone`.
/// - `V`: The value type.
///
/// # Internal Structure
///
/// - `nodes`: the arena; its length is the entry count.
/// - `root`: handle of the root node, `None` for an empty tree.
/// - `cursor`: position of the built-in [`begin`](Tree::begin) /
///   [`next`](Tree::next) traversal.
pub struct Tree<K, V> {
	nodes: Vec<Node<K, V>>,
	root: Option<NodeId>,
	cursor: Option<NodeId>,
}

impl<K, V> Default for Tree<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

// ---------------------------------------------------------------------------
// Structural Helpers (no ordering required)
// ---------------------------------------------------------------------------

impl<K, V> Tree<K, V> {
	/// Creates a new, empty tree. Does not allocate.
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let tree: Tree<i32, String> = Tree::new();
	/// assert!(tree.is_empty());
	/// ```
	pub const fn new() -> Self {
		Tree {
			nodes: Vec::new(),
			root: None,
			cursor: None,
		}
	}

	/// Returns the number of entries in the tree. O(1).
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns `true` if the tree holds no entries.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Removes every entry, resetting the tree (and its cursor) to empty.
	///
	/// Nodes are dropped as one arena, so this never walks the links and
	/// costs the same on a balanced tree and on a degenerate chain.
	pub fn clear(&mut self) {
		if !self.nodes.is_empty() {
			debug!(len = self.nodes.len(), "clearing threaded tree");
		}
		self.nodes.clear();
		self.root = None;
		self.cursor = None;
	}

	/// Returns an ascending iterator over the entries of the tree.
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let tree: Tree<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
	/// let entries: Vec<_> = tree.iter().collect();
	/// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
	/// ```
	pub fn iter(&self) -> iter::Iter<'_, K, V> {
		iter::Iter::new(self)
	}

	/// Returns an ascending iterator over the keys of the tree.
	pub fn keys(&self) -> iter::Keys<'_, K, V> {
		iter::Keys::new(self)
	}

	/// Returns an iterator over the values of the tree, in key order.
	pub fn values(&self) -> iter::Values<'_, K, V> {
		iter::Values::new(self)
	}

	/// Returns the entry with the smallest key.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.leftmost(self.root).map(|id| {
			let node = self.node(id);
			(&node.key, &node.value)
		})
	}

	/// Returns the entry with the largest key, the one thread-terminal node.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		let mut cur = self.root?;
		while let RightLink::Child(child) = self.node(cur).right {
			cur = child;
		}
		let node = self.node(cur);
		Some((&node.key, &node.value))
	}

	/// Returns the number of nodes on the longest root-to-node path through
	/// owned links (0 for an empty tree).
	///
	/// Useful for spotting degenerate insert orders: sorted input gives a
	/// height equal to [`len`](Tree::len).
	pub fn height(&self) -> usize {
		let mut height = 0;
		let mut work: WorkList<(NodeId, usize)> = SmallVec::new();
		work.extend(self.root.map(|id| (id, 1)));

		while let Some((id, depth)) = work.pop() {
			height = height.max(depth);
			let node = self.node(id);
			if let Some(left) = node.left {
				work.push((left, depth + 1));
			}
			if let RightLink::Child(child) = node.right {
				work.push((child, depth + 1));
			}
		}
		height
	}

	#[inline]
	pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
		&self.nodes[id.slot()]
	}

	/// Descends `left` links from `from` to the smallest node of its subtree.
	#[inline]
	pub(crate) fn leftmost(&self, from: Option<NodeId>) -> Option<NodeId> {
		let mut cur = from?;
		while let Some(left) = self.node(cur).left {
			cur = left;
		}
		Some(cur)
	}

	/// The node following `id` in inorder.
	///
	/// A thread is followed directly; a real right child costs a descent to
	/// the leftmost node of that subtree.
	#[inline]
	pub(crate) fn inorder_next(&self, id: NodeId) -> Option<NodeId> {
		match self.node(id).right {
			RightLink::Thread(successor) => Some(successor),
			RightLink::End => None,
			RightLink::Child(child) => self.leftmost(Some(child)),
		}
	}
}

// ---------------------------------------------------------------------------
// Ordered Operations
// ---------------------------------------------------------------------------

impl<K: Ord, V> Tree<K, V> {
	/// Finds the node holding `key`.
	///
	/// Moving right is only possible through a `Child` link: a threaded node
	/// has no right subtree, so a larger key cannot be below it.
	pub(crate) fn find<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			cur = match key.cmp(node.key.borrow()) {
				Ordering::Equal => return Some(id),
				Ordering::Less => node.left,
				Ordering::Greater => match node.right {
					RightLink::Child(child) => Some(child),
					RightLink::Thread(_) | RightLink::End => None,
				},
			};
		}
		None
	}

	/// Returns a reference to the value stored under `key`.
	///
	/// O(log N) on average for randomly ordered inserts, O(N) in the worst
	/// case.
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.insert(3, "c");
	///
	/// assert_eq!(tree.search(&3), Some(&"c"));
	/// assert_eq!(tree.search(&4), None);
	/// ```
	pub fn search<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.find(key).map(|id| &self.node(id).value)
	}

	/// Returns `true` if the tree contains `key`.
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.find(key).is_some()
	}

	/// Returns a clone of the value stored under `key`.
	pub fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
		V: Clone,
	{
		self.search(key).cloned()
	}

	/// Returns a clone of the value stored under `key`, or `V::default()`
	/// when the key is absent.
	///
	/// An absent key and a key stored with the default value look the same
	/// here; use [`search`](Tree::search) to tell them apart.
	pub fn lookup_or_default<Q>(&self, key: &Q) -> V
	where
		K: Borrow<Q>,
		Q: ?Sized + Ord,
		V: Clone + Default,
	{
		self.get(key).unwrap_or_default()
	}

	/// Returns the key referenced by the right link of `key`'s node.
	///
	/// For a threaded node this is the inorder successor. For a node with a
	/// real right child it is the key at the **root** of the right subtree,
	/// which is not the inorder successor when that subtree has a left side.
	/// Returns `K::default()` if `key` is absent or holds the largest key.
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let mut tree = Tree::new();
	/// for k in [10, 30, 20] {
	///     tree.insert(k, ());
	/// }
	///
	/// assert_eq!(tree.right_key(&10), 30); // subtree root, not 20
	/// assert_eq!(tree.right_key(&20), 30); // thread
	/// assert_eq!(tree.right_key(&30), 0); // largest key
	/// ```
	pub fn right_key<Q>(&self, key: &Q) -> K
	where
		K: Borrow<Q> + Clone + Default,
		Q: ?Sized + Ord,
	{
		self.find(key)
			.and_then(|id| self.node(id).right.target())
			.map(|target| self.node(target).key.clone())
			.unwrap_or_default()
	}

	/// Inserts a key/value pair, returning `true` if a new entry was added.
	///
	/// Inserting an existing key leaves the tree untouched (the stored value
	/// is **not** replaced) and returns `false`.
	///
	/// The new node always lands in a threaded position. Hung to the left of
	/// its parent, it threads back to that parent; hung to the right, it takes
	/// over the parent's old thread and the parent gains a real right child.
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let mut tree = Tree::new();
	/// assert!(tree.insert(1, "one"));
	/// assert!(!tree.insert(1, "uno"));
	/// assert_eq!(tree.search(&1), Some(&"one"));
	/// ```
	pub fn insert(&mut self, key: K, value: V) -> bool {
		let mut prev = None;
		let mut cur = self.root;

		while let Some(id) = cur {
			let node = self.node(id);
			match key.cmp(&node.key) {
				Ordering::Equal => {
					trace!(slot = id.slot(), "duplicate key ignored");
					return false;
				}
				Ordering::Less => {
					prev = Some(id);
					cur = node.left;
				}
				Ordering::Greater => match node.right {
					RightLink::Child(child) => cur = Some(child),
					RightLink::Thread(_) | RightLink::End => {
						prev = Some(id);
						cur = None;
					}
				},
			}
		}

		let id = NodeId::new(self.nodes.len());
		let mut fresh = Node::new(key, value);

		match prev {
			None => self.root = Some(id),
			Some(parent_id) => {
				let parent = &mut self.nodes[parent_id.slot()];
				if fresh.key < parent.key {
					parent.left = Some(id);
					fresh.right = RightLink::Thread(parent_id);
				} else {
					fresh.right = std::mem::replace(&mut parent.right, RightLink::Child(id));
				}
				trace!(slot = id.slot(), parent = parent_id.slot(), "node placed");
			}
		}

		self.nodes.push(fresh);
		true
	}

	/// Returns a seekable cursor that borrows the tree.
	///
	/// The cursor starts unpositioned; call
	/// [`seek_to_first`](iter::RawIter::seek_to_first) or
	/// [`seek`](iter::RawIter::seek) before reading from it.
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let tree: Tree<i32, i32> = (0..10).map(|i| (i * 10, i)).collect();
	///
	/// let mut iter = tree.raw_iter();
	/// iter.seek(&35);
	/// assert_eq!(iter.next(), Some((&40, &4)));
	/// ```
	pub fn raw_iter(&self) -> iter::RawIter<'_, K, V> {
		iter::RawIter::new(self)
	}

	/// Rebuilds `source` into `self` by re-inserting its entries in preorder.
	///
	/// Left subtrees are always visited; right sides only through `Child`
	/// links, so threads are never followed. The copy computes its own
	/// threads through [`insert`](Tree::insert).
	fn copy_from(&mut self, source: &Self)
	where
		K: Clone,
		V: Clone,
	{
		let _span = debug_span!("copy_tree", len = source.len()).entered();
		self.nodes.reserve(source.len());

		let mut work: WorkList<NodeId> = SmallVec::new();
		work.extend(source.root);

		while let Some(id) = work.pop() {
			let node = source.node(id);
			self.insert(node.key.clone(), node.value.clone());

			// Pushed right first so the left subtree is copied first.
			if let RightLink::Child(child) = node.right {
				work.push(child);
			}
			if let Some(left) = node.left {
				work.push(left);
			}
		}

		debug!(len = self.len(), "copied threaded tree");
	}
}

// ---------------------------------------------------------------------------
// Built-in Cursor
// ---------------------------------------------------------------------------

impl<K: Clone, V> Tree<K, V> {
	/// Resets the built-in cursor to the first inorder key.
	///
	/// Starting a new traversal abandons any traversal in progress. For
	/// traversals that do not need `&mut self`, use [`iter`](Tree::iter).
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let mut tree: Tree<i32, ()> = [(2, ()), (1, ())].into_iter().collect();
	///
	/// tree.begin();
	/// assert_eq!(tree.next(), Some(1));
	/// assert_eq!(tree.next(), Some(2));
	/// assert_eq!(tree.next(), None);
	/// ```
	pub fn begin(&mut self) {
		self.cursor = self.leftmost(self.root);
	}

	/// Returns the key under the built-in cursor and advances it.
	///
	/// Returns `None` once the traversal is exhausted, or if
	/// [`begin`](Tree::begin) has not been called since the last
	/// [`clear`](Tree::clear). Entries inserted mid-traversal are visited if
	/// they sort after the cursor.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<K> {
		let id = self.cursor?;
		let key = self.node(id).key.clone();
		self.cursor = self.inorder_next(id);
		Some(key)
	}
}

// ---------------------------------------------------------------------------
// Trait Implementations
// ---------------------------------------------------------------------------

impl<K: Clone + Ord, V: Clone> Clone for Tree<K, V> {
	/// Builds an independent tree holding the same entries.
	///
	/// The cursor is not carried over.
	fn clone(&self) -> Self {
		let mut tree = Tree::new();
		tree.copy_from(self);
		tree
	}

	/// Clears `self`, then rebuilds it from `source`.
	fn clone_from(&mut self, source: &Self) {
		self.clear();
		self.copy_from(source);
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K: PartialEq, V: PartialEq> PartialEq for Tree<K, V> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<K: Eq, V: Eq> Eq for Tree<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut tree = Tree::new();
		tree.extend(iter);
		tree
	}
}

impl<K: Ord, V> Extend<(K, V)> for Tree<K, V> {
	/// Inserts every pair; for duplicate keys the first value wins.
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

// ===========================================================================
// Invariant Validation
// ===========================================================================

impl<K: Ord, V> Tree<K, V> {
	/// Validates the structure of the tree.
	///
	/// # Invariants Checked
	///
	/// 1. Ownership: every node is reached exactly once through `left` and
	///    `Child` links, and the arena holds no other nodes
	/// 2. Ordering: the inorder sequence over owned links is strictly
	///    ascending
	/// 3. Threading: every `Thread` link targets the inorder successor
	/// 4. Termination: exactly one node, the last in inorder, is `End`
	pub fn check_invariants(&self) -> error::Result<()> {
		let order = self.owned_inorder()?;

		for (position, pair) in order.windows(2).enumerate() {
			if self.node(pair[0]).key >= self.node(pair[1]).key {
				return Err(error::Error::Unordered {
					position: position + 1,
				});
			}
		}

		let mut ends = 0;
		for (position, &id) in order.iter().enumerate() {
			let expected = order.get(position + 1).copied();
			match self.node(id).right {
				RightLink::Thread(target) if Some(target) != expected => {
					return Err(error::Error::BadThread {
						position,
					});
				}
				RightLink::End => ends += 1,
				_ => {}
			}
		}

		if !order.is_empty() && ends != 1 {
			return Err(error::Error::MultipleEnds {
				count: ends,
			});
		}
		if let Some(&last) = order.last() {
			if self.node(last).right != RightLink::End {
				return Err(error::Error::BadThread {
					position: order.len() - 1,
				});
			}
		}

		Ok(())
	}

	/// Panics with a diagnostic message if [`check_invariants`] fails.
	///
	/// Intended to be called after mutations in tests.
	///
	/// [`check_invariants`]: Tree::check_invariants
	pub fn assert_invariants(&self) {
		if let Err(err) = self.check_invariants() {
			panic!("threaded tree invariant violated: {err}");
		}
	}

	/// Inorder sequence of node handles, walked over owned links only with an
	/// explicit stack. Also verifies that ownership forms a tree spanning the
	/// whole arena.
	fn owned_inorder(&self) -> error::Result<Vec<NodeId>> {
		let mut seen = vec![false; self.nodes.len()];
		let mut order = Vec::with_capacity(self.nodes.len());
		let mut stack: WorkList<NodeId> = SmallVec::new();

		let mut visit = |id: NodeId, stack: &mut WorkList<NodeId>| -> error::Result<()> {
			match seen.get_mut(id.slot()) {
				Some(flag) if !*flag => {
					*flag = true;
					stack.push(id);
					Ok(())
				}
				_ => Err(error::Error::Unreachable {
					slot: id.slot(),
				}),
			}
		};

		// Push the left spine of each subtree, emit on pop, then move to the
		// popped node's right child.
		let mut cur = self.root;
		loop {
			while let Some(id) = cur {
				visit(id, &mut stack)?;
				cur = self.node(id).left;
			}
			let Some(id) = stack.pop() else {
				break;
			};
			order.push(id);
			cur = match self.node(id).right {
				RightLink::Child(child) => Some(child),
				RightLink::Thread(_) | RightLink::End => None,
			};
		}

		if order.len() != self.nodes.len() {
			return Err(error::Error::CountMismatch {
				reachable: order.len(),
				len: self.nodes.len(),
			});
		}
		Ok(order)
	}
}
