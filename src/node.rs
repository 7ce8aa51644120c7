//! Arena node types.
//!
//! Every node lives in the tree's arena (`Vec<Node<K, V>>`) and is addressed
//! by a [`NodeId`]. Ownership is structural: a node is owned by exactly one
//! `left` or [`RightLink::Child`] link (or is the root). A
//! [`RightLink::Thread`] never owns its target.

use std::fmt;

/// Handle to a node slot in the tree's arena.
///
/// Handles are only ever issued by the tree that owns the arena, and stay
/// valid until that tree is cleared.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
	/// Wraps an arena index.
	///
	/// # Panics
	///
	/// Panics if the arena has grown past `u32::MAX` slots.
	#[inline]
	pub(crate) fn new(slot: usize) -> Self {
		match u32::try_from(slot) {
			Ok(slot) => NodeId(slot),
			Err(_) => panic!("threaded tree arena exceeded {} nodes", u32::MAX),
		}
	}

	/// Returns the arena index.
	#[inline]
	pub(crate) fn slot(self) -> usize {
		self.0 as usize
	}
}

/// The right-hand link of a node.
///
/// This replaces the classic "right pointer plus `is_threaded` flag" pair:
/// the variant says both where the link goes and whether it owns the target.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum RightLink {
	/// Owned right subtree.
	Child(NodeId),
	/// Non-owning link to the inorder successor.
	Thread(NodeId),
	/// Threaded terminal: this node holds the largest key.
	End,
}

impl RightLink {
	/// `true` for [`Thread`](RightLink::Thread) and [`End`](RightLink::End).
	#[inline]
	pub(crate) fn is_threaded(self) -> bool {
		!matches!(self, RightLink::Child(_))
	}

	/// The linked node, whatever the link's kind.
	#[inline]
	pub(crate) fn target(self) -> Option<NodeId> {
		match self {
			RightLink::Child(id) | RightLink::Thread(id) => Some(id),
			RightLink::End => None,
		}
	}
}

/// A single key/value entry of the tree.
pub(crate) struct Node<K, V> {
	pub(crate) key: K,
	pub(crate) value: V,
	pub(crate) left: Option<NodeId>,
	pub(crate) right: RightLink,
}

impl<K, V> Node<K, V> {
	/// Creates a detached node: no left child, and a terminal right link.
	#[inline]
	pub(crate) fn new(key: K, value: V) -> Self {
		Node {
			key,
			value,
			left: None,
			right: RightLink::End,
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("key", &self.key)
			.field("value", &self.value)
			.field("left", &self.left)
			.field("right", &self.right)
			.finish()
	}
}
