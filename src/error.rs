//! # Error Types for the Threaded Tree
//!
//! Lookups, inserts and traversals on a [`Tree`](crate::Tree) never fail:
//! absence is reported through `Option`, `bool` or a default sentinel. This
//! module covers the two surfaces that can go wrong:
//!
//! - writing the diagnostic dump to an I/O sink ([`Error::Io`])
//! - structural validation through
//!   [`Tree::check_invariants`](crate::Tree::check_invariants)
//!
//! ## Validation Flow
//!
//! ```text
//! check_invariants()
//!      │
//!      ▼
//! Walk owned links (left + Child) ──► Err(Unreachable / CountMismatch)
//!      │
//!      ▼
//! Walk inorder via threads ─────────► Err(Unordered / BadThread / MultipleEnds)
//!      │
//!      ▼
//! Ok(())
//! ```

use thiserror::Error;

/// Errors reported by the fallible surfaces of the tree.
#[derive(Error, Debug)]
pub enum Error {
	/// The sink passed to [`Tree::dump`](crate::Tree::dump) failed.
	#[error("failed to write tree dump: {0}")]
	Io(#[from] std::io::Error),

	/// Two keys adjacent in inorder position are not strictly ascending.
	///
	/// Either a left subtree holds a key that is not smaller than its parent,
	/// or a `Child` subtree holds one that is not larger.
	#[error("keys out of order at inorder position {position}")]
	Unordered {
		/// Zero-based inorder position of the second, offending key.
		position: usize,
	},

	/// A thread link does not point at the true inorder successor.
	#[error("thread at inorder position {position} does not reference the inorder successor")]
	BadThread {
		/// Zero-based inorder position of the node holding the bad thread.
		position: usize,
	},

	/// More than one node claims to hold the maximum key.
	#[error("found {count} thread-terminal nodes, expected exactly one")]
	MultipleEnds {
		/// Number of nodes with an `End` link.
		count: usize,
	},

	/// The owned links reach a different number of nodes than the arena holds.
	#[error("owned links reach {reachable} nodes but the tree holds {len}")]
	CountMismatch {
		/// Nodes reachable from the root through owned links.
		reachable: usize,
		/// Nodes held by the arena.
		len: usize,
	},

	/// A node is owned twice, or a link points outside the arena.
	#[error("node slot {slot} is unreachable or owned more than once")]
	Unreachable {
		/// Arena slot of the offending node.
		slot: usize,
	},
}

/// A Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
