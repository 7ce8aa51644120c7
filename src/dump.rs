//! Diagnostic text dump of a [`Tree`].
//!
//! The dump lists every entry in inorder, one per line, framed by a fixed
//! banner:
//!
//! ```text
//! **************************************************
//! ********************* BSTT ***********************
//! ** size: 3
//! (1,a,2)
//! (2,b)
//! (3,c)
//! **************************************************
//! ```
//!
//! An entry whose right link is a thread also shows the successor key it
//! threads to. Entries with a real right child, and the last entry, show only
//! key and value.

use crate::node::RightLink;
use crate::{error, Tree};
use std::fmt;
use std::io;

const RULE: &str = "**************************************************";
const BANNER: &str = "********************* BSTT ***********************";

/// [`Display`](fmt::Display) adapter rendering the dump of a tree.
///
/// Created by [`Tree::display`].
pub struct Dump<'t, K, V> {
	tree: &'t Tree<K, V>,
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Dump<'_, K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tree = self.tree;
		writeln!(f, "{RULE}")?;
		writeln!(f, "{BANNER}")?;
		writeln!(f, "** size: {}", tree.len())?;

		let mut cur = tree.leftmost(tree.root);
		while let Some(id) = cur {
			let node = tree.node(id);
			match node.right {
				RightLink::Thread(successor) => {
					let successor = &tree.node(successor).key;
					writeln!(f, "({},{},{})", node.key, node.value, successor)?;
				}
				RightLink::Child(_) | RightLink::End => {
					writeln!(f, "({},{})", node.key, node.value)?;
				}
			}
			cur = tree.inorder_next(id);
		}

		writeln!(f, "{RULE}")
	}
}

impl<K, V> Tree<K, V> {
	/// Returns an adapter that renders the diagnostic dump through
	/// [`Display`](fmt::Display).
	///
	/// # Example
	///
	/// ```
	/// use threadtree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.insert(7, "g");
	///
	/// let text = tree.display().to_string();
	/// assert!(text.contains("** size: 1\n(7,g)\n"));
	/// ```
	pub fn display(&self) -> Dump<'_, K, V> {
		Dump {
			tree: self,
		}
	}

	/// Writes the diagnostic dump to `out`.
	pub fn dump<W: io::Write>(&self, mut out: W) -> error::Result<()>
	where
		K: fmt::Display,
		V: fmt::Display,
	{
		write!(out, "{}", self.display())?;
		out.flush()?;
		Ok(())
	}
}
