//!
//!

use super::*;

#[derive(Debug)]
pub struct ResolverFinalized {
	matched: Vec<EntryId>,
	unresolved: Vec<Unresolved>,
	truncated: bool,
}

impl ResolverFinalized {
	pub(super) fn new(matched: Vec<EntryId>, unresolved: Vec<Unresolved>, truncated: bool) -> Self {
		Self {
			matched,
			unresolved,
			truncated,
		}
	}

	/// Every entry reached, in the order it was found, seeds included.
	pub fn discovery_order(&self) -> &[EntryId] {
		&self.matched
	}

	/// Every entry reached, most recently found first.
	pub fn display_order(&self) -> impl Iterator<Item = EntryId> + '_ {
		self.matched.iter().copied().rev()
	}

	pub fn len(&self) -> usize {
		self.matched.len()
	}

	pub fn is_empty(&self) -> bool {
		self.matched.is_empty()
	}

	/// Items that couldn't be matched, in the order they were met.
	pub fn unresolved(&self) -> &[Unresolved] {
		&self.unresolved
	}

	/// Whether the matched set ceiling stopped entries from being added.
	pub fn is_truncated(&self) -> bool {
		self.truncated
	}
}
