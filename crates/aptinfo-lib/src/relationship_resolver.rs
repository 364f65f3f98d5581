//! Transitive closure of the relationships of a set of catalog entries.
//!
//! # Usage
//! 1. Create a [`ResolverBuilder`]
//! 1. Use the builder to add the seed entries, in the order they were asked for.
//! 1. [`ResolverBuilder::build()`] to get a [`ResolverProcessor`]
//! 1. [`ResolverProcessor::resolve()`] to walk the graph and get a [`ResolverFinalized`] to query.
//! 1. [`ResolverFinalized::display_order()`] to list every entry reached, most recently found first.
//!
//! # Alternatives
//! An item with alternatives, `a | b`, never brings a new entry into the closure.
//! It is only checked against what the other items already selected and reported as
//! unresolved when none of its alternatives were selected. This is kept as is for
//! compatibility even though it is surprising: `x` depending on just `a | b` resolves to
//! `x` alone with a warning.

use crate::catalog::*;

mod resolver_builder;
pub use resolver_builder::ResolverBuilder;
mod processing_resolver;
pub use processing_resolver::ResolverProcessor;
mod finalized_resolver;
pub use finalized_resolver::ResolverFinalized;

/// A relationship item the resolver found no entry for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
	/// Entry whose field contains the item.
	pub source: EntryId,
	/// The item in `%A` form, alternatives as `[a | b]`.
	pub requirement: String,
}

impl std::fmt::Display for Unresolved {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "found no match for {}", self.requirement)
	}
}
