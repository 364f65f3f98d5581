//! Finding the entries a clause refers to.
//!
//! Every lookup returns the first entry in catalog order, there is no search for the best version.

use super::*;
use crate::package::{split_expression, Clause, Relationship};

pub struct ClauseMatches<'a, 'c, I>
where
	I: Iterator<Item = (EntryId, &'a CatalogEntry)>,
{
	clause: Clause<'c>,
	underlying: I,
}

impl<'a, 'c, I> Iterator for ClauseMatches<'a, 'c, I>
where
	I: Iterator<Item = (EntryId, &'a CatalogEntry)>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		for (id, entry) in self.underlying.by_ref() {
			if self.clause.is_satisfied_by(&entry.name, &entry.version) {
				return Some((id, entry))
			}
		}
		None
	}
}

pub trait ClauseMatchesExt<'a>: Iterator<Item = (EntryId, &'a CatalogEntry)>
{
	/// Filters the iterator to entries whose own name and version satisfy `clause`.
	fn clause_matches<'c>(self, clause: Clause<'c>) -> ClauseMatches<'a, 'c, Self>
	where
		Self: Sized,
	{
		ClauseMatches { underlying: self, clause }
	}
}

impl<'a, I: Iterator<Item = (EntryId, &'a CatalogEntry)>> ClauseMatchesExt<'a> for I {}

impl Catalog {
	/// First entry named by the clause whose version satisfies it.
	pub fn find_direct(&self, clause: &Clause<'_>) -> Option<EntryId> {
		self.iter().clause_matches(*clause).next().map(|(id, _)| id)
	}

	/// First entry with a `Provides` item satisfying the clause.
	///
	/// The provided name and version are tested, not the entry's own.
	pub fn find_via_provides(&self, clause: &Clause<'_>) -> Option<EntryId> {
		self.iter()
			.find(|(_, entry)| {
				self.read_field(entry, "Provides").map_or(false, |provides| {
					Relationship::parse_list(provides).iter()
						.flat_map(|r| r.as_vec())
						.any(|provided| clause.is_satisfied_by(provided.name(), provided.version()))
				})
			})
			.map(|(id, _)| id)
	}

	/// [`Catalog::find_direct`], falling back to [`Catalog::find_via_provides`].
	pub fn find_any(&self, clause: &Clause<'_>) -> Option<EntryId> {
		let found = self.find_direct(clause).or_else(|| self.find_via_provides(clause));
		log::trace!("{} matched {:?}", clause, found.map(|id| self[id].name()));
		found
	}

	/// The entry named by a single clause given by the user, `Provides` not being considered.
	pub fn find_package(&self, item: &str) -> crate::Result<EntryId> {
		let clause = Clause::parse(item);
		self.find_direct(&clause).ok_or_else(|| crate::Error::NotFound(clause.to_string()))
	}

	/// Looks up every comma separated item of `expression`, failing on the first without a match.
	pub fn find_expression(&self, expression: &str) -> crate::Result<Vec<EntryId>> {
		split_expression(expression)
			.map(|item| self.find_package(item))
			.collect()
	}

	/// Entries with a `field` item that `target` satisfies, each listed once.
	///
	/// Every alternative of an item is considered.
	pub fn reverse_dependencies(&self, target: EntryId, field: &str) -> Vec<EntryId> {
		let target = &self[target];
		self.iter()
			.filter(|(_, entry)| {
				self.read_field(entry, field).map_or(false, |value| {
					Relationship::parse_list(value).iter()
						.flat_map(|r| r.as_vec())
						.any(|dependency| dependency.is_satisfied_by(&target.name, &target.version))
				})
			})
			.map(|(id, _)| id)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const INDEX: &str = "\
Package: foo
Version: 1.0

Package: foo
Version: 2.0
Depends: bar (>= 1), libx

Package: bar
Version: 1:0.5
Provides: libx (= 2.0), liby

Package: baz
Version: 3
Depends: foo (<< 2) | qux, zed
";

	fn catalog() -> Catalog {
		Catalog::from_sources([IndexSource::from_text("Packages", INDEX)], &AptinfoOptions::default())
	}

	#[test]
	fn direct_first_match_wins() {
		let c = catalog();
		assert_eq!(c.find_direct(&Clause::parse("foo")), Some(EntryId(0)));
		assert_eq!(c.find_direct(&Clause::parse("foo (>> 1.0)")), Some(EntryId(1)));
		assert_eq!(c.find_direct(&Clause::parse("foo (>> 2.0)")), None);
	}

	#[test]
	fn direct_ignores_provides() {
		assert_eq!(catalog().find_direct(&Clause::parse("libx")), None);
	}

	#[test]
	fn provides_tests_provided_version() {
		let c = catalog();
		assert_eq!(c.find_via_provides(&Clause::parse("libx (>= 1.0)")), Some(EntryId(2)));
		assert_eq!(c.find_via_provides(&Clause::parse("libx (>= 3.0)")), None);
	}

	#[test]
	fn unversioned_provides_only_satisfies_unversioned_clauses() {
		let c = catalog();
		assert_eq!(c.find_via_provides(&Clause::parse("liby")), Some(EntryId(2)));
		assert_eq!(c.find_via_provides(&Clause::parse("liby (>= 1)")), None);
	}

	#[test]
	fn any_prefers_direct() {
		let c = catalog();
		assert_eq!(c.find_any(&Clause::parse("bar")), Some(EntryId(2)));
		assert_eq!(c.find_any(&Clause::parse("libx")), Some(EntryId(2)));
		assert_eq!(c.find_any(&Clause::parse("nothing")), None);
	}

	#[test]
	fn reverse_dependencies_check_versions_and_alternatives() {
		let c = catalog();
		assert_eq!(c.reverse_dependencies(EntryId(0), "Depends"), vec![EntryId(3)]);
		assert_eq!(c.reverse_dependencies(EntryId(1), "Depends"), vec![]);
		assert_eq!(c.reverse_dependencies(EntryId(2), "Depends"), vec![EntryId(1)]);
	}

	#[test]
	fn expression_lists_every_item() {
		let c = catalog();
		assert_eq!(c.find_expression("baz, foo (>= 2.0)").unwrap(), vec![EntryId(3), EntryId(1)]);
		assert_eq!(c.find_package(" bar ").unwrap(), EntryId(2));
	}

	#[test]
	fn expression_fails_on_missing_item() {
		let c = catalog();
		match c.find_expression("foo, libx, zed") {
			Err(crate::Error::NotFound(name)) => assert_eq!(name, "libx"),
			r => panic!("expected a lookup failure, got {:?}", r),
		}
		assert!(matches!(c.find_package("foo (>> 2.0)"), Err(crate::Error::NotFound(_))));
	}
}
