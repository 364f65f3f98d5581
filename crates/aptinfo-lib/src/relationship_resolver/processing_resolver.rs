//!

use super::*;
use crate::package::Relationship;

/// Walks the relationship field of every matched entry until nothing new is found.
///
/// The matched list is also the work queue: entries are expanded in the order they were
/// matched while new ones are appended behind the cursor. An entry is matched at most once
/// which is what makes the walk terminate on cyclic graphs.
#[derive(Debug)]
pub struct ResolverProcessor<'c> {
	catalog: &'c Catalog,
	field: String,
	max_matched: usize,

	/// Seeds not yet added.
	seeds: Vec<EntryId>,

	matched: Vec<EntryId>,
	/// Indexed by [`EntryId::index`].
	is_matched: Vec<bool>,
	/// Next entry of `matched` to expand.
	cursor: usize,

	unresolved: Vec<Unresolved>,
	truncated: bool,
}

impl<'c> ResolverProcessor<'c> {
	pub(super) fn new(catalog: &'c Catalog, field: String, max_matched: usize, seeds: Vec<EntryId>) -> Self {
		ResolverProcessor {
			catalog,
			field,
			max_matched,
			seeds,
			matched: Default::default(),
			is_matched: vec![false; catalog.len()],
			cursor: 0,
			unresolved: Default::default(),
			truncated: false,
		}
	}

	/// Adds a seed and expands everything reachable from it.
	///
	/// Alternatives reached from this seed are checked against everything matched so far.
	pub fn add_seed(&mut self, seed: EntryId) {
		self.add_matched(seed);
		self.process();
	}

	/// Whether `id` is already part of the closure.
	pub fn is_matched(&self, id: EntryId) -> bool {
		self.is_matched.get(id.index()).copied().unwrap_or(false)
	}

	/// Expands every seed in order and finishes the resolve.
	pub fn resolve(mut self) -> ResolverFinalized {
		for seed in std::mem::take(&mut self.seeds) {
			self.add_seed(seed);
		}
		ResolverFinalized::new(self.matched, self.unresolved, self.truncated)
	}

	fn add_matched(&mut self, id: EntryId) {
		if self.catalog.get(id).is_none() {
			log::warn!("entry {} is not part of the catalog", id.index());
			return
		}
		if self.is_matched(id) {
			return
		}
		if self.matched.len() >= self.max_matched {
			if !self.truncated {
				log::warn!("max number of matched entries reached ({})", self.matched.len());
				self.truncated = true;
			}
			return
		}
		log::debug!("matched {} {}", self.catalog[id].name(), self.catalog[id].version());
		self.matched.push(id);
		self.is_matched[id.index()] = true;
	}

	fn process(&mut self) {
		while let Some(&id) = self.matched.get(self.cursor) {
			self.cursor += 1;
			self.expand(id);
		}
	}

	fn expand(&mut self, id: EntryId) {
		let catalog = self.catalog;
		let Some(value) = catalog.read_field(&catalog[id], &self.field) else { return };

		for relationship in Relationship::parse_list(value) {
			match &relationship {
				Relationship::One(clause) => match catalog.find_any(clause) {
					Some(child) => self.add_matched(child),
					None => self.report_unresolved(id, &relationship),
				},
				Relationship::AnyOf(clauses) => {
					/* Alternatives only confirm an existing selection, they never select anything themselves */
					let satisfied = clauses.iter().any(|clause| {
						catalog.find_any(clause).map_or(false, |child| self.is_matched(child))
					});
					if !satisfied {
						self.report_unresolved(id, &relationship);
					}
				},
			}
		}
	}

	fn report_unresolved(&mut self, source: EntryId, relationship: &Relationship<'_>) {
		let unresolved = Unresolved { source, requirement: relationship.to_string() };
		log::warn!("{}", unresolved);
		self.unresolved.push(unresolved);
	}
}
