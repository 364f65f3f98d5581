use super::ResolverProcessor;
use crate::catalog::*;
use crate::config::DEFAULT_CAPACITY;
use crate::AptinfoOptions;

pub struct ResolverBuilder<'c> {
	catalog: &'c Catalog,
	field: String,
	max_matched: usize,

	seeds: Vec<EntryId>,
}

impl<'c> ResolverBuilder<'c> {
	pub fn new(catalog: &'c Catalog) -> Self {
		Self {
			catalog,
			field: "Depends".to_string(),
			max_matched: DEFAULT_CAPACITY,
			seeds: Default::default(),
		}
	}

	/// Takes the followed field and the matched set ceiling from `options`.
	pub fn options(self, options: &AptinfoOptions) -> Self {
		self.field(options.resolve_field()).max_matched(options.max_matched())
	}

	/// The relationship field to follow, `Depends` by default.
	pub fn field(mut self, field: impl Into<String>) -> Self {
		self.field = field.into();
		self
	}

	pub fn max_matched(mut self, max_matched: usize) -> Self {
		self.max_matched = max_matched;
		self
	}

	/// Entries to start from, each one fully expanded before the next is added.
	///
	/// Ids have to come from the catalog given to [`ResolverBuilder::new`], any other is ignored with a warning.
	pub fn add_seeds(mut self, seeds: impl IntoIterator<Item = EntryId>) -> Self {
		self.seeds.extend(seeds);
		self
	}

	pub fn build(self) -> ResolverProcessor<'c> {
		ResolverProcessor::new(self.catalog, self.field, self.max_matched, self.seeds)
	}
}
