//! # The package catalog
//!
//! Every stanza of every index file given to a command, in file order.
//! Only the fields needed to identify an entry are copied out of the stanza,
//! anything else is looked up again from the stanza text with [`Catalog::read_field`].

use std::path::{Path, PathBuf};

use serde::*;

use crate::package::Placeholders;
use crate::AptinfoOptions;

pub mod source;
pub use source::IndexSource;

pub mod stanza;
use stanza::StanzaFields;

mod matcher;
pub use matcher::ClauseMatches;
pub use matcher::ClauseMatchesExt;

/// Position of an entry in its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(usize);

impl EntryId {
	pub fn index(self) -> usize {
		self.0
	}
}

/// One stanza of an index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
	name: String,
	version: String,
	arch: String,
	size: u64,
	installed_size: u64,
	#[serde(skip)]
	source: usize,
	#[serde(skip)]
	offset: usize,
	#[serde(skip)]
	length: usize,
}

impl CatalogEntry {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn arch(&self) -> &str {
		&self.arch
	}

	/// The `Size` field, 0 when absent.
	pub fn size(&self) -> u64 {
		self.size
	}

	/// The `Installed-Size` field, 0 when absent.
	pub fn installed_size(&self) -> u64 {
		self.installed_size
	}

	/// Byte offset of the stanza in its index file.
	pub fn offset(&self) -> usize {
		self.offset
	}
}

impl Placeholders for CatalogEntry {
	fn name(&self) -> &str { &self.name }
	fn arch(&self) -> &str { &self.arch }
	/* An entry is exactly its own version */
	fn relation(&self) -> &str { "=" }
	fn version(&self) -> &str { &self.version }
	fn size(&self) -> Option<u64> { Some(self.size) }
	fn installed_size(&self) -> Option<u64> { Some(self.installed_size) }
}

#[derive(Debug, Default)]
pub struct Catalog {
	sources: Vec<IndexSource>,
	entries: Vec<CatalogEntry>,
	unavailable: Vec<PathBuf>,
	truncated: bool,
}

impl Catalog {
	/// Reads every index file in `paths`, directories being expanded to the index files inside them.
	///
	/// Files that can't be read are skipped with a warning and listed by [`Catalog::unavailable_sources`].
	pub fn load(paths: impl IntoIterator<Item = impl AsRef<Path>>, options: &AptinfoOptions) -> Self {
		let mut catalog = Catalog::default();
		for path in source::expand_paths(paths) {
			if catalog.truncated {
				break;
			}
			match IndexSource::open(&path) {
				Ok(source) => catalog.add_source(source, options.max_entries()),
				Err(e) => {
					log::warn!("{}", e);
					catalog.unavailable.push(path);
				},
			}
		}
		catalog
	}

	/// Builds a catalog from sources already in memory.
	pub fn from_sources(sources: impl IntoIterator<Item = IndexSource>, options: &AptinfoOptions) -> Self {
		let mut catalog = Catalog::default();
		for source in sources {
			if catalog.truncated {
				break;
			}
			catalog.add_source(source, options.max_entries());
		}
		catalog
	}

	fn add_source(&mut self, source: IndexSource, max_entries: usize) {
		let index = self.sources.len();
		let before = self.entries.len();

		for stanza in stanza::stanzas(source.text()) {
			let fields = StanzaFields::read(stanza.text);
			if fields.name.is_empty() {
				log::trace!("skipping stanza without a Package field at {}:{}", source.path().display(), stanza.offset);
				continue;
			}

			if self.entries.len() >= max_entries {
				log::warn!("max number of entries reached ({})", self.entries.len());
				self.truncated = true;
				break;
			}

			self.entries.push(CatalogEntry {
				name: fields.name,
				version: fields.version,
				arch: fields.arch,
				size: fields.size,
				installed_size: fields.installed_size,
				source: index,
				offset: stanza.offset,
				length: stanza.text.len(),
			});
		}

		log::debug!("{} entries read from {}", self.entries.len() - before, source.path().display());
		self.sources.push(source);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Whether the entry ceiling was hit and later stanzas were dropped.
	pub fn is_truncated(&self) -> bool {
		self.truncated
	}

	/// Index files that couldn't be read and contributed no entries.
	pub fn unavailable_sources(&self) -> &[PathBuf] {
		&self.unavailable
	}

	pub fn get(&self, id: EntryId) -> Option<&CatalogEntry> {
		self.entries.get(id.0)
	}

	pub fn entries(&self) -> &[CatalogEntry] {
		&self.entries
	}

	/// Entries in catalog order with their ids.
	pub fn iter(&self) -> impl Iterator<Item = (EntryId, &CatalogEntry)> {
		self.entries.iter().enumerate().map(|(i, e)| (EntryId(i), e))
	}

	/// The full stanza text of an entry.
	pub fn stanza(&self, entry: &CatalogEntry) -> &str {
		let text = self.sources[entry.source].text();
		&text[entry.offset..entry.offset + entry.length]
	}

	/// Path of the index file an entry was read from.
	pub fn source_path(&self, entry: &CatalogEntry) -> &Path {
		self.sources[entry.source].path()
	}

	/// Raw value of any field of an entry's stanza, `None` when the stanza has no such field.
	pub fn read_field(&self, entry: &CatalogEntry, field: &str) -> Option<&str> {
		stanza::read_field(self.stanza(entry), field)
	}
}

impl std::ops::Index<EntryId> for Catalog {
	type Output = CatalogEntry;
	fn index(&self, id: EntryId) -> &Self::Output {
		&self.entries[id.0]
	}
}
