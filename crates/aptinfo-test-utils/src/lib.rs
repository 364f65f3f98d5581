//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::io::Write;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

/// A temporary directory of index files, removed when dropped.
pub struct IndexDir {
	dir: tempfile::TempDir,
}

impl IndexDir {
	pub fn new() -> Result<Self> {
		Ok(Self { dir: tempfile::tempdir()? })
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	/// Writes `text` as a plain index file named `name`.
	pub fn write_index(&self, name: &str, text: &str) -> Result<PathBuf> {
		let path = self.dir.path().join(name);
		std::fs::write(&path, text)?;
		Ok(path)
	}

	/// Writes `text` gzipped to `name`, which should end in `.gz`.
	pub fn write_gz_index(&self, name: &str, text: &str) -> Result<PathBuf> {
		let path = self.dir.path().join(name);
		let f = std::fs::File::create(&path)?;
		let mut gz = flate2::write::GzEncoder::new(f, flate2::Compression::default());
		gz.write_all(text.as_bytes())?;
		gz.finish()?;
		Ok(path)
	}
}

/// Gets a catalog for use in testing
/// # Parameters
/// - `texts` - Contents of the index files, each written to its own file in order.
/// - `options` - When present used to load the catalog, if not the defaults are used.
///
/// The returned [`IndexDir`] has to outlive any use of the files.
pub fn load_catalog(texts: &[&str], options: Option<&aptinfo::AptinfoOptions>) -> Result<(IndexDir, aptinfo::Catalog)> {
	let dir = IndexDir::new()?;
	let mut paths = Vec::new();
	for (i, text) in texts.iter().enumerate() {
		paths.push(dir.write_index(&format!("{:02}_Packages", i), text)?);
	}
	let default = aptinfo::AptinfoOptions::default();
	let catalog = aptinfo::Catalog::load(&paths, options.unwrap_or(&default));
	Ok((dir, catalog))
}
