//! Reading index files into memory.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::Error;

/// The text of one index file.
///
/// The whole file is kept so stanzas can be looked up again by offset without reopening it.
#[derive(Debug, Clone)]
pub struct IndexSource {
	path: PathBuf,
	text: String,
}

impl IndexSource {
	pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			text: text.into(),
		}
	}

	/// Reads an index file, gunzipping it when the name ends in `.gz`.
	pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		let unavailable = |source| Error::SourceUnavailable { path: path.to_path_buf(), source };

		let mut data = std::fs::read(path).map_err(unavailable)?;
		if path.extension().map_or(false, |e| e == "gz") {
			let mut v = Vec::<u8>::new();
			flate2::read::GzDecoder::new(data.as_slice()).read_to_end(&mut v).map_err(unavailable)?;
			data = v;
		}

		log::trace!("read {} bytes from {}", data.len(), path.display());
		let text = String::from_utf8(data).unwrap_or_else(|e| {
			log::debug!("{} is not valid UTF-8, replacing invalid sequences", path.display());
			String::from_utf8_lossy(e.as_bytes()).into_owned()
		});

		Ok(Self::from_text(path, text))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn text(&self) -> &str {
		&self.text
	}
}

/// Replaces every directory in `paths` with the index files directly inside it.
///
/// Index files are those named `*Packages` or `*Packages.gz`, visited in name order.
/// Anything that isn't a directory is passed through untouched so a missing file is
/// still reported when it fails to open.
pub fn expand_paths(paths: impl IntoIterator<Item = impl AsRef<Path>>) -> Vec<PathBuf> {
	let mut expanded = Vec::new();
	for path in paths {
		let path = path.as_ref();
		if !path.is_dir() {
			expanded.push(path.to_path_buf());
			continue;
		}

		let walker = walkdir::WalkDir::new(path)
			.min_depth(1)
			.max_depth(1)
			.sort_by_file_name();
		for e in walker {
			match e {
				Ok(e) if e.file_type().is_file() && is_index_file_name(&e.file_name().to_string_lossy()) => {
					expanded.push(e.into_path());
				},
				Ok(_) => {},
				Err(e) => log::warn!("unable to read directory {}: {}", path.display(), e),
			}
		}
	}
	expanded
}

fn is_index_file_name(name: &str) -> bool {
	name.ends_with("Packages") || name.ends_with("Packages.gz")
}
