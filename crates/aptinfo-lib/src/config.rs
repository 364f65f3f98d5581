use serde::*;

/// Ceiling used for both the catalog and the resolver's matched set when not configured.
pub const DEFAULT_CAPACITY: usize = 0x20000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AptinfoOptions {
	max_entries: usize,
	max_matched: usize,
	resolve_field: String,
	entry_format: String,
	clause_format: String,
}

impl Default for AptinfoOptions {
	fn default() -> Self {
		Self {
			max_entries: DEFAULT_CAPACITY,
			max_matched: DEFAULT_CAPACITY,
			resolve_field: "Depends".to_string(),
			entry_format: "%A\n".to_string(),
			clause_format: "%A\n".to_string(),
		}
	}
}

impl AptinfoOptions {
	/// Where the config file is looked for when no explicit path is given.
	pub fn default_path() -> Option<std::path::PathBuf> {
		let base = if let Ok(e) = std::env::var("XDG_CONFIG_HOME") {
			std::path::PathBuf::from(e)
		} else {
			std::path::PathBuf::from(std::env::var("HOME").ok()?).join(".config")
		};
		Some(base.join("aptinfo").join("config.json"))
	}

	/// Reads options from the default config location.
	///
	/// A missing file is not an error, it just yields the defaults.
	pub fn load_from_disk() -> crate::Result<Self> {
		match Self::default_path() {
			Some(path) if path.exists() => Self::load_from_path(path),
			_ => Ok(Self::default()),
		}
	}

	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let data = std::fs::read(path.as_ref())?;
		Ok(serde_json::from_slice(&data)?)
	}

	/// Maximum number of stanzas accepted into a catalog.
	pub fn max_entries(&self) -> usize {
		self.max_entries
	}
	pub fn set_max_entries(&mut self, max_entries: usize) {
		self.max_entries = max_entries;
	}

	/// Maximum number of entries a single resolve may collect.
	pub fn max_matched(&self) -> usize {
		self.max_matched
	}
	pub fn set_max_matched(&mut self, max_matched: usize) {
		self.max_matched = max_matched;
	}

	/// The relationship field followed by the resolver.
	pub fn resolve_field(&self) -> &str {
		&self.resolve_field
	}
	pub fn set_resolve_field(&mut self, resolve_field: impl Into<String>) {
		self.resolve_field = resolve_field.into();
	}

	pub fn entry_format(&self) -> &str {
		&self.entry_format
	}
	pub fn set_entry_format(&mut self, entry_format: impl Into<String>) {
		self.entry_format = entry_format.into();
	}

	pub fn clause_format(&self) -> &str {
		&self.clause_format
	}
	pub fn set_clause_format(&mut self, clause_format: impl Into<String>) {
		self.clause_format = clause_format.into();
	}
}
