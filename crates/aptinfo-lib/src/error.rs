//! Library error type.
//!
//! Only conditions that halt a command are represented here. Unresolved dependencies,
//! capacity ceilings and unreadable sources during loading are reported through `log`
//! and recorded on the returned values instead.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("No entry with the name '{0}' was found")]
	NotFound(String),
	#[error("unable to read index file {path}: {source}")]
	SourceUnavailable {
		path: std::path::PathBuf,
		source: std::io::Error,
	},
}
