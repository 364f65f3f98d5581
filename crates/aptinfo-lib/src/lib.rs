pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::AptinfoOptions;

pub mod package;
pub use package::Clause;
pub use package::Relation;

pub mod catalog;
pub use catalog::Catalog;
pub use catalog::CatalogEntry;
pub use catalog::EntryId;

pub mod relationship_resolver;
