//! Types for reading dependency expressions and comparing package versions.

mod relationship;
pub use relationship::Clause;
pub use relationship::Relation;
pub use relationship::Relationship;
pub use relationship::split_expression;

pub mod version;
pub use version::Version;
pub use version::CompareOutcome;

pub mod format;
pub use format::Template;
pub use format::Placeholders;
