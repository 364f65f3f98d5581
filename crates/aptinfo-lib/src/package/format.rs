//! Output templates.
//!
//! | Placeholder | Expands to |
//! |---|---|
//! | `%n` | name |
//! | `%a` | architecture |
//! | `%r` | relation operator |
//! | `%v` | version |
//! | `%s` | size, empty when unknown |
//! | `%i` | installed size, empty when unknown |
//! | `%A` | `name[:arch][ (relop version)]` |
//! | `%%` | a literal `%` |
//!
//! Any other `%` sequence is copied as is.

use super::Clause;

/// Something that can be rendered through a [`Template`].
pub trait Placeholders {
	fn name(&self) -> &str;
	fn arch(&self) -> &str;
	fn relation(&self) -> &str;
	fn version(&self) -> &str;
	fn size(&self) -> Option<u64> { None }
	fn installed_size(&self) -> Option<u64> { None }

	/// The `%A` form.
	fn full(&self) -> String {
		let mut s = self.name().to_string();
		if !self.arch().is_empty() {
			s.push(':');
			s.push_str(self.arch());
		}
		if !self.relation().is_empty() && !self.version().is_empty() {
			s.push_str(&format!(" ({} {})", self.relation(), self.version()));
		}
		s
	}
}

impl Placeholders for Clause<'_> {
	fn name(&self) -> &str { Clause::name(self) }
	fn arch(&self) -> &str { Clause::arch(self) }
	fn relation(&self) -> &str { self.relation_text() }
	fn version(&self) -> &str { Clause::version(self) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Name,
	Arch,
	Relation,
	Version,
	Size,
	InstalledSize,
	Full,
}

/// A parsed output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	segments: Vec<Segment>,
}

impl Template {
	pub fn parse(fmt: &str) -> Self {
		let mut segments = Vec::new();
		let mut literal = String::new();
		let mut chars = fmt.chars();

		while let Some(c) = chars.next() {
			if c != '%' {
				literal.push(c);
				continue;
			}

			let placeholder = match chars.next() {
				Some('n') => Segment::Name,
				Some('a') => Segment::Arch,
				Some('r') => Segment::Relation,
				Some('v') => Segment::Version,
				Some('s') => Segment::Size,
				Some('i') => Segment::InstalledSize,
				Some('A') => Segment::Full,
				Some('%') => { literal.push('%'); continue },
				Some(other) => { literal.push('%'); literal.push(other); continue },
				None => { literal.push('%'); continue },
			};

			if !literal.is_empty() {
				segments.push(Segment::Literal(std::mem::take(&mut literal)));
			}
			segments.push(placeholder);
		}

		if !literal.is_empty() {
			segments.push(Segment::Literal(literal));
		}

		Template { segments }
	}

	pub fn render<T: Placeholders + ?Sized>(&self, item: &T) -> String {
		let mut out = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(s) => out.push_str(s),
				Segment::Name => out.push_str(item.name()),
				Segment::Arch => out.push_str(item.arch()),
				Segment::Relation => out.push_str(item.relation()),
				Segment::Version => out.push_str(item.version()),
				Segment::Size => if let Some(size) = item.size() { out.push_str(&size.to_string()) },
				Segment::InstalledSize => if let Some(size) = item.installed_size() { out.push_str(&size.to_string()) },
				Segment::Full => out.push_str(&item.full()),
			}
		}
		out
	}
}
