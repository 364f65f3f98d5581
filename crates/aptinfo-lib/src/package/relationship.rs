use std::fmt;

use super::version;

/// The operator of a versioned clause.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
	/// No version constraint, any version satisfies it.
	#[default] None,
	Eq,
	Gt,
	GtEq,
	Lt,
	LtEq,
}

impl Relation {
	/// Reads an operator as written in a control file, an empty string being [`Relation::None`].
	pub fn parse(text: &str) -> Option<Self> {
		match text {
			"" => Some(Relation::None),
			"=" => Some(Relation::Eq),
			"<<" => Some(Relation::Lt),
			"<=" => Some(Relation::LtEq),
			">>" => Some(Relation::Gt),
			">=" => Some(Relation::GtEq),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Relation::None => "",
			Relation::Eq => "=",
			Relation::Gt => ">>",
			Relation::GtEq => ">=",
			Relation::Lt => "<<",
			Relation::LtEq => "<=",
		}
	}

	/// Whether two equal versions satisfy the relation.
	pub fn accepts_equal(&self) -> bool {
		matches!(self, Relation::None | Relation::Eq | Relation::LtEq | Relation::GtEq)
	}
}

impl std::str::FromStr for Relation {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Relation::parse(s).ok_or_else(|| crate::Error::Parse(format!("unknown comparison operator {}", s)))
	}
}

impl fmt::Display for Relation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One dependency alternative, `name[:arch][ (relop version)]`.
///
/// Every part borrows from the text the clause was parsed from. An empty part means it was absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clause<'a> {
	name: &'a str,
	arch: &'a str,
	relation: &'a str,
	version: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Begin,
	Name,
	Arch,
	Relation,
	Version,
	End,
}

/// Byte range of one clause part, unset until its first non blank character.
#[derive(Debug, Default, Clone, Copy)]
struct Span {
	start: Option<usize>,
	end: usize,
}

impl Span {
	fn extend(&mut self, i: usize) {
		if self.start.is_none() {
			self.start = Some(i);
		}
		self.end = i + 1;
	}

	fn slice<'a>(&self, data: &'a str) -> &'a str {
		match self.start {
			Some(start) => &data[start..self.end],
			None => "",
		}
	}
}

impl<'a> Clause<'a> {
	/// Reads the first clause of `input`.
	///
	/// Parsing stops at the first `|`, `,` or newline outside of the parenthesised version,
	/// or at the closing parenthesis. Blanks are skipped everywhere.
	pub fn parse(input: &'a str) -> Self {
		let mut state = State::Begin;
		let mut name = Span::default();
		let mut arch = Span::default();
		let mut relation = Span::default();
		let mut version = Span::default();

		for (i, c) in input.bytes().enumerate() {
			if matches!(c, b' ' | b'\t' | b'\r') {
				continue;
			}

			state = match (state, c) {
				(State::End, _) => break,
				(State::Begin | State::Name | State::Arch, b'|' | b',' | b'\n' | b'\0') => State::End,
				(State::Begin | State::Name, b':') => State::Arch,
				(State::Begin | State::Name | State::Arch, b'(') => State::Relation,
				(State::Begin | State::Name, _) => { name.extend(i); State::Name },
				(State::Arch, _) => { arch.extend(i); State::Arch },
				(State::Relation, b'=' | b'<' | b'>') => { relation.extend(i); State::Relation },
				(State::Relation | State::Version, b')') => State::End,
				(State::Relation | State::Version, _) => { version.extend(i); State::Version },
			};
		}

		Clause {
			name: name.slice(input),
			arch: arch.slice(input),
			relation: relation.slice(input),
			version: version.slice(input),
		}
	}

	pub fn name(&self) -> &'a str {
		self.name
	}

	/// Architecture qualifier, empty for any architecture.
	pub fn arch(&self) -> &'a str {
		self.arch
	}

	/// The operator exactly as written.
	pub fn relation_text(&self) -> &'a str {
		self.relation
	}

	pub fn version(&self) -> &'a str {
		self.version
	}

	/// The operator of the clause, an error when it isn't one of `=`, `<<`, `>>`, `<=`, `>=`.
	pub fn relation(&self) -> crate::Result<Relation> {
		self.relation.parse()
	}

	/// Checks a concrete package name and version against this clause.
	///
	/// A clause with an unknown operator is never satisfied.
	pub fn is_satisfied_by(&self, name: &str, version: &str) -> bool {
		if self.name != name {
			return false
		}
		match self.relation() {
			Ok(relation) => version::test(relation, version, self.version),
			Err(e) => {
				log::debug!("clause {} can't be satisfied: {}", self, e);
				false
			},
		}
	}
}

impl fmt::Display for Clause<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)?;
		if !self.arch.is_empty() {
			write!(f, ":{}", self.arch)?;
		}
		if !self.relation.is_empty() && !self.version.is_empty() {
			write!(f, " ({} {})", self.relation, self.version)?;
		}
		Ok(())
	}
}

/// One item of a relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relationship<'a> {
	/// At least one of the clauses must match to fulfill the relationship.
	AnyOf(Vec<Clause<'a>>),
	/// This single clause must be met.
	One(Clause<'a>),
}

impl<'a> Relationship<'a> {
	/// Reads a whole field value, `a, b | c (>= 1), d`.
	///
	/// Empty items are skipped.
	pub fn parse_list(text: &'a str) -> Vec<Relationship<'a>> {
		split_expression(text)
			.map(|item| {
				let mut clauses: Vec<_> = item.split('|').map(Clause::parse).collect();
				if clauses.len() == 1 {
					Relationship::One(clauses.remove(0))
				} else {
					Relationship::AnyOf(clauses)
				}
			})
			.collect()
	}

	/// Convienience function to collapse this relationship into a vector
	pub fn as_vec(&self) -> Vec<&Clause<'a>> {
		match self {
			Relationship::AnyOf(v) => v.iter().collect::<Vec<_>>(),
			Relationship::One(r) => vec![r],
		}
	}
}

impl fmt::Display for Relationship<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Relationship::One(clause) => fmt::Display::fmt(clause, f),
			Relationship::AnyOf(clauses) => {
				f.write_str("[")?;
				for (i, clause) in clauses.iter().enumerate() {
					if i > 0 {
						f.write_str(" | ")?;
					}
					fmt::Display::fmt(clause, f)?;
				}
				f.write_str("]")
			},
		}
	}
}

/// Splits a comma separated list into its non-blank items.
pub fn split_expression(text: &str) -> impl Iterator<Item = &str> {
	text.split([',', '\n']).filter(|item| !item.trim().is_empty())
}
