//! Control stanza parsing.
//!
//! A stanza is a block of `Key: value` lines ended by an empty line.
//! Continuation lines are not folded, they simply never match a key.

/// Fields of a stanza kept in the catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct StanzaFields {
	pub name: String,
	pub version: String,
	pub arch: String,
	pub size: u64,
	pub installed_size: u64,
}

impl StanzaFields {
	pub fn read(stanza: &str) -> Self {
		let mut fields = Self::default();
		for (key, value) in header_lines(stanza) {
			match key {
				"Package" => fields.name = value.to_string(),
				"Version" => fields.version = value.to_string(),
				"Architecture" => fields.arch = value.to_string(),
				"Size" => fields.size = read_number(key, value),
				"Installed-Size" => fields.installed_size = read_number(key, value),
				_ => {},
			}
		}
		fields
	}
}

fn read_number(key: &str, value: &str) -> u64 {
	value.parse().unwrap_or_else(|_| {
		log::debug!("ignoring non numeric {}: {}", key, value);
		0
	})
}

/// A stanza located inside a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stanza<'a> {
	pub offset: usize,
	pub text: &'a str,
}

/// Only an empty line ends a stanza, a line of spaces is part of it.
fn is_separator(line: &str) -> bool {
	line.trim_end_matches(['\r', '\n']).is_empty()
}

/// Iterates the stanzas of an index file.
///
/// Runs of empty lines count as a single separator, and a final stanza without a trailing
/// blank line is still returned.
pub fn stanzas(text: &str) -> Stanzas<'_> {
	Stanzas { text, offset: 0 }
}

pub struct Stanzas<'a> {
	text: &'a str,
	offset: usize,
}

impl<'a> Iterator for Stanzas<'a> {
	type Item = Stanza<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let text = self.text;
		let mut start: Option<usize> = None;
		let mut end = self.offset;

		for line in text[self.offset..].split_inclusive('\n') {
			let line_start = self.offset;
			self.offset += line.len();

			if is_separator(line) {
				if start.is_some() {
					break;
				}
				continue;
			}

			start.get_or_insert(line_start);
			end = self.offset;
		}

		start.map(|start| Stanza { offset: start, text: &text[start..end] })
	}
}

/// The `Key: value` lines of a stanza, values trimmed.
///
/// Stops at the first blank line.
pub fn header_lines(stanza: &str) -> impl Iterator<Item = (&str, &str)> {
	stanza.lines()
		.take_while(|line| !is_separator(line))
		.filter_map(|line| line.split_once(':'))
		.map(|(key, value)| (key, value.trim()))
}

/// Finds the value of `field` in `stanza`.
///
/// The key has to match exactly, including case, and be directly followed by `:`.
pub fn read_field<'a>(stanza: &'a str, field: &str) -> Option<&'a str> {
	header_lines(stanza).find(|(key, _)| *key == field).map(|(_, value)| value)
}
