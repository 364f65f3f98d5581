//! dpkg ordering of version strings.
//!
//! # Format
//! Versions follow `[epoch:]upstream-version[-debian-revision]`.
//! - `epoch` is numeric and outranks everything after it.
//! - `upstream-version` is everything up to the last `-`.
//! - `debian-revision` is everything after the last `-`, empty when there is none.
//!
//! The upstream version and the revision are compared by alternating between runs of
//! non-digit characters, which are compared with [`lexical_weight`], and runs of digits,
//! which are compared as integers of any length.

use std::cmp::Ordering;

use super::Relation;

/// Punctuation allowed in the upstream version, in collation order.
const LEXICAL_UPSTREAM: &str = "~.+-:";
/// Punctuation allowed in the debian revision, in collation order.
const LEXICAL_REVISION: &str = "~.+";

/// The state of a relational test after comparing one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
	/// The segment was equal, later segments decide.
	Continue,
	/// The relation holds.
	Valid,
	/// The relation does not hold.
	Invalid,
}

impl CompareOutcome {
	/// Interprets one segment comparison for `relation`.
	pub fn check(relation: Relation, ord: Ordering) -> Self {
		match (relation, ord) {
			(_, Ordering::Equal) => CompareOutcome::Continue,
			(Relation::None, _) => CompareOutcome::Valid,
			(Relation::Eq, _) => CompareOutcome::Invalid,
			(Relation::Lt | Relation::LtEq, Ordering::Less) => CompareOutcome::Valid,
			(Relation::Lt | Relation::LtEq, Ordering::Greater) => CompareOutcome::Invalid,
			(Relation::Gt | Relation::GtEq, Ordering::Greater) => CompareOutcome::Valid,
			(Relation::Gt | Relation::GtEq, Ordering::Less) => CompareOutcome::Invalid,
		}
	}

	/// Runs `next` only when this outcome is still undecided.
	fn or_else(self, next: impl FnOnce() -> Self) -> Self {
		match self {
			CompareOutcome::Continue => next(),
			decided => decided,
		}
	}
}

/// A version string split into its three components.
///
/// Borrows from the text it was parsed from, nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct Version<'a> {
	epoch: &'a str,
	upstream: &'a str,
	revision: &'a str,
}

impl<'a> Version<'a> {
	pub fn parse(text: &'a str) -> Self {
		let text = text.trim();
		/* Only an all digit prefix counts as an epoch, otherwise the colon is part of the upstream version */
		let (epoch, rest) = match text.split_once(':') {
			Some((epoch, rest)) if !epoch.is_empty() && epoch.bytes().all(|b| b.is_ascii_digit()) => (epoch, rest),
			_ => ("", text),
		};
		let (upstream, revision) = rest.rsplit_once('-').unwrap_or((rest, ""));
		Version { epoch, upstream, revision }
	}

	pub fn epoch(&self) -> &'a str {
		self.epoch
	}

	pub fn upstream(&self) -> &'a str {
		self.upstream
	}

	pub fn revision(&self) -> &'a str {
		self.revision
	}

	/// Tests `self <relation> other`, stopping at the first segment that decides it.
	pub fn satisfies(&self, relation: Relation, other: &Version<'_>) -> bool {
		if relation == Relation::None {
			return true
		}

		let outcome = CompareOutcome::check(relation, compare_numerical(self.epoch, other.epoch))
			.or_else(|| CompareOutcome::check(relation, compare_component(self.upstream, other.upstream, LEXICAL_UPSTREAM)))
			.or_else(|| CompareOutcome::check(relation, compare_component(self.revision, other.revision, LEXICAL_REVISION)));

		match outcome {
			CompareOutcome::Valid => true,
			CompareOutcome::Invalid => false,
			CompareOutcome::Continue => relation.accepts_equal(),
		}
	}
}

impl PartialEq for Version<'_> {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Version<'_> {}

impl Ord for Version<'_> {
	fn cmp(&self, other: &Self) -> Ordering {
		compare_numerical(self.epoch, other.epoch)
			.then_with(|| compare_component(self.upstream, other.upstream, LEXICAL_UPSTREAM))
			.then_with(|| compare_component(self.revision, other.revision, LEXICAL_REVISION))
	}
}

impl PartialOrd for Version<'_> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for Version<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if !self.epoch.is_empty() {
			write!(f, "{}:", self.epoch)?;
		}
		f.write_str(self.upstream)?;
		if !self.revision.is_empty() {
			write!(f, "-{}", self.revision)?;
		}
		Ok(())
	}
}

/// Orders two version strings.
pub fn compare(v1: &str, v2: &str) -> Ordering {
	Version::parse(v1).cmp(&Version::parse(v2))
}

/// Tests `v1 <relation> v2`.
pub fn test(relation: Relation, v1: &str, v2: &str) -> bool {
	Version::parse(v1).satisfies(relation, &Version::parse(v2))
}

/// Compares one component by alternating lexical and digit runs.
fn compare_component(lhs: &str, rhs: &str, letters: &str) -> Ordering {
	let mut lhs = lhs;
	let mut rhs = rhs;

	loop {
		let (lex_lhs, rest_lhs) = split_run(lhs, |c| !c.is_ascii_digit());
		let (lex_rhs, rest_rhs) = split_run(rhs, |c| !c.is_ascii_digit());

		match compare_lexical(lex_lhs, lex_rhs, letters) {
			Ordering::Equal => {},
			ord => return ord,
		}

		let (num_lhs, rest_lhs) = split_run(rest_lhs, |c| c.is_ascii_digit());
		let (num_rhs, rest_rhs) = split_run(rest_rhs, |c| c.is_ascii_digit());

		match compare_numerical(num_lhs, num_rhs) {
			Ordering::Equal => {},
			ord => return ord,
		}

		if lex_lhs.is_empty() && lex_rhs.is_empty() && num_lhs.is_empty() && num_rhs.is_empty() {
			return Ordering::Equal
		}

		lhs = rest_lhs;
		rhs = rest_rhs;
	}
}

/// Splits off the longest prefix made of characters matching `pred`.
fn split_run(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
	let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
	s.split_at(end)
}

/// Compares two non-digit runs position by position.
///
/// The shorter run is padded with the end-of-run weight.
fn compare_lexical(lhs: &str, rhs: &str, letters: &str) -> Ordering {
	let mut lhs = lhs.chars();
	let mut rhs = rhs.chars();
	loop {
		match (lhs.next(), rhs.next()) {
			(None, None) => return Ordering::Equal,
			(l, r) => match lexical_weight(l, letters).cmp(&lexical_weight(r, letters)) {
				Ordering::Equal => {},
				ord => return ord,
			},
		}
	}
}

/// Collation weight of one character of a lexical run, `None` being the end of the run.
///
/// `~` < end of run < `A`-`Z` < `a`-`z` < `letters` in listed order < anything else.
fn lexical_weight(c: Option<char>, letters: &str) -> u32 {
	const UPPER: u32 = 2;
	const LOWER: u32 = UPPER + 26;
	const PUNCTUATION: u32 = LOWER + 26;

	match c {
		Some('~') => 0,
		None => 1,
		Some(c @ 'A'..='Z') => UPPER + (c as u32 - 'A' as u32),
		Some(c @ 'a'..='z') => LOWER + (c as u32 - 'a' as u32),
		Some(c) => match letters.chars().position(|l| l == c) {
			Some(i) => PUNCTUATION + i as u32,
			/* Not valid in a version, sort them after everything else so comparison still terminates */
			None => PUNCTUATION + letters.len() as u32 + c as u32,
		},
	}
}

/// Compares two digit runs as integers without bounding their magnitude.
///
/// An empty run counts as zero.
fn compare_numerical(lhs: &str, rhs: &str) -> Ordering {
	let lhs = lhs.trim_start_matches('0');
	let rhs = rhs.trim_start_matches('0');
	lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cmp::Ordering::*;

	#[test] fn epoch_dominates_upstream() { assert_eq!(compare("1:1.0", "1.0"), Greater) }
	#[test] fn epoch_dominates_larger_upstream() { assert_eq!(compare("1:0.1", "9.9"), Greater) }
	#[test] fn epoch_decides_every_relation() {
		assert!(test(Relation::Gt, "2:0.1", "1:5.0"));
		assert!(!test(Relation::Lt, "2:0.1", "1:5.0"));
		assert!(!test(Relation::Eq, "2:0.1", "1:5.0"));
	}
	#[test] fn zero_epoch_is_absent_epoch() { assert_eq!(compare("0:1.0", "1.0"), Equal) }
	#[test] fn tilde_sorts_before_release() { assert_eq!(compare("1.0~rc1", "1.0"), Less) }
	#[test] fn tilde_sorts_before_tilde_suffix() { assert_eq!(compare("1.0~~", "1.0~"), Less) }
	#[test] fn letter_suffix_sorts_after_release() { assert_eq!(compare("1.0", "1.0a"), Less) }
	#[test] fn upper_case_sorts_before_lower_case() { assert_eq!(compare("1.0A", "1.0a"), Less) }
	#[test] fn letters_sort_before_punctuation() { assert_eq!(compare("1.0z", "1.0+"), Less) }
	#[test] fn punctuation_uses_listed_order() {
		assert_eq!(compare("1.", "1+"), Less);
		assert_eq!(compare("1+", "1-x-1"), Less);
	}
	#[test] fn digits_are_not_compared_lexically() { assert_eq!(compare("1.2.4", "1.2.10"), Less) }
	#[test] fn leading_zeros_are_insignificant() { assert_eq!(compare("1.002", "1.2"), Equal) }
	#[test]
	fn digit_runs_are_unbounded() {
		let nines = format!("1.{}", "9".repeat(40));
		let power = format!("1.1{}", "0".repeat(40));
		assert_eq!(compare(&nines, &power), Less);
	}
	#[test] fn short_version_is_lt() { assert_eq!(compare("1.2", "1.2.3"), Less) }
	#[test] fn revision_breaks_ties() { assert_eq!(compare("1.0-2", "1.0-10"), Less) }
	#[test] fn upstream_outranks_revision() { assert_eq!(compare("1.1-1", "1.0-9"), Greater) }
	#[test] fn upstream_splits_at_last_hyphen() {
		let v = Version::parse("2:1.0-beta-3ubuntu1");
		assert_eq!(v.epoch(), "2");
		assert_eq!(v.upstream(), "1.0-beta");
		assert_eq!(v.revision(), "3ubuntu1");
	}
	#[test] fn non_numeric_prefix_is_not_an_epoch() {
		let v = Version::parse("a:1.0");
		assert_eq!(v.epoch(), "");
		assert_eq!(v.upstream(), "a:1.0");
	}

	#[test]
	fn absent_revision_equals_zero_revision() {
		/* Empty revision reads as an empty lexical run and an empty digit run, which counts as 0 */
		assert_eq!(compare("2.5", "2.5-0"), Equal);
		assert!(test(Relation::Eq, "2.5", "2.5-0"));
		assert!(test(Relation::LtEq, "2.5", "2.5-0"));
		assert!(!test(Relation::Lt, "2.5", "2.5-0"));
	}

	#[test]
	fn absent_revision_is_lt_nonzero_revision() {
		assert_eq!(compare("2.5", "2.5-1"), Less);
	}

	#[test]
	fn relations_on_equal_versions() {
		assert!(test(Relation::Eq, "1.0-1", "1.0-1"));
		assert!(test(Relation::LtEq, "1.0-1", "1.0-1"));
		assert!(test(Relation::GtEq, "1.0-1", "1.0-1"));
		assert!(!test(Relation::Lt, "1.0-1", "1.0-1"));
		assert!(!test(Relation::Gt, "1.0-1", "1.0-1"));
	}

	#[test]
	fn none_is_always_valid() {
		assert!(test(Relation::None, "1.0", "9.0"));
		assert!(test(Relation::None, "", "anything"));
	}

	#[test]
	fn relations_are_consistent_both_ways() {
		let versions = ["1.0", "1.0-1", "1:0.9", "1.0~rc1", "1.0a", "1.0+dfsg-2", "2.5", "2.5-0", "0.10", "0.9.9", ""];
		for a in versions {
			for b in versions {
				assert_eq!(test(Relation::Eq, a, b), test(Relation::Eq, b, a), "{a} = {b}");
				assert_eq!(test(Relation::Lt, a, b), test(Relation::Gt, b, a), "{a} << {b}");
				assert_eq!(test(Relation::LtEq, a, b), test(Relation::GtEq, b, a), "{a} <= {b}");
				assert_eq!(test(Relation::Lt, a, b), compare(a, b) == Less, "{a} cmp {b}");
			}
		}
	}

	#[test]
	fn display_reassembles_components() {
		assert_eq!(Version::parse("1:2.0-3").to_string(), "1:2.0-3");
		assert_eq!(Version::parse("2.0").to_string(), "2.0");
	}
}
