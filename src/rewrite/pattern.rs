use crate::config::Position;
use crate::error::{BreakError, Result};
use regex::{Captures, Regex};

/// A compiled search pattern for one match specifier.
#[derive(Debug, Clone)]
pub struct Pattern {
	/// Position mode the pattern was built for.
	pub position: Position,

	regex: Regex,
}

/// An asset reference found inside a quoted literal.
///
/// `"js/app.js?rel=1"` matched with `app.js` splits into `"`, `js/`,
/// `app.js`, `?rel=1` and `"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetReference<'t> {
	pub quote_start: &'t str,
	pub leading_path: &'t str,
	pub matched_text: &'t str,
	pub trailing_text: &'t str,
	pub quote_end: &'t str,
}

impl<'t> AssetReference<'t> {
	fn from_captures(caps: &Captures<'t>) -> Self {
		AssetReference {
			quote_start: either(caps, "dq", "sq"),
			leading_path: either(caps, "dpath", "spath"),
			matched_text: group(caps, "asset"),
			trailing_text: group(caps, "query"),
			quote_end: group(caps, "close"),
		}
	}
}

/// The two literal anchors around an existing token (`v=` and `&` in `v=123&`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors<'t> {
	pub before: &'t str,
	pub after: &'t str,
}

impl<'t> Anchors<'t> {
	fn from_captures(caps: &Captures<'t>) -> Self {
		Anchors {
			before: group(caps, "before"),
			after: group(caps, "after"),
		}
	}
}

/// A single match, shaped by the position mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found<'t> {
	Asset(AssetReference<'t>),
	Anchored(Anchors<'t>),
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
	caps.name(name).map_or("", |m| m.as_str())
}

/// Groups from the double- and single-quoted alternatives; only one takes part.
fn either<'t>(caps: &Captures<'t>, double: &str, single: &str) -> &'t str {
	caps.name(double)
		.or_else(|| caps.name(single))
		.map_or("", |m| m.as_str())
}

impl Pattern {
	/// Build the pattern locating `specifier` for the given position mode.
	///
	/// `append` and `filename` share one shape: an opening quote, an optional
	/// lazy leading path that never crosses a quote of the opening kind, the
	/// literal specifier, any trailing query characters and a closing quote.
	/// `overwrite` splits the specifier on `*` and matches the shortest span
	/// between the two literal anchors.
	pub fn build(specifier: &str, position: Position) -> Result<Self> {
		let source = match position {
			Position::Append | Position::Filename => format!(
				r#"(?:(?P<dq>")(?P<dpath>[^"\r\n]+?)?|(?P<sq>')(?P<spath>[^'\r\n]+?)?)(?P<asset>{})(?P<query>[A-Za-z0-9_?=]*)(?P<close>['"])"#,
				regex::escape(specifier)
			),
			Position::Overwrite => {
				let (before, after) =
					specifier
						.split_once('*')
						.ok_or_else(|| BreakError::MissingWildcard {
							specifier: specifier.to_string(),
						})?;
				format!(
					"(?P<before>{})(?:.+?)(?P<after>{})",
					regex::escape(before),
					regex::escape(after)
				)
			}
		};

		let regex = Regex::new(&source).map_err(|source| BreakError::InvalidPattern {
			specifier: specifier.to_string(),
			source,
		})?;

		Ok(Pattern { position, regex })
	}

	/// The full text of the first match, delimiters included.
	pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
		self.regex.find(text).map(|m| m.as_str())
	}

	/// Number of non-overlapping matches in `text`.
	pub fn count_matches(&self, text: &str) -> usize {
		self.regex.find_iter(text).count()
	}

	/// Replace every match with the text produced by `render`.
	pub fn replace_all<F>(&self, text: &str, mut render: F) -> String
	where
		F: FnMut(Found<'_>) -> String,
	{
		let position = self.position;
		self.regex
			.replace_all(text, |caps: &Captures| {
				let found = match position {
					Position::Append | Position::Filename => {
						Found::Asset(AssetReference::from_captures(caps))
					}
					Position::Overwrite => Found::Anchored(Anchors::from_captures(caps)),
				};
				render(found)
			})
			.into_owned()
	}
}
