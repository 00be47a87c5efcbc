use crate::error::BreakError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default truncation length for md5 tokens.
pub const DEFAULT_HASH_LENGTH: usize = 10;

/// Where the cache-busting token is injected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
	/// Append `?rel=<token>` after the matched asset reference.
	#[default]
	Append,

	/// Rename the file: `name.ext` becomes `name.<token>.ext`.
	Filename,

	/// Replace whatever sits between the two anchors of `before*after`.
	Overwrite,
}

impl Position {
	pub fn as_str(&self) -> &'static str {
		match self {
			Position::Append => "append",
			Position::Filename => "filename",
			Position::Overwrite => "overwrite",
		}
	}
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Position {
	type Err = BreakError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"append" => Ok(Position::Append),
			"filename" => Ok(Position::Filename),
			"overwrite" => Ok(Position::Overwrite),
			other => Err(BreakError::UnknownPosition {
				value: other.to_string(),
			}),
		}
	}
}

/// How the token value is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Replacement {
	/// Milliseconds since the Unix epoch.
	#[default]
	Time,

	/// Truncated md5 digest of the referenced asset's contents.
	Md5,

	/// Used verbatim.
	Literal(String),
}

impl From<String> for Replacement {
	fn from(value: String) -> Self {
		match value.as_str() {
			"time" => Replacement::Time,
			"md5" => Replacement::Md5,
			_ => Replacement::Literal(value),
		}
	}
}

impl From<&str> for Replacement {
	fn from(value: &str) -> Self {
		Replacement::from(value.to_string())
	}
}

impl fmt::Display for Replacement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Replacement::Time => f.write_str("time"),
			Replacement::Md5 => f.write_str("md5"),
			Replacement::Literal(value) => f.write_str(value),
		}
	}
}

/// One match specifier or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MatchSpec {
	Single(String),
	Many(Vec<String>),
}

impl MatchSpec {
	/// Specifiers in application order.
	pub fn specifiers(&self) -> &[String] {
		match self {
			MatchSpec::Single(specifier) => std::slice::from_ref(specifier),
			MatchSpec::Many(specifiers) => specifiers,
		}
	}
}

impl Default for MatchSpec {
	fn default() -> Self {
		MatchSpec::Many(Vec::new())
	}
}

impl From<&str> for MatchSpec {
	fn from(value: &str) -> Self {
		MatchSpec::Single(value.to_string())
	}
}

impl From<Vec<String>> for MatchSpec {
	fn from(value: Vec<String>) -> Self {
		MatchSpec::Many(value)
	}
}

impl From<&[&str]> for MatchSpec {
	fn from(value: &[&str]) -> Self {
		MatchSpec::Many(value.iter().map(|s| s.to_string()).collect())
	}
}

/// Partially specified options, as found in one config file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
	pub matches: Option<MatchSpec>,
	pub position: Option<Position>,
	pub replacement: Option<Replacement>,
	pub length: Option<usize>,
	pub curr_path: Option<PathBuf>,
}

impl Options {
	/// Field-by-field override: values set on `self` win over `fallback`.
	pub fn merge(self, fallback: Options) -> Options {
		Options {
			matches: self.matches.or(fallback.matches),
			position: self.position.or(fallback.position),
			replacement: self.replacement.or(fallback.replacement),
			length: self.length.or(fallback.length),
			curr_path: self.curr_path.or(fallback.curr_path),
		}
	}

	/// Fill unset fields with defaults.
	pub fn resolve(self) -> Config {
		Config {
			matches: self.matches.unwrap_or_default(),
			position: self.position.unwrap_or_default(),
			replacement: self.replacement.unwrap_or_default(),
			length: self.length.unwrap_or(DEFAULT_HASH_LENGTH),
			curr_path: self.curr_path,
		}
	}
}

/// Fully resolved configuration for one `break_cache` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub matches: MatchSpec,
	pub position: Position,
	pub replacement: Replacement,

	/// Truncation length for md5 tokens.
	pub length: usize,

	/// Base directory that asset references are resolved against in md5 mode.
	pub curr_path: Option<PathBuf>,
}

impl Config {
	pub fn new(matches: impl Into<MatchSpec>) -> Self {
		Options {
			matches: Some(matches.into()),
			..Default::default()
		}
		.resolve()
	}

	pub fn with_position(mut self, position: Position) -> Self {
		self.position = position;
		self
	}

	pub fn with_replacement(mut self, replacement: impl Into<Replacement>) -> Self {
		self.replacement = replacement.into();
		self
	}

	pub fn with_length(mut self, length: usize) -> Self {
		self.length = length;
		self
	}

	pub fn with_curr_path(mut self, curr_path: impl Into<PathBuf>) -> Self {
		self.curr_path = Some(curr_path.into());
		self
	}
}

/// Contents of a `.breakcache.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
	/// If true, stop the directory cascade here and skip ~/.breakcache.toml.
	#[serde(default)]
	pub root: bool,

	#[serde(default, rename = "match")]
	pub matches: Option<MatchSpec>,

	#[serde(default)]
	pub position: Option<Position>,

	#[serde(default)]
	pub replacement: Option<Replacement>,

	#[serde(default)]
	pub length: Option<usize>,

	#[serde(default, alias = "currPath")]
	pub curr_path: Option<PathBuf>,
}

impl ConfigFile {
	pub fn options(&self) -> Options {
		Options {
			matches: self.matches.clone(),
			position: self.position,
			replacement: self.replacement.clone(),
			length: self.length,
			curr_path: self.curr_path.clone(),
		}
	}

	/// Reject specifiers that can never produce a pattern.
	pub fn validate(&self) -> Result<(), BreakError> {
		if self.position == Some(Position::Overwrite)
			&& let Some(ref matches) = self.matches
		{
			for specifier in matches.specifiers() {
				if !specifier.contains('*') {
					return Err(BreakError::MissingWildcard {
						specifier: specifier.clone(),
					});
				}
			}
		}
		Ok(())
	}
}

/// A loaded config file with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: ConfigFile,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_position_from_str() {
		assert_eq!("append".parse::<Position>().unwrap(), Position::Append);
		assert_eq!("filename".parse::<Position>().unwrap(), Position::Filename);
		assert_eq!("overwrite".parse::<Position>().unwrap(), Position::Overwrite);
	}

	#[test]
	fn test_unknown_position_is_an_error() {
		match "prepend".parse::<Position>().unwrap_err() {
			BreakError::UnknownPosition { value } => assert_eq!(value, "prepend"),
			_ => panic!("Expected UnknownPosition error"),
		}
	}

	#[test]
	fn test_replacement_from_string() {
		assert_eq!(Replacement::from("time"), Replacement::Time);
		assert_eq!(Replacement::from("md5"), Replacement::Md5);
		assert_eq!(Replacement::from("v2"), Replacement::Literal("v2".to_string()));
	}

	#[test]
	fn test_match_spec_specifiers() {
		assert_eq!(MatchSpec::from("app.js").specifiers(), ["app.js"]);
		let many = MatchSpec::from(&["a.js", "b.css"][..]);
		assert_eq!(many.specifiers(), ["a.js", "b.css"]);
		assert!(MatchSpec::default().specifiers().is_empty());
	}

	#[test]
	fn test_resolve_applies_defaults() {
		let config = Options::default().resolve();
		assert_eq!(config.position, Position::Append);
		assert_eq!(config.replacement, Replacement::Time);
		assert_eq!(config.length, DEFAULT_HASH_LENGTH);
		assert!(config.curr_path.is_none());
		assert!(config.matches.specifiers().is_empty());
	}

	#[test]
	fn test_merge_prefers_self() {
		let specific = Options {
			position: Some(Position::Filename),
			..Default::default()
		};
		let general = Options {
			matches: Some(MatchSpec::from("app.js")),
			position: Some(Position::Overwrite),
			length: Some(6),
			..Default::default()
		};

		let merged = specific.merge(general);
		assert_eq!(merged.position, Some(Position::Filename));
		assert_eq!(merged.matches, Some(MatchSpec::from("app.js")));
		assert_eq!(merged.length, Some(6));
	}

	#[test]
	fn test_merge_replaces_match_lists_wholesale() {
		let specific = Options {
			matches: Some(MatchSpec::from(&["a.js"][..])),
			..Default::default()
		};
		let general = Options {
			matches: Some(MatchSpec::from(&["b.js", "c.js"][..])),
			..Default::default()
		};

		let merged = specific.merge(general);
		assert_eq!(merged.matches.unwrap().specifiers(), ["a.js"]);
	}

	#[test]
	fn test_config_builder() {
		let config = Config::new("app.js")
			.with_position(Position::Filename)
			.with_replacement("md5")
			.with_length(8)
			.with_curr_path("/site");
		assert_eq!(config.position, Position::Filename);
		assert_eq!(config.replacement, Replacement::Md5);
		assert_eq!(config.length, 8);
		assert_eq!(config.curr_path, Some(PathBuf::from("/site")));
	}

	#[test]
	fn test_validate_overwrite_requires_wildcard() {
		let config = ConfigFile {
			matches: Some(MatchSpec::from("v=")),
			position: Some(Position::Overwrite),
			..Default::default()
		};
		assert!(matches!(
			config.validate(),
			Err(BreakError::MissingWildcard { .. })
		));
	}
}
