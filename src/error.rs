use std::path::PathBuf;

/// Library-level structured errors for breakcache.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum BreakError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Unknown position: {value} (expected append, filename or overwrite)")]
	UnknownPosition { value: String },

	#[error("Overwrite specifier has no `*` wildcard: {specifier}")]
	MissingWildcard { specifier: String },

	#[error("Invalid pattern built from specifier: {specifier}")]
	InvalidPattern {
		specifier: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to read asset for content hash: {path}")]
	AssetRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using BreakError.
pub type Result<T> = std::result::Result<T, BreakError>;
