use crate::config::types::ConfigFile;
use crate::error::{BreakError, Result};
use std::path::Path;

/// Template written by `breakcache --init`.
pub const INIT_TEMPLATE: &str = r#"# breakcache configuration
# Files in parent directories are merged in unless this one sets root = true.
root = true

# Asset references to rewrite, applied in order.
match = ["app.js", "main.css"]

# append:    "app.js"   -> "app.js?rel=<token>"
# filename:  "app.js"   -> "app.<token>.js"
# overwrite: match = "v=*&" turns "v=123&" into "v=<token>&"
position = "append"

# "time", "md5", or any literal string.
replacement = "time"

# md5 only: digest length and the directory asset paths are resolved against.
# length = 10
# curr-path = "public"
"#;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<ConfigFile> {
	let content = std::fs::read_to_string(path).map_err(|source| BreakError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<ConfigFile> {
	let config: ConfigFile =
		toml::from_str(content).map_err(|source| BreakError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{MatchSpec, Position, Replacement};
	use std::path::PathBuf;

	#[test]
	fn test_init_template_parses() {
		let path = PathBuf::from(".breakcache.toml");
		let config = parse_config_str(INIT_TEMPLATE, &path).unwrap();

		assert!(config.root);
		assert_eq!(config.position, Some(Position::Append));
		assert_eq!(config.replacement, Some(Replacement::Time));
	}

	#[test]
	fn test_parse_empty_config() {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str("", &path).unwrap();

		assert!(!config.root);
		assert!(config.matches.is_none());
		assert!(config.position.is_none());
		assert!(config.replacement.is_none());
		assert!(config.length.is_none());
		assert!(config.curr_path.is_none());
	}

	#[test]
	fn test_parse_full_config() {
		let content = r#"
root = true
match = ["app.js", "main.css"]
position = "filename"
replacement = "md5"
length = 8
curr-path = "public"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(
			config.matches,
			Some(MatchSpec::Many(vec![
				"app.js".to_string(),
				"main.css".to_string()
			]))
		);
		assert_eq!(config.position, Some(Position::Filename));
		assert_eq!(config.replacement, Some(Replacement::Md5));
		assert_eq!(config.length, Some(8));
		assert_eq!(config.curr_path, Some(PathBuf::from("public")));
	}

	#[test]
	fn test_parse_single_match_and_literal_replacement() {
		let content = r#"
match = "v=*&"
position = "overwrite"
replacement = "2024-release"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.matches, Some(MatchSpec::Single("v=*&".to_string())));
		assert_eq!(
			config.replacement,
			Some(Replacement::Literal("2024-release".to_string()))
		);
	}

	#[test]
	fn test_parse_curr_path_alias() {
		let content = r#"currPath = "/site""#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.curr_path, Some(PathBuf::from("/site")));
	}

	#[test]
	fn test_unknown_position_fails_to_parse() {
		let content = r#"position = "prepend""#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			BreakError::ConfigParseError { path, .. } => {
				assert_eq!(path, PathBuf::from("test.toml"));
			}
			_ => panic!("Expected ConfigParseError"),
		}
	}

	#[test]
	fn test_overwrite_without_wildcard_fails_validation() {
		let content = r#"
match = "v="
position = "overwrite"
"#;
		let path = PathBuf::from("test.toml");
		match parse_config_str(content, &path).unwrap_err() {
			BreakError::MissingWildcard { specifier } => assert_eq!(specifier, "v="),
			_ => panic!("Expected MissingWildcard error"),
		}
	}

	#[test]
	fn test_parse_missing_file() {
		let path = PathBuf::from("/nonexistent/dir/.breakcache.toml");
		assert!(matches!(
			parse_config_file(&path),
			Err(BreakError::ConfigReadError { .. })
		));
	}
}
