use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, Options};
use crate::error::{BreakError, Result};
use std::path::{Path, PathBuf};

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = ".breakcache.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.breakcache.toml`
/// 2. Continue up the directory tree, stopping after a file with `root = true`
/// 3. If no root file was found, check ~/.breakcache.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let root = config.root;

			tracing::debug!(path = %config_path.display(), root, "Loaded config file");
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if root {
				return Ok(configs);
			}
		}

		current_dir = dir.parent();
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.breakcache.toml if it exists and wasn't already seen.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	let user_config_path = user_config_path()?;

	// The walk may already have passed through the home directory
	if existing_configs
		.iter()
		.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into a single set of options.
///
/// Configs are expected in cascade order, so earlier (nearer) files win
/// field-by-field. A relative `curr-path` is anchored at the directory of the
/// file that declared it.
pub fn merge_configs(configs: &[LoadedConfig]) -> Options {
	configs
		.iter()
		.fold(Options::default(), |merged, loaded| {
			let mut options = loaded.config.options();
			if let Some(ref curr_path) = options.curr_path
				&& curr_path.is_relative()
				&& let Some(dir) = loaded.path.parent()
			{
				options.curr_path = Some(dir.join(curr_path));
			}
			merged.merge(options)
		})
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_options(start_dir: &Path) -> Result<Options> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(BreakError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
