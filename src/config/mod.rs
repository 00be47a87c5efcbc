//! Configuration loading and parsing for breakcache.
//!
//! This module handles:
//! - Typed options (position, replacement, match specifiers) and their defaults
//! - TOML config file parsing
//! - Directory cascade discovery and field-by-field merging

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_options, merge_configs, user_config_path,
};
pub use parser::{INIT_TEMPLATE, parse_config_file, parse_config_str};
pub use types::{
	Config, ConfigFile, DEFAULT_HASH_LENGTH, LoadedConfig, MatchSpec, Options, Position,
	Replacement,
};
