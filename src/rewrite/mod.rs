//! Cache-busting rewrite engine.
//!
//! This module handles:
//! - Building search patterns for each position mode
//! - Producing tokens (timestamp, md5 content digest, or literal)
//! - Substituting tokens into every match
//! - Folding a list of match specifiers over the source text

pub mod pattern;
pub mod substitute;
pub mod token;

pub use pattern::{Anchors, AssetReference, Found, Pattern};
pub use substitute::{apply_substitution, versioned_filename};
pub use token::{content_digest, generate_token, time_token};

use crate::config::Config;
use crate::error::Result;
use std::time::SystemTime;

/// Rewrite asset references in `source` according to `config`.
///
/// Specifiers are applied left to right, each one seeing the output of the
/// previous. The timestamp for `time` replacement is taken once, so every
/// specifier in a call receives the same token.
pub fn break_cache(source: &str, config: &Config) -> Result<String> {
	break_cache_at(source, config, SystemTime::now())
}

/// Like [`break_cache`], with an explicit time for `time` tokens.
pub fn break_cache_at(source: &str, config: &Config, issued_at: SystemTime) -> Result<String> {
	config
		.matches
		.specifiers()
		.iter()
		.try_fold(source.to_string(), |text, specifier| {
			rewrite_specifier(text, specifier, config, issued_at)
		})
}

fn rewrite_specifier(
	text: String,
	specifier: &str,
	config: &Config,
	issued_at: SystemTime,
) -> Result<String> {
	let pattern = Pattern::build(specifier, config.position)?;

	let Some(token) = generate_token(&text, &pattern, config, issued_at)? else {
		return Ok(text);
	};

	tracing::debug!(
		specifier,
		position = %config.position,
		token = %token,
		matches = pattern.count_matches(&text),
		"Applying specifier"
	);
	Ok(apply_substitution(&text, &pattern, &token))
}
