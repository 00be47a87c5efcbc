use crate::config::{Config, Replacement};
use crate::error::{BreakError, Result};
use crate::path::join_path;
use crate::rewrite::pattern::Pattern;
use md5::{Digest, Md5};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Produce the cache-busting token for one specifier.
///
/// Returns `Ok(None)` when an md5 token cannot be computed because nothing
/// matched or no `curr_path` is configured; the caller leaves the text alone.
/// An asset that cannot be read is a hard error.
pub fn generate_token(
	source: &str,
	pattern: &Pattern,
	config: &Config,
	issued_at: SystemTime,
) -> Result<Option<String>> {
	match config.replacement {
		Replacement::Time => Ok(Some(time_token(issued_at))),
		Replacement::Literal(ref value) => {
			if value.contains(['"', '\'']) {
				tracing::warn!(token = %value, "Literal replacement contains a quote character");
			}
			Ok(Some(value.clone()))
		}
		Replacement::Md5 => {
			let Some(found) = pattern.first_match(source) else {
				tracing::debug!("No match to hash, skipping");
				return Ok(None);
			};

			let Some(ref base) = config.curr_path else {
				tracing::warn!(
					reference = %found,
					"md5 replacement needs curr_path to locate assets, skipping"
				);
				return Ok(None);
			};

			let reference = strip_query(strip_delimiters(found));
			let asset_path = PathBuf::from(join_path(&base.to_string_lossy(), &[reference]));
			let contents = std::fs::read(&asset_path).map_err(|source| BreakError::AssetRead {
				path: asset_path.clone(),
				source,
			})?;

			tracing::debug!(path = %asset_path.display(), "Hashing asset");
			Ok(Some(content_digest(&contents, config.length)))
		}
	}
}

/// Milliseconds since the Unix epoch as a decimal string.
pub fn time_token(issued_at: SystemTime) -> String {
	issued_at
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_millis())
		.unwrap_or_default()
		.to_string()
}

/// Lowercase hex md5 of `contents`, truncated to `length` characters.
///
/// Contents are read as UTF-8 before hashing; invalid sequences become U+FFFD.
pub fn content_digest(contents: &[u8], length: usize) -> String {
	let text = String::from_utf8_lossy(contents);
	let mut digest = hex::encode(Md5::digest(text.as_bytes()));
	digest.truncate(length);
	digest
}

/// Drop the first and last character (the enclosing quotes).
fn strip_delimiters(found: &str) -> &str {
	let mut chars = found.chars();
	chars.next();
	chars.next_back();
	chars.as_str()
}

fn strip_query(reference: &str) -> &str {
	reference.split('?').next().unwrap_or(reference)
}
