use crate::config::Position;
use crate::rewrite::pattern::{AssetReference, Found, Pattern};

/// Substitute `token` into every match of `pattern` in `source`.
///
/// The same token is used for all occurrences. Any query string already
/// trailing a matched asset is dropped.
pub fn apply_substitution(source: &str, pattern: &Pattern, token: &str) -> String {
	let position = pattern.position;
	pattern.replace_all(source, |found| match found {
		Found::Asset(asset) => render_asset(position, &asset, token),
		Found::Anchored(anchors) => format!("{}{token}{}", anchors.before, anchors.after),
	})
}

fn render_asset(position: Position, asset: &AssetReference<'_>, token: &str) -> String {
	let replaced = if position == Position::Filename {
		// Extensionless names get the token appended, not a leading `.<token>.`
		versioned_filename(asset.matched_text, token)
	} else {
		format!("{}?rel={token}", asset.matched_text)
	};
	format!(
		"{}{}{replaced}{}",
		asset.quote_start, asset.leading_path, asset.quote_end
	)
}

/// `css/main.css` becomes `main.<token>.css`.
///
/// Only the basename survives. Without an extension the token is appended.
pub fn versioned_filename(matched: &str, token: &str) -> String {
	let basename = matched.rsplit('/').next().unwrap_or(matched);
	match basename.rsplit_once('.') {
		Some((stem, extension)) => format!("{stem}.{token}.{extension}"),
		None => format!("{basename}.{token}"),
	}
}
