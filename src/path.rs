//! POSIX-style path joining that keeps URL prefixes intact.
//!
//! Unlike `std::path::Path::join`, this never consults the filesystem and
//! always normalizes `.` and `..` segments.

/// Join `base` with `segments`, normalizing `.`/`..` and empty segments.
///
/// A `scheme://` prefix on `base` is preserved verbatim. A leading `/` on
/// `base` is kept. `..` past the first segment is dropped silently.
pub fn join_path(base: &str, segments: &[&str]) -> String {
	// Only the first argument may carry a URL prefix
	let (prefix, base) = match base.split_once("//") {
		Some((scheme, rest)) => (format!("{scheme}//"), rest),
		None => (String::new(), base),
	};

	let parts: Vec<&str> = base
		.split('/')
		.chain(segments.iter().copied().flat_map(|segment| segment.split('/')))
		.collect();

	let mut normalized: Vec<&str> = Vec::new();
	for part in &parts {
		match *part {
			"" | "." => continue,
			".." => {
				normalized.pop();
			}
			part => normalized.push(part),
		}
	}

	if parts.first() == Some(&"") {
		normalized.insert(0, "");
	}

	let joined = normalized.join("/");
	let joined = if !joined.is_empty() {
		joined
	} else if normalized.is_empty() {
		".".to_string()
	} else {
		"/".to_string()
	};

	prefix + &joined
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_join_relative_parent() {
		assert_eq!(join_path("a/b", &["../c"]), "a/c");
	}

	#[test]
	fn test_join_url_prefix() {
		assert_eq!(join_path("http://x.com/a", &["../b"]), "http://x.com/b");
	}

	#[test]
	fn test_join_absolute_current_dir() {
		assert_eq!(join_path("/a", &["./b"]), "/a/b");
	}

	#[test]
	fn test_join_collapses_empty_segments() {
		assert_eq!(join_path("/site/css/", &["", "main.css"]), "/site/css/main.css");
	}

	#[test]
	fn test_join_double_slash_in_base_is_a_prefix() {
		// Any `//` in the first argument marks a prefix, not just `scheme://`
		assert_eq!(join_path("/site//css/", &["", "main.css"]), "/site//css/main.css");
	}

	#[test]
	fn test_join_multiple_segments() {
		assert_eq!(join_path("/site", &["js", "vendor", "../app.js"]), "/site/js/app.js");
	}

	#[test]
	fn test_join_url_prefix_only_from_first_argument() {
		assert_eq!(join_path("/site", &["http://cdn/a.js"]), "/site/http:/cdn/a.js");
	}

	#[test]
	fn test_join_url_keeps_later_double_slash_in_remainder() {
		assert_eq!(join_path("https://x.com//a", &["b"]), "https://x.com/a/b");
	}

	#[test]
	fn test_join_empty_is_current_dir() {
		assert_eq!(join_path(".", &["."]), ".");
		assert_eq!(join_path("a", &[".."]), ".");
	}

	#[test]
	fn test_join_root_only() {
		assert_eq!(join_path("/", &[]), "/");
		assert_eq!(join_path("/a", &[".."]), "/");
	}

	#[test]
	fn test_join_parent_past_start_is_dropped() {
		// Popping an empty stack is a no-op, so extra `..` segments vanish
		assert_eq!(join_path("a", &["../../b"]), "b");
		assert_eq!(join_path("/", &["../etc/hosts"]), "/etc/hosts");
	}
}
