//! Breakcache - rewrite asset references so clients fetch fresh copies after a deploy.
//!
//! This library provides the core functionality for breakcache, including:
//! - Pattern building for `append`, `filename` and `overwrite` positions
//! - Token generation from the clock, an md5 content digest, or a literal
//! - URL-aware path joining for locating hashed assets
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```
//! use breakcache_cli::config::{Config, Position};
//! use breakcache_cli::rewrite::break_cache;
//!
//! let config = Config::new("main.css")
//!     .with_position(Position::Filename)
//!     .with_replacement("v2");
//!
//! let html = r#"<link rel="stylesheet" href="css/main.css">"#;
//! let out = break_cache(html, &config).unwrap();
//! assert_eq!(out, r#"<link rel="stylesheet" href="css/main.v2.css">"#);
//! ```

pub mod config;
pub mod error;
pub mod path;
pub mod rewrite;

pub use config::{Config, MatchSpec, Position, Replacement};
pub use error::{BreakError, Result};
pub use path::join_path;
pub use rewrite::break_cache;
