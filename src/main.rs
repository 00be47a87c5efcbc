use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use breakcache_cli::config::{
	CONFIG_FILE_NAME, INIT_TEMPLATE, MatchSpec, Options, Position, Replacement,
	discover_configs, load_merged_options, merge_configs, user_config_path,
};
use breakcache_cli::rewrite::break_cache;

#[derive(Parser)]
#[command(name = "breakcache")]
#[command(
	author,
	version,
	about = "Rewrite asset references with cache-busting tokens"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .breakcache.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .breakcache.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Asset reference to rewrite (repeatable, applied in order)
	#[arg(short, long = "match", value_name = "SPECIFIER")]
	matches: Vec<String>,

	/// Where to put the token: append, filename or overwrite
	#[arg(short, long)]
	position: Option<String>,

	/// Token source: time, md5, or a literal string
	#[arg(short, long)]
	replacement: Option<String>,

	/// Number of hex characters kept from md5 tokens
	#[arg(short, long)]
	length: Option<usize>,

	/// Directory that asset paths are resolved against for md5 tokens
	#[arg(long, value_name = "DIR")]
	curr_path: Option<PathBuf>,

	/// Rewrite files in place instead of printing to stdout
	#[arg(short, long, requires = "files")]
	write: bool,

	/// Log each applied specifier to stderr
	#[arg(short, long)]
	verbose: bool,

	/// Files to rewrite; reads stdin when none are given
	files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display config files in cascade order and the effective options
	Show,
	/// Check all config files for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(ref command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	handle_rewrite(&cli)
}

/// `--verbose` forces debug output, otherwise RUST_LOG or warnings only.
fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):\n");
		for loaded in &configs {
			println!("# Source: {}", loaded.path.display());
			println!("# root: {}", loaded.config.root);
			print_options(&loaded.config.options(), "  ");
			println!();
		}
	}

	println!("Effective options:");
	print_options(&merge_configs(&configs), "  ");
	println!();

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_options(options: &Options, indent: &str) {
	if let Some(ref matches) = options.matches {
		println!("{indent}match: {}", matches.specifiers().join(", "));
	}
	if let Some(position) = options.position {
		println!("{indent}position: {position}");
	}
	if let Some(ref replacement) = options.replacement {
		println!("{indent}replacement: {replacement}");
	}
	if let Some(length) = options.length {
		println!("{indent}length: {length}");
	}
	if let Some(ref curr_path) = options.curr_path {
		println!("{indent}curr-path: {}", curr_path.display());
	}
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!("  {}", loaded.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

/// Options given on the command line; these win over any config file.
fn cli_options(cli: &Cli) -> Result<Options> {
	let position = cli
		.position
		.as_deref()
		.map(str::parse::<Position>)
		.transpose()?;

	Ok(Options {
		matches: (!cli.matches.is_empty()).then(|| MatchSpec::Many(cli.matches.clone())),
		position,
		replacement: cli.replacement.clone().map(Replacement::from),
		length: cli.length,
		curr_path: cli.curr_path.clone(),
	})
}

fn handle_rewrite(cli: &Cli) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let file_options = load_merged_options(&cwd).context("Failed to load configuration")?;
	let options = cli_options(cli)?.merge(file_options);

	if options
		.matches
		.as_ref()
		.is_none_or(|matches| matches.specifiers().is_empty())
	{
		anyhow::bail!(
			"No match specifiers given. Use --match or set `match` in {CONFIG_FILE_NAME}"
		);
	}

	if cli.files.is_empty() {
		let mut source = String::new();
		std::io::stdin()
			.read_to_string(&mut source)
			.context("Failed to read stdin")?;

		let config = options.merge(Options {
			curr_path: Some(cwd),
			..Default::default()
		});
		let rewritten =
			break_cache(&source, &config.resolve()).context("Failed to rewrite stdin")?;

		std::io::stdout()
			.write_all(rewritten.as_bytes())
			.context("Failed to write stdout")?;
		return Ok(ExitCode::SUCCESS);
	}

	for file in &cli.files {
		rewrite_file(file, &options, cli.write)?;
	}

	Ok(ExitCode::SUCCESS)
}

fn rewrite_file(file: &Path, options: &Options, in_place: bool) -> Result<()> {
	// Asset references are relative to the file that contains them
	let anchor = file
		.parent()
		.filter(|dir| !dir.as_os_str().is_empty())
		.unwrap_or(Path::new("."));
	let config = options
		.clone()
		.merge(Options {
			curr_path: Some(anchor.to_path_buf()),
			..Default::default()
		})
		.resolve();

	let source = std::fs::read_to_string(file)
		.with_context(|| format!("Failed to read {}", file.display()))?;
	let rewritten = break_cache(&source, &config)
		.with_context(|| format!("Failed to rewrite {}", file.display()))?;

	if in_place {
		if rewritten != source {
			std::fs::write(file, &rewritten)
				.with_context(|| format!("Failed to write {}", file.display()))?;
			tracing::info!(path = %file.display(), "Rewrote file");
		}
	} else {
		std::io::stdout()
			.write_all(rewritten.as_bytes())
			.context("Failed to write stdout")?;
	}

	Ok(())
}
