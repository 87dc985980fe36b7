use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cfgmorph_cli::config::{
	CONFIG_FILE_NAME, LoadedConfig, discover_configs, generate_init_template, load_rules_file,
	merge_configs, user_config_path,
};
use cfgmorph_cli::pipeline::{
	self,
	io::{read_input, write_output},
};
use cfgmorph_cli::rules::compile_rules;

#[derive(Parser)]
#[command(name = "cfgmorph")]
#[command(
	author,
	version,
	about = "Rewrite network device configuration dumps with declarative block rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Rule file to use instead of discovering .cfgmorph.toml files
	#[arg(short, long, value_name = "RULES", global = true)]
	rules: Option<PathBuf>,

	/// Write the rewritten dump to this file instead of stdout
	#[arg(short, long, value_name = "OUTPUT")]
	output: Option<PathBuf>,

	/// Create a template .cfgmorph.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .cfgmorph.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log verbosity (-v for info, -vv for debug)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Configuration dump to rewrite (`-` reads stdin)
	input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Rule file commands
	Rules {
		#[command(subcommand)]
		action: RulesAction,
	},
}

#[derive(Subcommand)]
enum RulesAction {
	/// Display the effective rules with their source files
	Show,
	/// Load and compile all rules without rewriting anything
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

	if let Some(command) = cli.command {
		return match command {
			Commands::Rules { action } => match action {
				RulesAction::Show => handle_rules_show(cli.rules.as_deref()),
				RulesAction::Validate => handle_rules_validate(cli.rules.as_deref()),
			},
		};
	}

	if let Some(ref input) = cli.input {
		return handle_rewrite(input, cli.output.as_deref(), cli.rules.as_deref());
	}

	anyhow::bail!("No input given. Pass a configuration dump path or `-` for stdin.");
}

/// Logs go to stderr so stdout stays reserved for the rewritten dump.
fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.compact()
		.try_init();
}

/// Load the explicit rule file, or discover the cascade from the current directory.
fn load_configs(rules: Option<&Path>) -> Result<Vec<LoadedConfig>> {
	match rules {
		Some(path) => {
			let loaded = load_rules_file(path)
				.with_context(|| format!("Failed to load rule file {}", path.display()))?;
			Ok(vec![loaded])
		}
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			discover_configs(&cwd).context("Failed to discover rule files")
		}
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_rewrite(input: &Path, output: Option<&Path>, rules: Option<&Path>) -> Result<ExitCode> {
	let configs = load_configs(rules)?;
	if configs.is_empty() {
		tracing::warn!("no rule files found; the dump will be copied unchanged");
	}

	let merged = merge_configs(&configs);
	let compiled = compile_rules(&merged).context("Failed to compile rules")?;

	let document = read_input(input)
		.with_context(|| format!("Failed to read input {}", input.display()))?;

	let rewrite = pipeline::run(&document, &compiled, &merged.block_classes);

	match output {
		Some(path) => {
			write_output(path, &rewrite.text)
				.with_context(|| format!("Failed to write output {}", path.display()))?;

			for pass in &rewrite.passes {
				println!(
					"Rewrote {} of {} {} blocks",
					pass.changed, pass.blocks, pass.tag
				);
			}
			println!("Output written to {}", path.display());
		}
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout
				.write_all(rewrite.text.as_bytes())
				.and_then(|()| stdout.flush())
				.context("Failed to write to stdout")?;
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rules_show(rules: Option<&Path>) -> Result<ExitCode> {
	let configs = load_configs(rules)?;

	if configs.is_empty() {
		println!("No rule files found.");
		return Ok(ExitCode::SUCCESS);
	}

	let merged = merge_configs(&configs);
	let classes = &merged.block_classes;
	println!(
		"Block classes: {} = \"{}\", {} = \"{}\"\n",
		classes.primary.tag,
		classes.primary.keyword,
		classes.secondary.tag,
		classes.secondary.keyword
	);

	println!("Rules (in application order):\n");

	let mut current_source: Option<&Path> = None;
	for entry in &merged.rules {
		if current_source != Some(entry.source.as_path()) {
			println!("# Source: {}", entry.source.display());
			current_source = Some(entry.source.as_path());
		}

		let rule = &entry.rule;
		println!(
			"  Rule {} [{}]:",
			entry.index,
			if rule.active { "active" } else { "inactive" }
		);
		println!("    type: {}", rule.kind.as_deref().unwrap_or("<none>"));
		println!("    blocks: {}", rule.blocks.join(", "));
		println!(
			"    interface: {}",
			rule.interface.as_deref().unwrap_or("<none>")
		);
		if let Some(ref from) = rule.from {
			println!("    from: {}", from);
		}
		if let Some(ref to) = rule.to {
			println!("    to: {}", to);
		}
		if rule.regex {
			println!("    regex: true");
		}
		if let Some(ref batch) = rule.replace_multiple {
			println!("    replace_multiple: {} substitutions", batch.len());
		}
		if let Some(ref target) = rule.target {
			println!("    target: {}", target);
		}
		if let Some(ref position) = rule.position {
			println!("    position: {}", position);
		}
		if let Some(ref new_lines) = rule.new_lines {
			println!("    new_lines: {:?}", new_lines);
		}
		println!();
	}

	if let Ok(user_path) = user_config_path() {
		println!("User rule file path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rules_validate(rules: Option<&Path>) -> Result<ExitCode> {
	let checked = load_configs(rules).and_then(|configs| {
		compile_rules(&merge_configs(&configs)).context("Failed to compile rules")?;
		Ok(configs)
	});

	match checked {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No rule files found.");
			} else {
				println!("All rule files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} rules)",
						loaded.path.display(),
						loaded.config.rules.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Rule error: {e:#}");
			Ok(ExitCode::FAILURE)
		}
	}
}
