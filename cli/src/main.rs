mod builtins;
mod config;
mod demo;
mod error;
mod help;
mod output;
mod shell;
mod tokenize;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::help::HelpOptions;
use crate::output::OutputFormat;
use crate::shell::Shell;

const DEFAULT_DESCRIPTION: &str = "interactive command shell";

#[derive(Debug, Parser)]
#[command(name = "cmdsh", version)]
#[command(about = "Interactive command shell with nested commands, typed flags, and arguments")]
struct Cli {
    /// YAML settings file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tracing filter (e.g. warn, debug, command_shell_core=trace). RUST_LOG wins.
    #[arg(long)]
    log_level: Option<String>,
    /// Prompt string.
    #[arg(long)]
    prompt: Option<String>,
    /// File to load and save line history.
    #[arg(long)]
    history_file: Option<PathBuf>,
    /// Print the command tree in this format and exit.
    #[arg(long, value_enum)]
    describe: Option<OutputFormat>,
    /// Write the effective settings to this YAML file and exit.
    #[arg(long)]
    write_config: Option<PathBuf>,
    /// Root flags, optionally followed by one command to run instead of
    /// starting the interactive loop.
    #[arg(last = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_tracing(&config.log_level)?;

    if let Some(path) = &cli.write_config {
        config.save(path)?;
        return Ok(());
    }

    let description = if config.description.is_empty() {
        DEFAULT_DESCRIPTION
    } else {
        config.description.as_str()
    };
    let mut tree = demo::build_tree(&config.name, description)?;

    let exit = Arc::new(AtomicBool::new(false));
    let help_options = HelpOptions {
        description: config.description.clone(),
        groups: config.help_groups,
    };
    builtins::register(&mut tree, help_options, Arc::clone(&exit))?;

    if let Some(format) = cli.describe {
        print!("{}", output::format_description(&tree.describe(), format)?);
        return Ok(());
    }

    let mut shell = Shell::new(tree, config, exit);
    let rest = shell.set_base_flags(&cli.tokens)?;

    if rest.is_empty() {
        debug!("starting interactive loop");
        shell.repl()
    } else {
        debug!(command = ?rest, "one-shot mode");
        shell.run_tokens(rest)
    }
}

/// Loads the config file, then applies command-line overrides.
fn load_config(cli: &Cli) -> Result<ShellConfig> {
    let mut config = match &cli.config {
        Some(path) => ShellConfig::load(path).map_err(|source| ShellError::ConfigFile {
            path: path.clone(),
            source: Box::new(source),
        })?,
        None => ShellConfig::default(),
    };

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(prompt) = &cli.prompt {
        config.prompt = Some(prompt.clone());
    }
    if let Some(path) = &cli.history_file {
        config.history_file = Some(path.clone());
    }
    Ok(config)
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|_| ShellError::LogLevel(level.to_string()))?,
    };

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}
