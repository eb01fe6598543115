use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use odtblocks::document::{LogReporter, replace_in_path};
use odtblocks::validation::{validate_json_args, validate_replace_args};
use odtblocks::{Config, Error, ErrorKind, write_inventory_json};

/// Inventory and rewrite import placeholders in .odt documents
#[derive(Parser)]
#[command(name = "odtblocks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a JSON inventory of documents and their import blocks
    Json {
        /// Document or directory to describe
        input: PathBuf,

        /// JSON file to write
        output: PathBuf,

        /// Overwrite the output file without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Replace an import block in every document under a path
    Replace {
        /// Document or directory to edit
        input: PathBuf,

        /// Import block to replace, e.g. "[import old.odt]"
        old_block: String,

        /// Replacement import block, e.g. "[import new.odt]"
        new_block: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Warning: {e:#}");
    }

    log::info!(
        "Starting application with arguments: {}",
        std::env::args().skip(1).collect::<Vec<_>>().join(", ")
    );
    let code = match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    };
    log::info!("Application finished execution");
    code
}

fn load_config(path: Option<&Path>) -> odtblocks::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        config.level_filter()
    };

    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialize logger")
}

fn run(command: Commands, config: &Config) -> odtblocks::Result<()> {
    let mut reporter = LogReporter;

    match command {
        Commands::Json { input, output, yes } => {
            validate_json_args(&input, &output)?;
            if !yes {
                let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
                confirm_overwrite(&output, interactive)?;
            }
            log::info!("Executing JSON action");
            write_inventory_json(&input, &output, &config.export_options(), &mut reporter)?;
        }
        Commands::Replace {
            input,
            old_block,
            new_block,
        } => {
            validate_replace_args(&input, &old_block, &new_block)?;
            log::info!("Executing replace action");
            let summary = replace_in_path(
                &input,
                &old_block,
                &new_block,
                &config.replace_options(),
                &mut reporter,
            )?;
            log::info!(
                "Processed {} document(s): {} replaced, {} unchanged, {} failed",
                summary.total(),
                summary.replaced.len(),
                summary.unchanged.len(),
                summary.failed.len()
            );
        }
    }

    Ok(())
}

/// Asks before overwriting an existing output file.
///
/// Without a terminal there is nobody to ask, so the caller must pass `--yes`.
fn confirm_overwrite(output: &Path, interactive: bool) -> odtblocks::Result<()> {
    if !output.exists() {
        return Ok(());
    }
    if !interactive {
        return Err(Error::Validation(format!(
            "File {} already exists and no terminal is available to confirm overwriting it. \
             Pass --yes to overwrite it.",
            output.display()
        )));
    }

    let overwrite = Confirm::new()
        .with_prompt(format!(
            "File {} already exists. Do you want to overwrite it?",
            output.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

    if overwrite {
        Ok(())
    } else {
        Err(Error::Aborted(
            "Operation aborted by the user. JSON file not overwritten.".to_string(),
        ))
    }
}

fn report_failure(error: &Error) -> ExitCode {
    match error.kind() {
        ErrorKind::Aborted => {
            log::info!("{error}");
            ExitCode::SUCCESS
        }
        ErrorKind::Validation => {
            log::error!("Validation error: {error}");
            ExitCode::from(2)
        }
        ErrorKind::NotFound => {
            log::error!("File not found error: {error}");
            ExitCode::FAILURE
        }
        _ => {
            log::error!("An unexpected error occurred: {error}");
            ExitCode::FAILURE
        }
    }
}
