//! Argument parsing and command dispatch for the `baler` binary.

use std::path::PathBuf;

use anyhow::anyhow;
use baler_core::CandidatePath;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::config::Settings;
use crate::logging;

/// Parses CLI arguments, installs logging, and executes the requested
/// command. Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.log_format) {
        let err = CliError::failure(err);
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    match dispatch(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn dispatch(cli: Cli) -> CliResult<()> {
    let settings = Settings::load(&cli.config).map_err(CliError::failure)?;
    if settings.max_depth == 0 {
        return Err(CliError::validation("max_depth must be at least 1"));
    }

    let action = settings
        .into_action(cli.dry_run)
        .map_err(CliError::failure)?;
    if !action.base_path().is_dir() {
        return Err(CliError::validation(format!(
            "base path '{}' is not a directory",
            action.base_path().display()
        )));
    }

    match cli.command {
        Command::Run => {
            action.run().map_err(CliError::failure)?;
            Ok(())
        }
        Command::Plan { json } => {
            let selected = action.select_candidates().map_err(CliError::failure)?;
            render_plan(&selected, json)
        }
    }
}

#[derive(Parser)]
#[command(name = "baler", about = "Archive and purge rotated log files")]
struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "BALER_CONFIG",
        default_value = "baler.toml"
    )]
    config: PathBuf,
    #[arg(
        long,
        global = true,
        help = "Log removals without performing them; the archive is still written"
    )]
    dry_run: bool,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::infer())]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Run,
    Plan {
        #[arg(long, help = "Emit the selection as JSON")]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Debug)]
enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

type CliResult<T> = Result<T, CliError>;

impl CliError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

fn render_plan(selected: &[CandidatePath], json: bool) -> CliResult<()> {
    if json {
        let entries: Vec<_> = selected
            .iter()
            .map(|candidate| {
                json!({
                    "path": candidate.path.display().to_string(),
                    "size": candidate.attributes.size,
                    "modified": candidate.attributes.modified.to_rfc3339(),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
        println!("{text}");
        return Ok(());
    }

    if selected.is_empty() {
        println!("nothing eligible");
        return Ok(());
    }
    println!("{:>12} {:<25} PATH", "SIZE", "MODIFIED");
    for candidate in selected {
        println!(
            "{:>12} {:<25} {}",
            candidate.attributes.size,
            candidate.attributes.modified.to_rfc3339(),
            candidate.path.display()
        );
    }
    Ok(())
}
