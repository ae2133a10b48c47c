mod report;


use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use canvas::backup::{BackupError, backup_file_name};
use canvas::engine::{Engine, EngineCore};
use canvas::view::{CanvasView, ViewSink};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::report::{StepLine, Summary};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error("failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "orgboard", about = "Inspect, replay and create org canvas backups")]
struct Cli {
    /// Tracing filter directive; falls back to RUST_LOG, then "info".
    #[arg(long, global = true, env = "ORGBOARD_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a backup and print a summary of it.
    Inspect {
        file: PathBuf,
        /// Print the summary as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Play a backup's recorded history steps in order.
    Present { file: PathBuf },
    /// Write a fresh backup with the starter library.
    Init {
        #[arg(long, env = "ORGBOARD_ORG_NAME", default_value = "Untitled Organization")]
        org_name: String,
        /// Output path; defaults to a name derived from the organization.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "orgboard failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Inspect { file, json } => {
            println!("{}", inspect(&file, json)?);
        }
        Command::Present { file } => {
            let lines = present(&file)?;
            if lines.is_empty() {
                println!("no history steps recorded");
            }
            for line in lines {
                println!("{line}");
            }
        }
        Command::Init { org_name, out } => {
            let path = init(&org_name, out)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<EngineCore, CliError> {
    let text = read(path)?;
    let mut core = EngineCore::new();
    core.restore_backup(&text)?;
    Ok(core)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn inspect(path: &Path, json: bool) -> Result<String, CliError> {
    let summary = Summary::of(&load(path)?);
    if json {
        return Ok(serde_json::to_string_pretty(&summary)?);
    }
    Ok(summary.to_string())
}

/// Sink that keeps one line per view rendered while presenting.
struct StepRecorder {
    lines: Rc<RefCell<Vec<StepLine>>>,
}

impl ViewSink for StepRecorder {
    fn present(&mut self, view: &CanvasView) {
        if view.presenting && view.step_count > 0 {
            self.lines.borrow_mut().push(StepLine::of(view));
        }
    }
}

fn present(path: &Path) -> Result<Vec<StepLine>, CliError> {
    let text = read(path)?;
    let lines = Rc::new(RefCell::new(Vec::new()));
    let mut engine = Engine::new(Box::new(StepRecorder { lines: Rc::clone(&lines) }));
    engine.restore_backup(&text)?;

    engine.apply(EngineCore::enter_present);
    while !engine.apply(EngineCore::next_step).is_empty() {}
    engine.apply(EngineCore::exit_present);

    Ok(lines.take())
}

fn init(org_name: &str, out: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let mut core = EngineCore::new();
    core.set_org_name(org_name);
    let json = core.backup_json()?;
    let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(org_name)));
    fs::write(&path, json).map_err(|source| CliError::Write { path: path.clone(), source })?;
    tracing::info!(path = %path.display(), org = org_name, "backup initialized");
    Ok(path)
}
