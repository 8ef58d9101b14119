// crates/bookstore-conformance-cli/src/main.rs
// ============================================================================
// Module: Bookstore Conformance CLI Entry Point
// Description: Command-line runner for the books conformance scenario.
// Purpose: Map the scenario verdict onto the process exit code.
// Dependencies: bookstore-conformance-core, clap, thiserror, tokio
// ============================================================================

//! ## Overview
//! The CLI runs the books scenario once against a configured base URL and
//! exits with the standard test-runner convention: success when every
//! assertion passed, failure otherwise. Artifacts land under a run root that
//! is printed for later inspection.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bookstore_conformance_core::FsReporter;
use bookstore_conformance_core::ScenarioConfig;
use bookstore_conformance_core::run_books_scenario;
use bookstore_conformance_core::scenario::CATEGORY_REGRESSION;
use bookstore_conformance_core::scenario::FEATURE_TAG;
use clap::ArgAction;
use clap::Parser;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Scenario name used for report grouping.
const SCENARIO_NAME: &str = "books";

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "bookstore-conformance",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Base URL of the Book Store service; falls back to `BOOKSTORE_BASE_URL`.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Directory receiving run artifacts; defaults to a timestamped run root.
    #[arg(long, value_name = "PATH")]
    run_root: Option<PathBuf>,
    /// Request timeout override in seconds.
    #[arg(long, value_name = "SECONDS")]
    timeout_sec: Option<u64>,
}

/// CLI error with a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// User-facing message.
    message: String,
}

impl CliError {
    /// Creates a CLI error from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the scenario and maps the verdict onto an exit code.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("bookstore-conformance {version}"))
            .map_err(|err| CliError::new(format!("failed to write to stdout: {err}")))?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = resolve_config(&cli)?;
    let mut reporter =
        FsReporter::new(SCENARIO_NAME, FEATURE_TAG, CATEGORY_REGRESSION, cli.run_root.clone())
            .map_err(|err| CliError::new(err.to_string()))?;
    let run_root = reporter.artifacts().root().display().to_string();

    match run_books_scenario(&config, &mut reporter).await {
        Ok(report) => {
            reporter
                .finish("pass", vec![format!("status code {}", report.status_code)])
                .map_err(|err| CliError::new(err.to_string()))?;
            write_stdout_line(&format!("books scenario passed against {}", report.url))
                .map_err(|err| CliError::new(format!("failed to write to stdout: {err}")))?;
            write_stdout_line(&format!("artifacts: {run_root}"))
                .map_err(|err| CliError::new(format!("failed to write to stdout: {err}")))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let message = err.to_string();
            reporter
                .finish("fail", vec![message.clone()])
                .map_err(|err| CliError::new(err.to_string()))?;
            write_stderr_line(&format!("books scenario failed: {message}"))
                .map_err(|err| CliError::new(format!("failed to write to stderr: {err}")))?;
            write_stderr_line(&format!("artifacts: {run_root}"))
                .map_err(|err| CliError::new(format!("failed to write to stderr: {err}")))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the scenario configuration from flags and environment.
fn resolve_config(cli: &Cli) -> CliResult<ScenarioConfig> {
    let mut config = match &cli.base_url {
        Some(base_url) => ScenarioConfig::new(base_url),
        None => ScenarioConfig::from_env(),
    }
    .map_err(|err| CliError::new(err.to_string()))?;
    if let Some(secs) = cli.timeout_sec {
        if secs == 0 {
            return Err(CliError::new("--timeout-sec must be greater than zero"));
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes an error to stderr and returns a failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
