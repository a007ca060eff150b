//! dedupe - find and resolve duplicate files in a folder
//!
//! Every regular, non-hidden file directly inside a folder is fingerprinted
//! with a content digest (MD5 by default). Files sharing a fingerprint form a
//! duplicate group; the first-discovered member is kept and the others are
//! moved into `<folder>/duplicates/` or deleted.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DedupeConfig, Deduplicator, RunSummary};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code for a completed run. Runs that stop on an error
/// return `Err`; the caller maps it with [`ExitCode::for_error`].
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the folder cannot be
/// read, or a file fails while `--keep-going` is off.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbosity(), cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = cli.apply_to(Config::load(cli.config.as_deref())?)?;
    log::debug!("Effective configuration: {config:?}");

    let handler = signal::install_handler().context("failed to set up Ctrl+C handling")?;
    let progress = Arc::new(Progress::new(!cli.show_progress()));

    let dedupe_config = DedupeConfig::from(&config)
        .with_dry_run(cli.dry_run)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);

    let summary = Deduplicator::new(dedupe_config).run(&cli.folder)?;
    let exit_code = exit_code_for(&summary);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Json => JsonOutput::new(&summary, exit_code).write_to(&mut out, true)?,
        OutputFormat::Text if cli.quiet => {}
        OutputFormat::Text => TextOutput::new(&summary, cli.verbosity() > 0).write_to(&mut out)?,
    }
    out.flush()?;

    Ok(exit_code)
}

/// Exit code for a run that completed.
#[must_use]
pub fn exit_code_for(summary: &RunSummary) -> ExitCode {
    if summary.interrupted {
        ExitCode::Interrupted
    } else if summary.is_partial() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}
