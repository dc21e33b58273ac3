mod bootstrap;

use std::process::ExitCode;

use anyhow::Result;
use trace_core::models::RunSummary;
use trace_core::settings::Settings;

/// Exit status when configuration or arguments are unusable.
const EXIT_USAGE: u8 = 2;
/// Exit status when at least one file could not be normalised.
const EXIT_PARTIAL: u8 = 1;

fn main() -> ExitCode {
    match run() {
        Ok(summary) => ExitCode::from(exit_status(&summary)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run() -> Result<RunSummary> {
    let settings = Settings::load()?;
    bootstrap::setup_logging(&settings.log_level)?;
    if let Some(path) = &settings.config {
        tracing::debug!("Loaded config from {}", path.display());
    }

    tracing::info!("normalise-trace v{} starting", env!("CARGO_PKG_VERSION"));

    let processor = bootstrap::build_processor(&settings)?;
    tracing::info!(
        "Columns: {}, delta: {:?}, output: {}",
        processor.config().columns,
        processor.config().delta,
        settings.output.display()
    );

    let summary = processor.process(&settings.output, Some(&settings.paths))?;
    Ok(summary)
}

fn exit_status(summary: &RunSummary) -> u8 {
    if summary.has_failures() {
        EXIT_PARTIAL
    } else {
        0
    }
}
