use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trace_core::settings::Settings;
use trace_data::processor::TraceProcessor;
use trace_data::reader::DelimitedReader;
use trace_data::writer::{OutputLayout, WriteMode};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a `tracing` filter directive.
///
/// Unknown names are passed through so `RUST_LOG`-style directives such as
/// `trace_data=debug` also work.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber on stderr.
///
/// Falls back to `"info"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Processor bootstrap ────────────────────────────────────────────────────────

/// Build the processor described by `settings`.
pub fn build_processor(settings: &Settings) -> anyhow::Result<TraceProcessor<DelimitedReader>> {
    let config = settings.scale_config()?;

    let reader = match settings.delimiters.as_deref() {
        Some(delimiters) => DelimitedReader::with_delimiters(delimiters)
            .with_context(|| format!("invalid --delimiters {delimiters:?}"))?,
        None => DelimitedReader::new(),
    };

    let layout = if settings.output_to_folder {
        OutputLayout::Folder(settings.output.clone())
    } else {
        OutputLayout::InPlace
    };
    let mode = if settings.atomic {
        WriteMode::Atomic
    } else {
        WriteMode::Direct
    };

    Ok(TraceProcessor::new(reader, config)
        .with_layout(layout)
        .with_write_mode(mode))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_filter_directive_maps_level_names() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("INFO"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("error"), "error");
        assert_eq!(filter_directive("trace_data=debug"), "trace_data=debug");
    }

    #[test]
    fn test_build_processor_requires_columns() {
        let settings = Settings::parse_from(["normalise-trace", "-d", "1.0", "a.trace"]);
        assert!(build_processor(&settings).is_err());
    }

    #[test]
    fn test_build_processor_rejects_empty_delimiters() {
        let settings = Settings::parse_from([
            "normalise-trace",
            "-c",
            "1",
            "-d",
            "1.0",
            "--delimiters",
            "",
            "a.trace",
        ]);
        let err = build_processor(&settings).err().unwrap();
        assert!(err.to_string().contains("invalid --delimiters"));
    }

    #[test]
    fn test_build_processor_output_to_folder() {
        let tmp = TempDir::new().expect("tempdir");
        let input = tmp.path().join("a.trace");
        std::fs::write(&input, "3|4\n").expect("write input");
        let out = tmp.path().join("scaled");

        let settings = Settings::parse_from([
            "normalise-trace",
            "-c",
            "2",
            "-d",
            "2,3",
            "--delimiters",
            "|",
            "--output-to-folder",
            "-o",
            out.to_str().unwrap(),
            input.to_str().unwrap(),
        ]);
        let processor = build_processor(&settings).expect("processor");
        assert_eq!(processor.config().columns, 2);

        let summary = processor
            .process(&settings.output, Some(&settings.paths))
            .expect("process");

        assert_eq!(summary.written, 1);
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "3|4\n");
        assert_eq!(
            std::fs::read_to_string(out.join("a.trace")).unwrap(),
            "6,12\n"
        );
    }
}
