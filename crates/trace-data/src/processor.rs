//! Trace normalisation pipeline.
//!
//! [`TraceProcessor`] resolves path specifications, reads each file through a
//! [`TraceReader`], scales every row and writes the result. Files are handled
//! one at a time; a bad file never stops the rest of the batch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use trace_core::error::{Result, TraceError};
use trace_core::models::{FileOutcome, RunSummary, TraceRow};
use trace_core::scaling::{format_row, scale_row, ScaleConfig};

use crate::discovery::PathSpec;
use crate::reader::TraceReader;
use crate::writer::{OutputFile, OutputLayout, WriteMode};

// ── TraceProcessor ────────────────────────────────────────────────────────────

/// Applies one [`ScaleConfig`] to a set of trace files.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use trace_core::ScaleConfig;
/// use trace_data::processor::TraceProcessor;
/// use trace_data::reader::DelimitedReader;
///
/// let processor = TraceProcessor::new(DelimitedReader::new(), ScaleConfig::new(2, vec![2.0, 0.5]));
/// let summary = processor.process(Path::new("output"), Some(["runs/*.trace"]))?;
/// println!("{summary}");
/// # Ok::<(), trace_core::TraceError>(())
/// ```
pub struct TraceProcessor<R> {
    reader: R,
    config: ScaleConfig,
    layout: OutputLayout,
    mode: WriteMode,
}

impl<R: TraceReader> TraceProcessor<R> {
    /// Processor that overwrites inputs in place with direct writes.
    pub fn new(reader: R, config: ScaleConfig) -> Self {
        Self {
            reader,
            config,
            layout: OutputLayout::default(),
            mode: WriteMode::default(),
        }
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// Process every path specification in order.
    ///
    /// A delta vector shorter than the column count aborts the call before any
    /// file is touched. `None` specifications are an
    /// [`TraceError::InvalidArgument`]. Everything else is isolated per file
    /// and tallied in the returned [`RunSummary`].
    pub fn process<I, S>(
        &self,
        output_folder: &Path,
        path_specifications: Option<I>,
    ) -> Result<RunSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_config()?;

        info!("Reading trace files:");
        let specs = path_specifications.ok_or(TraceError::InvalidArgument("path_specifications"))?;

        ensure_dir(output_folder)?;
        self.prepare_layout()?;

        let mut claimed = ClaimedOutputs::new();
        let mut summary = RunSummary::default();
        for spec in specs {
            let spec = spec.as_ref();
            match PathSpec::parse(spec) {
                PathSpec::File(path) => summary.record(self.process_file(&path, &mut claimed)),
                pattern => match pattern.resolve() {
                    Ok(files) => {
                        for file in &files {
                            summary.record(self.process_file(file, &mut claimed));
                        }
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", spec, e);
                        summary.unresolved += 1;
                    }
                },
            }
        }

        info!("Finished {} files: {}", summary.files_seen(), summary);
        Ok(summary)
    }

    /// Process an explicit list of files. Unreadable files are skipped.
    pub fn read_files<I, P>(&self, files: Option<I>) -> Result<RunSummary>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let files = files.ok_or(TraceError::InvalidArgument("files"))?;
        self.check_config()?;
        self.prepare_layout()?;

        let mut claimed = ClaimedOutputs::new();
        let mut summary = RunSummary::default();
        for file in files {
            summary.record(self.process_file(file.as_ref(), &mut claimed));
        }
        Ok(summary)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn check_config(&self) -> Result<()> {
        self.config.validate().map_err(|e| {
            error!(
                "Invalid. Delta columns = {} and options.columns = {}. Cannot continue.",
                self.config.delta.len(),
                self.config.columns
            );
            e
        })
    }

    fn prepare_layout(&self) -> Result<()> {
        match &self.layout {
            OutputLayout::InPlace => Ok(()),
            OutputLayout::Folder(root) => ensure_dir(root),
        }
    }

    fn process_file(&self, path: &Path, claimed: &mut ClaimedOutputs) -> FileOutcome {
        let rows = match self.reader.read_input(path) {
            Ok(rows) => rows,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                return FileOutcome::ReadFailed;
            }
        };

        match self.write_trace_output(path, &rows, claimed) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}", e);
                FileOutcome::WriteFailed
            }
        }
    }

    /// Scale `rows` and write them to the output path for `input`.
    ///
    /// Stops at the first row narrower than the column count; rows before it
    /// remain in a direct-mode output. In the folder layout, an output path
    /// already produced from a different input in this run is not overwritten.
    fn write_trace_output(
        &self,
        input: &Path,
        rows: &[TraceRow],
        claimed: &mut ClaimedOutputs,
    ) -> Result<FileOutcome> {
        let output_path = self.layout.output_path(input);

        if matches!(self.layout, OutputLayout::Folder(_)) {
            let owner = claimed
                .entry(output_path.clone())
                .or_insert_with(|| input.to_path_buf());
            if owner.as_path() != input {
                warn!(
                    "Not writing {}: {} was already written from {}",
                    input.display(),
                    output_path.display(),
                    owner.display()
                );
                return Ok(FileOutcome::WriteFailed);
            }
        }

        info!("Writing: {}", output_path.display());

        let mut output = OutputFile::create(&output_path, self.mode)?;
        for (index, row) in rows.iter().enumerate() {
            let scaled = match scale_row(&self.config, row) {
                Ok(values) => values,
                Err(short) => {
                    warn!(
                        "Invalid. File columns = {} and options.columns = {} at row {} of {}. Skipping file.",
                        short.found,
                        short.required,
                        index + 1,
                        input.display()
                    );
                    output.abandon()?;
                    return Ok(FileOutcome::ShortRow);
                }
            };

            if let Err(e) = output.write_line(&format_row(&scaled)) {
                if let Err(cleanup) = output.abandon() {
                    debug!("Cleanup after failed write: {}", cleanup);
                }
                return Err(e);
            }
        }

        output.commit()?;
        Ok(FileOutcome::Written)
    }
}

/// Output paths written during one call, mapped to the input that produced them.
type ClaimedOutputs = HashMap<PathBuf, PathBuf>;

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|source| TraceError::FileWrite {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
