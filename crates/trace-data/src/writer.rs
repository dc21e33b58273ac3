//! Output placement and file writing for scaled traces.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use trace_core::error::{Result, TraceError};

// ── OutputLayout ──────────────────────────────────────────────────────────────

/// Where the scaled copy of an input file goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Overwrite the input file.
    #[default]
    InPlace,
    /// Write `<root>/<input file name>`. Inputs sharing a file name map to
    /// the same path; the processor keeps the first one written.
    Folder(PathBuf),
}

impl OutputLayout {
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match self {
            OutputLayout::InPlace => input.to_path_buf(),
            OutputLayout::Folder(root) => match input.file_name() {
                Some(name) => root.join(name),
                None => root.join(input),
            },
        }
    }
}

// ── WriteMode ─────────────────────────────────────────────────────────────────

/// How an output file is put on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate the destination and write straight into it. An aborted file
    /// keeps the lines written before the abort.
    #[default]
    Direct,
    /// Write a sibling `<name>.tmp` and rename it over the destination on
    /// commit. An aborted file leaves the destination untouched.
    Atomic,
}

// ── OutputFile ────────────────────────────────────────────────────────────────

/// An output file being written line by line.
///
/// Must be finished with [`OutputFile::commit`] or [`OutputFile::abandon`].
pub struct OutputFile {
    writer: BufWriter<File>,
    destination: PathBuf,
    /// Temporary path being written in atomic mode.
    staging: Option<PathBuf>,
}

impl OutputFile {
    pub fn create(destination: &Path, mode: WriteMode) -> Result<Self> {
        let staging = match mode {
            WriteMode::Direct => None,
            WriteMode::Atomic => Some(staging_path(destination)),
        };
        let target = staging.as_deref().unwrap_or(destination);
        let file = File::create(target).map_err(|source| TraceError::FileWrite {
            path: target.to_path_buf(),
            source,
        })?;

        Ok(Self {
            writer: BufWriter::new(file),
            destination: destination.to_path_buf(),
            staging,
        })
    }

    /// Append one line followed by a newline.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line).map_err(|source| self.write_error(source))
    }

    /// Flush everything and, in atomic mode, move it into place.
    pub fn commit(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|source| self.write_error(source))?;

        let OutputFile {
            writer,
            destination,
            staging,
        } = self;
        drop(writer);

        if let Some(staging) = staging {
            std::fs::rename(&staging, &destination).map_err(|source| TraceError::FileWrite {
                path: destination,
                source,
            })?;
        }
        Ok(())
    }

    /// Stop writing. Direct mode keeps the partial file; atomic mode discards
    /// the staged copy.
    pub fn abandon(mut self) -> Result<()> {
        match self.staging.take() {
            None => self
                .writer
                .flush()
                .map_err(|source| self.write_error(source)),
            Some(staging) => {
                drop(self.writer);
                std::fs::remove_file(&staging).map_err(|source| TraceError::FileWrite {
                    path: staging,
                    source,
                })
            }
        }
    }

    fn write_error(&self, source: std::io::Error) -> TraceError {
        TraceError::FileWrite {
            path: self
                .staging
                .clone()
                .unwrap_or_else(|| self.destination.clone()),
            source,
        }
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name: OsString = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
