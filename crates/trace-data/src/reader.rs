//! Trace file parsing.
//!
//! [`TraceReader`] is the narrow capability the processor depends on, so other
//! input formats can be plugged in without touching the scaling code.
//! [`DelimitedReader`] handles the usual text traces: one record per line,
//! integers separated by commas, semicolons, tabs or spaces.

use std::io::BufRead;
use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};
use trace_core::error::{Result, TraceError};
use trace_core::models::TraceRow;

/// Separator characters used when none are configured.
pub const DEFAULT_DELIMITERS: &str = ",; \t";

// ── TraceReader ───────────────────────────────────────────────────────────────

/// Parses one trace file into rows of integers.
///
/// An `Err` means the file is unusable and its rows must not be consulted.
pub trait TraceReader {
    fn read_input(&self, path: &Path) -> Result<Vec<TraceRow>>;
}

impl<F> TraceReader for F
where
    F: Fn(&Path) -> Result<Vec<TraceRow>>,
{
    fn read_input(&self, path: &Path) -> Result<Vec<TraceRow>> {
        self(path)
    }
}

// ── DelimitedReader ───────────────────────────────────────────────────────────

/// Line-oriented reader for delimited integer text.
///
/// Blank lines and lines starting with `#` are skipped. Any token that is not
/// an integer fails the whole file.
#[derive(Debug, Clone)]
pub struct DelimitedReader {
    separator: Regex,
}

impl DelimitedReader {
    /// Reader using [`DEFAULT_DELIMITERS`].
    pub fn new() -> Self {
        Self::with_delimiters(DEFAULT_DELIMITERS).expect("regex is valid")
    }

    /// Reader splitting on any run of the characters in `delimiters`.
    pub fn with_delimiters(delimiters: &str) -> Result<Self> {
        if delimiters.is_empty() {
            return Err(TraceError::Config("delimiter set is empty".into()));
        }
        let class: String = delimiters
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let separator = Regex::new(&format!("[{class}]+"))
            .map_err(|e| TraceError::Config(format!("invalid delimiters {delimiters:?}: {e}")))?;
        Ok(Self { separator })
    }

    /// Parse a single line. Returns `Ok(None)` for lines that carry no record.
    fn parse_line(&self, path: &Path, line_no: usize, line: &str) -> Result<Option<TraceRow>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        self.separator
            .split(trimmed)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<i64>().map_err(|_| TraceError::Parse {
                    path: path.to_path_buf(),
                    line: line_no,
                    token: token.to_string(),
                })
            })
            .collect::<Result<TraceRow>>()
            .map(Some)
    }
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceReader for DelimitedReader {
    fn read_input(&self, path: &Path) -> Result<Vec<TraceRow>> {
        let file = std::fs::File::open(path).map_err(|source| {
            warn!("Failed to read file {}: {}", path.display(), source);
            TraceError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let reader = std::io::BufReader::new(file);
        let mut rows: Vec<TraceRow> = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|source| TraceError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

            match self.parse_line(path, index + 1, &line) {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => continue,
                Err(e) => {
                    warn!("{}", e);
                    return Err(e);
                }
            }
        }

        debug!("File {}: {} rows read", path.display(), rows.len());
        Ok(rows)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
