use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TraceError};
use crate::scaling::ScaleConfig;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Rescale the leading integer columns of trace files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "normalise-trace",
    about = "Rescale the leading integer columns of trace files",
    version
)]
pub struct Settings {
    /// Trace files, or directory/glob patterns such as `runs/*.trace`
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Number of leading columns to scale and keep
    #[arg(short, long)]
    pub columns: Option<usize>,

    /// Per-column multipliers, comma separated or repeated
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub delta: Vec<f64>,

    /// Output folder (created if missing)
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Write results into the output folder instead of over the inputs
    #[arg(long)]
    pub output_to_folder: bool,

    /// Write each file to a temporary sibling and rename it into place
    #[arg(long)]
    pub atomic: bool,

    /// Characters separating values in input lines (default: comma, semicolon, space, tab)
    #[arg(long)]
    pub delimiters: Option<String>,

    /// JSON file providing columns, delta and output options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── FileConfig ─────────────────────────────────────────────────────────────────

/// Options that may be supplied through `--config <file>.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_to_folder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atomic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiters: Option<String>,
}

impl FileConfig {
    /// Load a config file. A missing or malformed file is an error, since the
    /// caller asked for it explicitly.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| TraceError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and merge the `--config` file, if any.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        // Raw matches are needed to query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if let Some(path) = settings.config.clone() {
            let file = FileConfig::load_from(&path)?;
            settings.merge_file_config(file, &matches);
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Fill every option not given on the command line from `file`.
    fn merge_file_config(&mut self, file: FileConfig, matches: &clap::ArgMatches) {
        // clap stores the arg id using the field name, not the flag spelling.
        if !is_arg_explicitly_set(matches, "columns") {
            if let Some(v) = file.columns {
                self.columns = Some(v);
            }
        }
        if !is_arg_explicitly_set(matches, "delta") {
            if let Some(v) = file.delta {
                self.delta = v;
            }
        }
        if !is_arg_explicitly_set(matches, "output") {
            if let Some(v) = file.output {
                self.output = v;
            }
        }
        if !is_arg_explicitly_set(matches, "output_to_folder") {
            if let Some(v) = file.output_to_folder {
                self.output_to_folder = v;
            }
        }
        if !is_arg_explicitly_set(matches, "atomic") {
            if let Some(v) = file.atomic {
                self.atomic = v;
            }
        }
        if !is_arg_explicitly_set(matches, "delimiters") {
            if let Some(v) = file.delimiters {
                self.delimiters = Some(v);
            }
        }
    }

    /// Build the scaling parameters.
    ///
    /// Only checks that a column count was given; the delta length is checked
    /// by the processor before it touches any file.
    pub fn scale_config(&self) -> Result<ScaleConfig> {
        let columns = self.columns.ok_or_else(|| {
            TraceError::Config("column count not set (use --columns or the config file)".into())
        })?;
        Ok(ScaleConfig::new(columns, self.delta.clone()))
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
