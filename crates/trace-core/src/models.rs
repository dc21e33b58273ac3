use std::fmt;
use std::ops::AddAssign;

/// A single parsed input line.
pub type TraceRow = Vec<i64>;

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Every row was scaled and written.
    Written,
    /// The reader could not parse the file; nothing was written.
    ReadFailed,
    /// A row was narrower than the column count; output stopped there.
    ShortRow,
    /// The output file could not be written.
    WriteFailed,
}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Per-run tally of file outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub read_failed: usize,
    pub short_row: usize,
    pub write_failed: usize,
    /// Path specifications whose directory or pattern could not be used.
    pub unresolved: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written => self.written += 1,
            FileOutcome::ReadFailed => self.read_failed += 1,
            FileOutcome::ShortRow => self.short_row += 1,
            FileOutcome::WriteFailed => self.write_failed += 1,
        }
    }

    /// Number of files seen, whatever their outcome.
    pub fn files_seen(&self) -> usize {
        self.written + self.read_failed + self.short_row + self.write_failed
    }

    /// `true` when any file or path specification did not go through cleanly.
    pub fn has_failures(&self) -> bool {
        self.read_failed + self.short_row + self.write_failed + self.unresolved > 0
    }
}

impl AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.read_failed += other.read_failed;
        self.short_row += other.short_row;
        self.write_failed += other.write_failed;
        self.unresolved += other.unresolved;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} unreadable, {} with short rows, {} write errors, {} unresolved patterns",
            self.written, self.read_failed, self.short_row, self.write_failed, self.unresolved
        )
    }
}
