//! Column scaling for trace rows.
//!
//! Each of the first `columns` values in a row is multiplied by its delta and
//! rounded half-to-even. Values past `columns` are dropped.

use crate::error::{Result, TraceError};

// ── ScaleConfig ───────────────────────────────────────────────────────────────

/// Immutable scaling parameters shared by every file in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleConfig {
    /// Number of leading columns that are scaled and written.
    pub columns: usize,
    /// Per-column multipliers. Must hold at least `columns` values.
    pub delta: Vec<f64>,
}

impl ScaleConfig {
    pub fn new(columns: usize, delta: Vec<f64>) -> Self {
        Self { columns, delta }
    }

    /// Identity scaling for `columns` columns.
    pub fn identity(columns: usize) -> Self {
        Self::new(columns, vec![1.0; columns])
    }

    /// Check that there is a delta for every scaled column.
    pub fn validate(&self) -> Result<()> {
        if self.delta.len() < self.columns {
            return Err(TraceError::Config(format!(
                "delta has {} values but {} columns requested",
                self.delta.len(),
                self.columns
            )));
        }
        Ok(())
    }

    /// Deltas for the scaled columns only.
    pub fn active_delta(&self) -> &[f64] {
        &self.delta[..self.columns.min(self.delta.len())]
    }
}

// ── Row transform ─────────────────────────────────────────────────────────────

/// A row narrower than the configured column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortRow {
    /// Number of values the row actually has.
    pub found: usize,
    /// Number of values the config requires.
    pub required: usize,
}

/// Multiply and round half-to-even, saturating at the `i64` bounds.
pub fn scale_value(delta: f64, value: i64) -> i64 {
    (delta * value as f64).round_ties_even() as i64
}

/// Scale the leading columns of `row`.
///
/// The config is assumed valid; see [`ScaleConfig::validate`].
pub fn scale_row(config: &ScaleConfig, row: &[i64]) -> std::result::Result<Vec<i64>, ShortRow> {
    if row.len() < config.columns {
        return Err(ShortRow {
            found: row.len(),
            required: config.columns,
        });
    }

    Ok(config
        .active_delta()
        .iter()
        .zip(row)
        .map(|(&delta, &value)| scale_value(delta, value))
        .collect())
}

/// Join scaled values into one output line (without the newline).
pub fn format_row(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_matching_lengths() {
        assert!(ScaleConfig::new(2, vec![2.0, 0.5]).validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_extra_deltas() {
        let config = ScaleConfig::new(1, vec![2.0, 0.5, 3.0]);
        assert!(config.validate().is_ok());
        assert_eq!(config.active_delta(), &[2.0]);
    }

    #[test]
    fn test_validate_rejects_short_delta() {
        let err = ScaleConfig::new(3, vec![1.0, 1.0]).validate().unwrap_err();
        assert!(matches!(err, TraceError::Config(_)));
        assert!(err.to_string().contains("2 values but 3 columns"));
    }

    #[test]
    fn test_validate_zero_columns() {
        assert!(ScaleConfig::new(0, Vec::new()).validate().is_ok());
    }

    #[test]
    fn test_scale_row_example() {
        let config = ScaleConfig::new(2, vec![2.0, 0.5]);
        let scaled = scale_row(&config, &[10, 3]).unwrap();
        assert_eq!(scaled, vec![20, 2]);
        assert_eq!(format_row(&scaled), "20,2");
    }

    #[test]
    fn test_scale_row_rounds_half_to_even() {
        let config = ScaleConfig::new(2, vec![2.0, 0.5]);
        // 0.5 * 5 = 2.5 rounds down to the even neighbour.
        assert_eq!(scale_row(&config, &[10, 5]).unwrap(), vec![20, 2]);
        // 0.5 * 7 = 3.5 rounds up to the even neighbour.
        assert_eq!(scale_row(&config, &[10, 7]).unwrap(), vec![20, 4]);
    }

    #[test]
    fn test_scale_value_negative_midpoints() {
        assert_eq!(scale_value(0.5, -3), -2);
        assert_eq!(scale_value(0.5, -5), -2);
        assert_eq!(scale_value(0.5, -7), -4);
    }

    #[test]
    fn test_scale_value_non_midpoint() {
        assert_eq!(scale_value(0.3, 10), 3);
        assert_eq!(scale_value(1.26, 10), 13);
        assert_eq!(scale_value(-1.26, 10), -13);
    }

    #[test]
    fn test_scale_value_saturates() {
        assert_eq!(scale_value(1e300, 10), i64::MAX);
        assert_eq!(scale_value(-1e300, 10), i64::MIN);
    }

    #[test]
    fn test_scale_row_drops_trailing_columns() {
        let config = ScaleConfig::new(2, vec![1.0, 1.0]);
        assert_eq!(scale_row(&config, &[1, 2, 3, 4]).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_identity_reproduces_leading_columns() {
        let config = ScaleConfig::identity(3);
        let row = [7, -4, 123_456, 9];
        assert_eq!(scale_row(&config, &row).unwrap(), vec![7, -4, 123_456]);
    }

    #[test]
    fn test_scale_row_short() {
        let config = ScaleConfig::new(3, vec![1.0, 1.0, 1.0]);
        let err = scale_row(&config, &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            ShortRow {
                found: 2,
                required: 3
            }
        );
    }

    #[test]
    fn test_scale_row_zero_columns() {
        let config = ScaleConfig::new(0, Vec::new());
        assert!(scale_row(&config, &[1, 2]).unwrap().is_empty());
        assert!(scale_row(&config, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&[1, -2, 3]), "1,-2,3");
        assert_eq!(format_row(&[42]), "42");
        assert_eq!(format_row(&[]), "");
    }
}
