//! Resolution of path specifications into concrete trace files.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use trace_core::error::{Result, TraceError};

// ── PathSpec ──────────────────────────────────────────────────────────────────

/// A caller-supplied input: one existing file, or a directory plus a glob
/// pattern matched against the file names directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    File(PathBuf),
    Pattern { dir: PathBuf, pattern: String },
}

impl PathSpec {
    /// Classify `spec`. Anything that is not an existing file is split into its
    /// parent directory (`.` when there is none) and its last component.
    pub fn parse(spec: &str) -> Self {
        let path = Path::new(spec);
        if path.is_file() {
            return PathSpec::File(path.to_path_buf());
        }

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let pattern = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        PathSpec::Pattern { dir, pattern }
    }

    /// Expand into the files to process.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        match self {
            PathSpec::File(path) => Ok(vec![path.clone()]),
            PathSpec::Pattern { dir, pattern } => find_matching_files(dir, pattern),
        }
    }
}

/// Regular files directly inside `dir` whose names match `pattern`, sorted.
pub fn find_matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!("Directory does not exist: {}", dir.display());
        return Err(TraceError::DirectoryNotFound(dir.to_path_buf()));
    }

    let matcher = glob::Pattern::new(pattern).map_err(|e| TraceError::Pattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })?;

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| matcher.matches(name))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!(
        "Pattern {} in {}: {} files",
        pattern,
        dir.display(),
        files.len()
    );
    Ok(files)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "1,2\n").unwrap();
        path
    }

    fn names(files: &[PathBuf]) -> Vec<&str> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect()
    }

    #[test]
    fn test_parse_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "a.trace");

        let spec = PathSpec::parse(path.to_str().unwrap());
        assert_eq!(spec, PathSpec::File(path.clone()));
        assert_eq!(spec.resolve().unwrap(), vec![path]);
    }

    #[test]
    fn test_parse_pattern() {
        let dir = TempDir::new().unwrap();
        let spec_str = dir.path().join("*.trace");

        let spec = PathSpec::parse(spec_str.to_str().unwrap());
        assert_eq!(
            spec,
            PathSpec::Pattern {
                dir: dir.path().to_path_buf(),
                pattern: "*.trace".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_bare_pattern_uses_current_dir() {
        let spec = PathSpec::parse("*.trace");
        assert_eq!(
            spec,
            PathSpec::Pattern {
                dir: PathBuf::from("."),
                pattern: "*.trace".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_pattern_filters_by_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.trace");
        touch(dir.path(), "a.trace");
        touch(dir.path(), "c.log");

        let spec = PathSpec::parse(dir.path().join("*.trace").to_str().unwrap());
        let files = spec.resolve().unwrap();
        assert_eq!(names(&files), vec!["a.trace", "b.trace"]);
    }

    #[test]
    fn test_resolve_pattern_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir_all(&sub).unwrap();
        touch(dir.path(), "top.trace");
        touch(&sub, "deep.trace");

        let files = find_matching_files(dir.path(), "*.trace").unwrap();
        assert_eq!(names(&files), vec!["top.trace"]);
    }

    #[test]
    fn test_resolve_pattern_skips_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("folder.trace")).unwrap();
        touch(dir.path(), "file.trace");

        let files = find_matching_files(dir.path(), "*.trace").unwrap();
        assert_eq!(names(&files), vec!["file.trace"]);
    }

    #[test]
    fn test_resolve_pattern_no_matches() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "c.log");

        assert!(find_matching_files(dir.path(), "*.trace").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_literal_missing_file_matches_nothing() {
        let dir = TempDir::new().unwrap();
        let spec = PathSpec::parse(dir.path().join("absent.trace").to_str().unwrap());
        assert!(spec.resolve().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_missing_directory() {
        let dir = TempDir::new().unwrap();
        let spec = PathSpec::parse(dir.path().join("nope").join("*.trace").to_str().unwrap());

        let err = spec.resolve().unwrap_err();
        assert!(matches!(err, TraceError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_resolve_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let err = find_matching_files(dir.path(), "[").unwrap_err();
        assert!(matches!(err, TraceError::Pattern { .. }));
    }

    #[test]
    fn test_resolve_question_mark_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "run1.trace");
        touch(dir.path(), "run2.trace");
        touch(dir.path(), "run10.trace");

        let files = find_matching_files(dir.path(), "run?.trace").unwrap();
        assert_eq!(names(&files), vec!["run1.trace", "run2.trace"]);
    }
}
