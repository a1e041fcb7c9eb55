use std::fmt;
use std::path::PathBuf;

/// Accounting for one restore or backup pass.
///
/// Lives only for the launch cycle that produced it; nothing here is
/// persisted.
#[derive(Debug, Default, Clone)]
pub struct MigrationOutcome {
    pub files_moved: usize,
    pub files_skipped_empty: usize,
    /// Per-file failures, in the order they were hit. A failure never aborts
    /// the rest of the pass.
    pub errors: Vec<(PathBuf, String)>,
}

impl MigrationOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn record_error(&mut self, path: &std::path::Path, err: impl fmt::Display) {
        self.errors.push((path.to_path_buf(), err.to_string()));
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} moved, {} empty skipped, {} errors",
            self.files_moved,
            self.files_skipped_empty,
            self.errors.len()
        )
    }
}
