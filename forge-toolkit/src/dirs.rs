//! Idempotent creation of asset directories.

use crate::ToolkitError;
use log::{debug, error};
use std::path::{Path, PathBuf};

/// Result of preparing one directory.
#[derive(Debug)]
pub struct DirReport {
    /// The path as requested.
    pub requested: PathBuf,
    /// The resolved absolute path, or why it could not be created.
    pub outcome: Result<PathBuf, ToolkitError>,
}

impl DirReport {
    /// True if the directory exists now.
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Ensures every directory in `dirs` exists, creating parents as needed.
///
/// A failure on one directory does not stop the others.
pub fn prepare_dirs<I, P>(dirs: I) -> Vec<DirReport>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter()
        .map(|dir| prepare_dir(dir.as_ref()))
        .collect()
}

fn prepare_dir(dir: &Path) -> DirReport {
    let outcome = std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::canonicalize(dir))
        .map_err(|source| ToolkitError::Io {
            path: dir.to_path_buf(),
            source,
        });
    match &outcome {
        Ok(resolved) => debug!("Directory ready: {:?}", resolved),
        Err(e) => error!("Error creating {:?}: {}", dir, e),
    }
    DirReport {
        requested: dir.to_path_buf(),
        outcome,
    }
}
