//! Resolves a user supplied path into the ordered set of shader units.

use crate::unit::{ShaderKind, ShaderUnit};
use crate::ForgeError;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which file extensions are recognised, and as which kind.
///
/// Extensions are matched exactly (case-sensitive) and stored without the
/// leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    vertex: Vec<String>,
    fragment: Vec<String>,
    other: Vec<String>,
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self {
            vertex: vec!["vert".to_string()],
            fragment: vec!["frag".to_string()],
            other: Vec::new(),
        }
    }
}

impl SourceFilter {
    /// Creates a filter from explicit extension lists.
    pub fn new<S: AsRef<str>>(vertex: &[S], fragment: &[S], other: &[S]) -> Self {
        fn normalize<S: AsRef<str>>(exts: &[S]) -> Vec<String> {
            exts.iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect()
        }
        Self {
            vertex: normalize(vertex),
            fragment: normalize(fragment),
            other: normalize(other),
        }
    }

    /// Classifies a path by its final extension, `None` if not recognised.
    ///
    /// Vertex wins over fragment, and fragment over other, if an extension is
    /// listed more than once.
    pub fn classify(&self, path: &Path) -> Option<ShaderKind> {
        // Dotfiles such as ".vert" have no extension, so the stem is never empty.
        let ext = path.extension()?.to_str()?;
        if self.vertex.iter().any(|e| e == ext) {
            Some(ShaderKind::Vertex)
        } else if self.fragment.iter().any(|e| e == ext) {
            Some(ShaderKind::Fragment)
        } else if self.other.iter().any(|e| e == ext) {
            Some(ShaderKind::Other)
        } else {
            None
        }
    }
}

/// Collects the shader units reachable from `input`.
///
/// A file is included only if `filter` recognises it; a directory is walked
/// recursively (following symlinks). The result is deduplicated by canonical
/// path and sorted lexicographically.
///
/// # Errors
///
/// [`ForgeError::NotFound`] if `input` does not exist.
pub fn locate(input: &Path, filter: &SourceFilter) -> Result<Vec<ShaderUnit>, ForgeError> {
    let root = std::fs::canonicalize(input).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ForgeError::NotFound(input.to_path_buf())
        } else {
            ForgeError::Io {
                path: input.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut units: BTreeMap<PathBuf, ShaderUnit> = BTreeMap::new();

    if root.is_file() {
        if let Some(kind) = filter.classify(&root) {
            insert_unit(&mut units, &root, kind);
        }
    } else {
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(kind) = filter.classify(entry.path()) else {
                continue;
            };
            let path = std::fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.into_path());
            insert_unit(&mut units, &path, kind);
        }
    }

    debug!("Located {} shader unit(s) under {:?}", units.len(), root);
    Ok(units.into_values().collect())
}

fn insert_unit(units: &mut BTreeMap<PathBuf, ShaderUnit>, path: &Path, kind: ShaderKind) {
    if units.contains_key(path) {
        return;
    }
    match ShaderUnit::from_path(path.to_path_buf(), kind) {
        Ok(unit) => {
            units.insert(path.to_path_buf(), unit);
        }
        Err(e) => warn!("Could not read metadata for {:?}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_classification() {
        let filter = SourceFilter::default();
        assert_eq!(
            filter.classify(Path::new("a/shader.vert")),
            Some(ShaderKind::Vertex)
        );
        assert_eq!(
            filter.classify(Path::new("shader.frag")),
            Some(ShaderKind::Fragment)
        );
        assert_eq!(filter.classify(Path::new("shader.comp")), None);
        assert_eq!(filter.classify(Path::new("shader.VERT")), None);
        assert_eq!(filter.classify(Path::new("README")), None);
    }

    #[test]
    fn test_only_last_extension_counts() {
        let filter = SourceFilter::default();
        assert_eq!(
            filter.classify(Path::new("shader.glsl.vert")),
            Some(ShaderKind::Vertex)
        );
        assert_eq!(filter.classify(Path::new("shader.vert.bak")), None);
    }

    #[test]
    fn test_custom_filter_with_other_kind() {
        let filter = SourceFilter::new(&["vert", "vs"], &[".frag"], &["comp"]);
        assert_eq!(
            filter.classify(Path::new("x.vs")),
            Some(ShaderKind::Vertex)
        );
        assert_eq!(
            filter.classify(Path::new("x.frag")),
            Some(ShaderKind::Fragment)
        );
        assert_eq!(
            filter.classify(Path::new("x.comp")),
            Some(ShaderKind::Other)
        );
    }
}
