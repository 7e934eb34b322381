//! Derives the artifact path for a shader unit.

use crate::unit::ShaderUnit;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The destination artifact of one [`ShaderUnit`].
///
/// All artifacts land directly in the output root; the source hierarchy is not
/// mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    path: PathBuf,
    name: String,
}

impl OutputTarget {
    /// Maps `unit` to its artifact inside `output_root`.
    ///
    /// `artifact_ext` is given without the leading dot, e.g. `"spv"`.
    pub fn for_unit(unit: &ShaderUnit, output_root: &Path, artifact_ext: &str) -> Self {
        let name = output_name(unit, artifact_ext);
        Self {
            path: output_root.join(&name),
            name,
        }
    }

    /// Full path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the artifact, e.g. `shader_vert.spv`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the artifact currently exists as a file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Modification time of the artifact, `None` if it does not exist or
    /// cannot be read.
    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .ok()
            .filter(std::fs::Metadata::is_file)
            .and_then(|m| m.modified().ok())
    }
}

/// `<stem>_vert.<ext>`, `<stem>_frag.<ext>` or `<stem>.<ext>`.
pub fn output_name(unit: &ShaderUnit, artifact_ext: &str) -> String {
    let ext = artifact_ext.trim_start_matches('.');
    format!("{}{}.{}", unit.stem(), unit.kind().output_suffix(), ext)
}
