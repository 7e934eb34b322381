use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The pipeline stage a shader source represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    /// Vertex stage (`.vert`).
    Vertex,
    /// Fragment stage (`.frag`).
    Fragment,
    /// A recognised source whose stage is not encoded in its output name.
    Other,
}

impl ShaderKind {
    /// Suffix appended to the stem of the output artifact name.
    pub const fn output_suffix(self) -> &'static str {
        match self {
            Self::Vertex => "_vert",
            Self::Fragment => "_frag",
            Self::Other => "",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One compilable shader source file, captured at discovery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderUnit {
    source_path: PathBuf,
    kind: ShaderKind,
    modified: SystemTime,
}

impl ShaderUnit {
    /// Creates a unit from already known attributes.
    pub fn new(source_path: impl Into<PathBuf>, kind: ShaderKind, modified: SystemTime) -> Self {
        Self {
            source_path: source_path.into(),
            kind,
            modified,
        }
    }

    /// Creates a unit, reading the modification time from the filesystem.
    pub fn from_path(source_path: impl Into<PathBuf>, kind: ShaderKind) -> std::io::Result<Self> {
        let source_path = source_path.into();
        let modified = std::fs::metadata(&source_path)?.modified()?;
        Ok(Self::new(source_path, kind, modified))
    }

    /// Absolute path of the source file.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Stage of the unit.
    pub const fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Source modification time as read at discovery.
    pub const fn modified(&self) -> SystemTime {
        self.modified
    }

    /// File name with exactly one trailing extension removed.
    pub fn stem(&self) -> String {
        self.source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
