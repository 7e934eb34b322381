//! Core library for incremental shader compilation.
//! Discovers shader sources, decides which ones are stale, drives the external
//! compiler for each of them and aggregates the per-unit outcomes.

use std::path::PathBuf;
use thiserror::Error;

/// Build orchestration across all discovered units.
pub mod aggregator;
/// External compiler invocation and the subprocess seam.
pub mod invoker;
/// Source discovery and filtering.
pub mod locator;
/// Output artifact naming.
pub mod mapper;
/// Per-unit and whole-build result types.
pub mod outcome;
/// Compiler executable resolution.
pub mod resolve;
/// Timestamp based build avoidance.
pub mod staleness;
/// Shader unit types.
pub mod unit;

// Re-export core public items

/// Drives a full build run.
pub use crate::aggregator::{BuildAggregator, BuildConfig, BuildObserver};
/// The subprocess seam and its real implementation.
pub use crate::invoker::{CompilerBackend, ProcessCompiler, ProcessOutput};
/// Resolves input paths into shader units.
pub use crate::locator::{locate, SourceFilter};
/// The output artifact of a unit.
pub use crate::mapper::OutputTarget;
/// Outcome types.
pub use crate::outcome::{BuildOutcome, BuildResult, CompileOutcome, UnitStatus};
/// The build avoidance decision.
pub use crate::staleness::Freshness;
/// Shader unit types.
pub use crate::unit::{ShaderKind, ShaderUnit};

/// Errors that prevent a build from doing any useful work.
///
/// Per-unit compile failures are not errors; they are recorded in
/// [`BuildResult`] instead.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// The input path does not exist.
    #[error("Input path not found: {0}")]
    NotFound(PathBuf),
    /// The external compiler could not be located or launched.
    #[error("Compiler '{tool}' not available: {reason}")]
    ToolMissing {
        /// Name or path of the compiler that was looked for.
        tool: String,
        /// Why it could not be used.
        reason: String,
    },
    /// The input contained no recognised shader sources.
    #[error("No shader sources found under {0}")]
    NoUnitsFound(PathBuf),
    /// An I/O error outside of any single unit (e.g. creating the output root).
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path the operation was acting on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ForgeError {
    /// Maps the error onto the process exit contract.
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::ToolMissing { .. } => ExitStatus::ToolMissing,
            Self::NotFound(_) | Self::NoUnitsFound(_) | Self::Io { .. } => ExitStatus::NoUnits,
        }
    }
}

/// Process exit statuses of a build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// Every unit compiled or was up to date.
    Success,
    /// No units were discovered (or the build was misconfigured).
    NoUnits,
    /// The compiler executable could not be resolved.
    ToolMissing,
    /// At least one unit failed to compile.
    CompileFailed,
}

impl ExitStatus {
    /// Numeric process exit code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NoUnits => 1,
            Self::ToolMissing => 2,
            Self::CompileFailed => 3,
        }
    }
}
