use crate::ExitStatus;
use std::path::{Path, PathBuf};

/// What happened to one unit during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitStatus {
    /// The compiler ran and exited with status zero.
    Compiled,
    /// The artifact was current; the compiler was not run.
    UpToDate,
    /// The compiler failed, or the unit could not be prepared.
    Failed {
        /// Captured stderr (or stdout), or the I/O error text.
        diagnostic: String,
    },
}

/// Result of processing one shader unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// Source file of the unit.
    pub source: PathBuf,
    /// Artifact path the unit maps to.
    pub output: PathBuf,
    /// How the unit ended.
    pub status: UnitStatus,
}

impl CompileOutcome {
    /// A successful compilation.
    pub fn compiled(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            status: UnitStatus::Compiled,
        }
    }

    /// A unit skipped by the staleness check.
    pub fn up_to_date(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            status: UnitStatus::UpToDate,
        }
    }

    /// A failed unit with its diagnostic.
    pub fn failed(
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            status: UnitStatus::Failed {
                diagnostic: diagnostic.into(),
            },
        }
    }

    /// True for compiled and up-to-date units.
    pub const fn is_success(&self) -> bool {
        !matches!(self.status, UnitStatus::Failed { .. })
    }

    /// True if the compiler was not run because the artifact was current.
    pub const fn is_skipped(&self) -> bool {
        matches!(self.status, UnitStatus::UpToDate)
    }

    /// Diagnostic text; empty unless the unit failed.
    pub fn diagnostic(&self) -> &str {
        match &self.status {
            UnitStatus::Failed { diagnostic } => diagnostic.as_str(),
            _ => "",
        }
    }

    /// Source file of the unit.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Overall verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No unit failed. Skipped units count as successes.
    AllSucceeded,
    /// At least one unit failed.
    SomeFailed,
}

impl BuildOutcome {
    /// Maps the verdict onto the process exit contract.
    pub const fn exit_status(self) -> ExitStatus {
        match self {
            Self::AllSucceeded => ExitStatus::Success,
            Self::SomeFailed => ExitStatus::CompileFailed,
        }
    }
}

/// Every outcome of one run, in the order units were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    outcomes: Vec<CompileOutcome>,
}

impl BuildResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the outcome of one unit.
    pub fn record(&mut self, outcome: CompileOutcome) {
        self.outcomes.push(outcome);
    }

    /// All outcomes in discovery order.
    pub fn outcomes(&self) -> &[CompileOutcome] {
        &self.outcomes
    }

    /// Number of units the compiler built successfully.
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, UnitStatus::Compiled))
    }

    /// Number of units that failed.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, UnitStatus::Failed { .. }))
    }

    /// Number of units skipped as up to date.
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, UnitStatus::UpToDate))
    }

    /// Number of units accounted for.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Failed units in discovery order.
    pub fn failures(&self) -> impl Iterator<Item = &CompileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// The overall verdict.
    pub fn outcome(&self) -> BuildOutcome {
        if self.failed() == 0 {
            BuildOutcome::AllSucceeded
        } else {
            BuildOutcome::SomeFailed
        }
    }

    fn count(&self, pred: impl Fn(&UnitStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

impl FromIterator<CompileOutcome> for BuildResult {
    fn from_iter<I: IntoIterator<Item = CompileOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}
