//! Runs the external shader compiler for a single unit.

use crate::mapper::OutputTarget;
use crate::outcome::CompileOutcome;
use crate::unit::ShaderUnit;
use crate::ForgeError;
use log::{debug, trace};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one compiler process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// True if the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output, trimmed.
    pub stdout: String,
    /// Captured standard error, trimmed.
    pub stderr: String,
}

impl ProcessOutput {
    /// Diagnostic text of a failed run: stderr, falling back to stdout.
    pub fn diagnostic(&self) -> String {
        if !self.stderr.is_empty() {
            self.stderr.clone()
        } else if !self.stdout.is_empty() {
            self.stdout.clone()
        } else {
            match self.code {
                Some(code) => format!("compiler exited with status {code}"),
                None => "compiler terminated by signal".to_string(),
            }
        }
    }
}

/// Anything that can turn a source file into an artifact.
///
/// Implementors must be shareable across the worker pool.
#[cfg_attr(test, mockall::automock)]
pub trait CompilerBackend: Send + Sync {
    /// Compiles `source` into `dest`, blocking until done.
    ///
    /// # Errors
    ///
    /// [`ForgeError::ToolMissing`] if the compiler cannot be launched at all;
    /// any other error is treated as a failure of this unit only.
    fn invoke(&self, source: &Path, dest: &Path) -> Result<ProcessOutput, ForgeError>;
}

/// Runs a real compiler executable as `<exe> <args..> <source> -o <dest>`.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    executable: PathBuf,
    args: Vec<String>,
}

impl ProcessCompiler {
    /// Uses `executable` with no extra arguments.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    /// Adds arguments placed before the source path.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Path of the compiler executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl CompilerBackend for ProcessCompiler {
    fn invoke(&self, source: &Path, dest: &Path) -> Result<ProcessOutput, ForgeError> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args).arg(source).arg("-o").arg(dest);
        trace!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => ForgeError::ToolMissing {
                tool: self.executable.display().to_string(),
                reason: e.to_string(),
            },
            _ => ForgeError::Io {
                path: self.executable.clone(),
                source: e,
            },
        })?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Compiles one unit into its target.
///
/// The destination directory is created first. Preparation and process I/O
/// errors become a failed outcome for this unit.
///
/// # Errors
///
/// Only [`ForgeError::ToolMissing`], which means no unit can succeed.
pub fn compile_unit<B: CompilerBackend + ?Sized>(
    backend: &B,
    unit: &ShaderUnit,
    target: &OutputTarget,
) -> Result<CompileOutcome, ForgeError> {
    let source = unit.source_path();
    let dest = target.path();

    if let Some(parent) = dest.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return Ok(CompileOutcome::failed(
                source,
                dest,
                format!("cannot create output directory {}: {e}", parent.display()),
            ));
        }
    }

    match backend.invoke(source, dest) {
        Ok(output) if output.success => {
            debug!("Compiled {:?} -> {:?}", source, dest);
            Ok(CompileOutcome::compiled(source, dest))
        }
        Ok(output) => {
            debug!("Compiler failed for {:?} (code {:?})", source, output.code);
            Ok(CompileOutcome::failed(source, dest, output.diagnostic()))
        }
        Err(e @ ForgeError::ToolMissing { .. }) => Err(e),
        Err(e) => Ok(CompileOutcome::failed(source, dest, e.to_string())),
    }
}
