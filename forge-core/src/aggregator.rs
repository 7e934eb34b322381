//! Drives the locate -> map -> check -> compile pipeline over all units.

use crate::invoker::{compile_unit, CompilerBackend, ProcessCompiler};
use crate::locator::{locate, SourceFilter};
use crate::mapper::OutputTarget;
use crate::outcome::{BuildResult, CompileOutcome};
use crate::resolve::resolve_compiler;
use crate::staleness::{self, Freshness};
use crate::unit::ShaderUnit;
use crate::ForgeError;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Receives per-unit outcomes as a run progresses.
pub trait BuildObserver: Sync {
    /// Called once per unit, in discovery order.
    fn on_outcome(&self, outcome: &CompileOutcome);

    /// Called once after every unit has been processed.
    fn on_finish(&self, _result: &BuildResult) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BuildObserver for NullObserver {
    fn on_outcome(&self, _outcome: &CompileOutcome) {}
}

/// Everything a run needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// File or directory to scan for sources.
    pub input: PathBuf,
    /// Directory receiving all artifacts.
    pub output_root: PathBuf,
    /// Explicit compiler path or name; takes precedence over `compiler_name`.
    pub compiler: Option<PathBuf>,
    /// Name looked up on `search_path` when no explicit compiler is given.
    pub compiler_name: String,
    /// Extra compiler arguments placed before the source path.
    pub compiler_args: Vec<String>,
    /// Executable search path (e.g. the value of `PATH`).
    pub search_path: Option<OsString>,
    /// Artifact extension without the dot.
    pub artifact_extension: String,
    /// Recognised source extensions.
    pub filter: SourceFilter,
    /// Worker count; `1` is sequential, `0` lets the pool pick.
    pub jobs: usize,
}

impl BuildConfig {
    /// Defaults: `glslc`, `.spv` artifacts, `.vert`/`.frag` sources, one job.
    pub fn new(input: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_root: output_root.into(),
            compiler: None,
            compiler_name: "glslc".to_string(),
            compiler_args: Vec::new(),
            search_path: None,
            artifact_extension: "spv".to_string(),
            filter: SourceFilter::default(),
            jobs: 1,
        }
    }

    /// Sets an explicit compiler.
    #[must_use]
    pub fn compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = Some(compiler.into());
        self
    }

    /// Sets the executable search path.
    #[must_use]
    pub fn search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Sets the worker count.
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the source filter.
    #[must_use]
    pub fn filter(mut self, filter: SourceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the artifact extension.
    #[must_use]
    pub fn artifact_extension(mut self, ext: impl Into<String>) -> Self {
        self.artifact_extension = ext.into();
        self
    }
}

/// Runs whole builds. Holds no state between runs.
#[derive(Debug, Clone)]
pub struct BuildAggregator {
    config: BuildConfig,
}

impl BuildAggregator {
    /// Creates an aggregator for `config`.
    pub const fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// The configuration of this aggregator.
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Resolves the configured compiler into a runnable backend.
    ///
    /// # Errors
    ///
    /// [`ForgeError::ToolMissing`] if the compiler cannot be found.
    pub fn resolve_compiler(&self) -> Result<ProcessCompiler, ForgeError> {
        let exe = resolve_compiler(
            self.config.compiler.as_deref(),
            &self.config.compiler_name,
            self.config.search_path.as_deref(),
        )?;
        info!("Using compiler {:?}", exe);
        Ok(ProcessCompiler::new(exe).with_args(self.config.compiler_args.iter().cloned()))
    }

    /// Resolves the compiler, then builds every unit with it.
    ///
    /// # Errors
    ///
    /// See [`Self::run_with`]; additionally fails fast with
    /// [`ForgeError::ToolMissing`] before touching the filesystem.
    pub fn run(&self, observer: &dyn BuildObserver) -> Result<BuildResult, ForgeError> {
        let compiler = self.resolve_compiler()?;
        self.run_with(&compiler, observer)
    }

    /// Builds every unit with `backend`.
    ///
    /// Per-unit failures are recorded and never stop the run.
    ///
    /// # Errors
    ///
    /// [`ForgeError::Io`] if the output root cannot be created,
    /// [`ForgeError::NotFound`] / [`ForgeError::NoUnitsFound`] from discovery,
    /// and [`ForgeError::ToolMissing`] if the backend reports it.
    pub fn run_with<B: CompilerBackend + ?Sized>(
        &self,
        backend: &B,
        observer: &dyn BuildObserver,
    ) -> Result<BuildResult, ForgeError> {
        let start = Instant::now();
        let output_root = &self.config.output_root;
        std::fs::create_dir_all(output_root).map_err(|e| ForgeError::Io {
            path: output_root.clone(),
            source: e,
        })?;

        let units = locate(&self.config.input, &self.config.filter)?;
        if units.is_empty() {
            return Err(ForgeError::NoUnitsFound(self.config.input.clone()));
        }
        info!(
            "Found {} shader unit(s) under {:?}",
            units.len(),
            self.config.input
        );

        let targets: Vec<OutputTarget> = units
            .iter()
            .map(|u| OutputTarget::for_unit(u, output_root, &self.config.artifact_extension))
            .collect();

        let collides = has_collisions(&targets);
        let mut result = BuildResult::new();
        if self.config.jobs == 1 || collides {
            for (unit, target) in units.iter().zip(&targets) {
                let outcome = process_unit(backend, unit, target)?;
                observer.on_outcome(&outcome);
                result.record(outcome);
            }
        } else {
            for outcome in self.process_parallel(backend, &units, &targets)? {
                observer.on_outcome(&outcome);
                result.record(outcome);
            }
        }

        info!(
            "Build finished in {:?}: {} compiled, {} up to date, {} failed",
            start.elapsed(),
            result.succeeded(),
            result.skipped(),
            result.failed()
        );
        observer.on_finish(&result);
        Ok(result)
    }

    fn process_parallel<B: CompilerBackend + ?Sized>(
        &self,
        backend: &B,
        units: &[ShaderUnit],
        targets: &[OutputTarget],
    ) -> Result<Vec<CompileOutcome>, ForgeError> {
        let work = || {
            units
                .par_iter()
                .zip(targets.par_iter())
                .map(|(unit, target)| process_unit(backend, unit, target))
                .collect::<Result<Vec<_>, _>>()
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
        {
            Ok(pool) => {
                debug!("Compiling on {} worker(s)", pool.current_num_threads());
                pool.install(work)
            }
            Err(e) => {
                warn!("Could not start worker pool ({}), compiling sequentially", e);
                units
                    .iter()
                    .zip(targets)
                    .map(|(unit, target)| process_unit(backend, unit, target))
                    .collect()
            }
        }
    }
}

fn process_unit<B: CompilerBackend + ?Sized>(
    backend: &B,
    unit: &ShaderUnit,
    target: &OutputTarget,
) -> Result<CompileOutcome, ForgeError> {
    match staleness::check(unit, target) {
        Freshness::Skip => {
            debug!("Up to date: {:?}", unit.source_path());
            Ok(CompileOutcome::up_to_date(unit.source_path(), target.path()))
        }
        Freshness::Recompile => compile_unit(backend, unit, target),
    }
}

// Sources with the same stem and kind in different directories share one
// artifact; those must not be compiled concurrently. Run in order, the first
// one builds the artifact and the later ones see it as current.
fn has_collisions(targets: &[OutputTarget]) -> bool {
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut collides = false;
    for target in targets {
        if !seen.insert(target.path()) {
            warn!(
                "Several sources map to {:?}; only the first in discovery order is compiled, later ones report up to date",
                target.path()
            );
            collides = true;
        }
    }
    collides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{MockCompilerBackend, ProcessOutput};
    use std::fs;
    use std::sync::Mutex;

    fn ok_output() -> ProcessOutput {
        ProcessOutput {
            success: true,
            code: Some(0),
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<CompileOutcome>>);

    impl BuildObserver for Recorder {
        fn on_outcome(&self, outcome: &CompileOutcome) {
            self.0.lock().unwrap().push(outcome.clone());
        }
    }

    #[test]
    fn test_each_unit_invoked_once_in_order() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("b.frag"), "void main() {}").unwrap();
        fs::write(src.path().join("a.vert"), "void main() {}").unwrap();
        fs::write(src.path().join("notes.txt"), "ignore me").unwrap();

        let mut backend = MockCompilerBackend::new();
        backend
            .expect_invoke()
            .times(2)
            .returning(|_, _| Ok(ok_output()));

        let aggregator = BuildAggregator::new(BuildConfig::new(src.path(), out.path()));
        let recorder = Recorder::default();
        let result = aggregator.run_with(&backend, &recorder).unwrap();

        assert_eq!(result.succeeded(), 2);
        let seen = recorder.0.lock().unwrap();
        let names: Vec<_> = seen
            .iter()
            .map(|o| o.output.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_vert.spv", "b_frag.spv"]);
    }

    #[test]
    fn test_failure_does_not_stop_remaining_units() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for name in ["a.frag", "b.frag", "c.frag"] {
            fs::write(src.path().join(name), "").unwrap();
        }

        let mut backend = MockCompilerBackend::new();
        backend.expect_invoke().times(3).returning(|source, _| {
            if source.ends_with("a.frag") {
                Ok(ProcessOutput {
                    success: false,
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "a.frag:1: error: bad token".into(),
                })
            } else {
                Ok(ok_output())
            }
        });

        let aggregator = BuildAggregator::new(BuildConfig::new(src.path(), out.path()));
        let result = aggregator.run_with(&backend, &NullObserver).unwrap();
        assert_eq!(result.failed(), 1);
        assert_eq!(result.succeeded(), 2);
        let failure = result.failures().next().unwrap();
        assert!(failure.source().ends_with("a.frag"));
        assert_eq!(failure.diagnostic(), "a.frag:1: error: bad token");
    }

    #[test]
    fn test_tool_missing_from_backend_aborts_run() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.vert"), "").unwrap();
        fs::write(src.path().join("b.vert"), "").unwrap();

        let mut backend = MockCompilerBackend::new();
        backend.expect_invoke().times(1).returning(|_, _| {
            Err(ForgeError::ToolMissing {
                tool: "glslc".into(),
                reason: "gone".into(),
            })
        });

        let aggregator = BuildAggregator::new(BuildConfig::new(src.path(), out.path()));
        let err = aggregator.run_with(&backend, &NullObserver).unwrap_err();
        assert!(matches!(err, ForgeError::ToolMissing { .. }));
    }

    #[test]
    fn test_no_units_found() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("readme.md"), "").unwrap();

        let mut backend = MockCompilerBackend::new();
        backend.expect_invoke().never();

        let aggregator = BuildAggregator::new(BuildConfig::new(src.path(), out.path()));
        let err = aggregator.run_with(&backend, &NullObserver).unwrap_err();
        assert!(matches!(err, ForgeError::NoUnitsFound(_)));
    }

    #[test]
    fn test_unresolvable_compiler_touches_nothing() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.vert"), "").unwrap();
        let empty_bin = tempfile::tempdir().unwrap();
        let out = src.path().join("out");

        let config = BuildConfig::new(src.path(), &out).search_path(empty_bin.path());
        let err = BuildAggregator::new(config)
            .run(&NullObserver)
            .unwrap_err();
        assert!(matches!(err, ForgeError::ToolMissing { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_parallel_run_keeps_discovery_order() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let names = ["d.vert", "a.frag", "c.vert", "b.frag", "e.frag"];
        for name in names {
            fs::write(src.path().join(name), "").unwrap();
        }

        let mut backend = MockCompilerBackend::new();
        backend
            .expect_invoke()
            .times(names.len())
            .returning(|_, _| Ok(ok_output()));

        let config = BuildConfig::new(src.path(), out.path()).jobs(4);
        let recorder = Recorder::default();
        BuildAggregator::new(config)
            .run_with(&backend, &recorder)
            .unwrap();

        let sources: Vec<_> = recorder
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.source.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(sources, vec!["a.frag", "b.frag", "c.vert", "d.vert", "e.frag"]);
    }

    #[test]
    fn test_collision_detection() {
        let a = ShaderUnit::new("/x/a.vert", crate::ShaderKind::Vertex, std::time::UNIX_EPOCH);
        let b = ShaderUnit::new("/y/a.vert", crate::ShaderKind::Vertex, std::time::UNIX_EPOCH);
        let c = ShaderUnit::new("/y/a.frag", crate::ShaderKind::Fragment, std::time::UNIX_EPOCH);
        let root = Path::new("/out");
        let distinct = [
            OutputTarget::for_unit(&a, root, "spv"),
            OutputTarget::for_unit(&c, root, "spv"),
        ];
        assert!(!has_collisions(&distinct));
        let colliding = [
            OutputTarget::for_unit(&a, root, "spv"),
            OutputTarget::for_unit(&b, root, "spv"),
        ];
        assert!(has_collisions(&colliding));
    }
}
