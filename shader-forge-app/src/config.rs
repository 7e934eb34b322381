use crate::error::AppError;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use forge_core::{BuildConfig, SourceFilter};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "shader-forge.toml";

/// Prefix of environment variables overriding settings, e.g. `SHADER_FORGE_JOBS`.
pub const ENV_PREFIX: &str = "SHADER_FORGE_";

/// Global log verbosity.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub const fn as_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command line of the shader forge.
#[derive(Parser, Debug)]
#[command(author, version, about = "Incrementally compile GLSL shaders with an external compiler", long_about = None)]
pub struct CliArgs {
    /// Shader source file, or directory scanned recursively.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving the compiled artifacts.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Path to the compiler executable (default: `glslc` from PATH).
    #[arg(long, value_name = "PATH")]
    pub compiler: Option<PathBuf>,

    /// Settings file (default: ./shader-forge.toml if present).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of units compiled concurrently; 0 uses all CPUs.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Extension of compiled artifacts.
    #[arg(long, value_name = "EXT")]
    pub artifact_ext: Option<String>,

    /// Global log level (RUST_LOG is honoured when this is absent).
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Disable coloured status labels.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Directory to create before building. Repeatable.
    #[arg(long = "prepare-dir", value_name = "DIR")]
    pub prepare_dirs: Vec<PathBuf>,

    /// Report Vulkan runtime and SDK versions before building.
    #[arg(long, default_value_t = false)]
    pub check_toolkit: bool,

    /// Vulkan SDK root used by --check-toolkit.
    #[arg(long, env = "VULKAN_SDK", value_name = "DIR")]
    pub sdk_root: Option<PathBuf>,

    /// `vulkaninfo` executable used by --check-toolkit.
    #[arg(long, value_name = "PATH", default_value = "vulkaninfo")]
    pub vulkaninfo: PathBuf,
}

/// Settings layered from defaults, a TOML file, the environment and the CLI.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ForgeSettings {
    pub compiler: Option<PathBuf>,
    pub compiler_name: String,
    pub compiler_args: Vec<String>,
    pub artifact_extension: String,
    pub vertex_extensions: Vec<String>,
    pub fragment_extensions: Vec<String>,
    pub other_extensions: Vec<String>,
    pub jobs: usize,
    pub log_level: LogLevel,
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            compiler: None,
            compiler_name: "glslc".to_string(),
            compiler_args: Vec::new(),
            artifact_extension: "spv".to_string(),
            vertex_extensions: vec!["vert".to_string()],
            fragment_extensions: vec!["frag".to_string()],
            other_extensions: Vec::new(),
            jobs: 1,
            log_level: LogLevel::default(),
        }
    }
}

// Only the flags actually given on the command line end up in the figment.
#[derive(Serialize, Default)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    compiler: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jobs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<LogLevel>,
}

impl From<&CliArgs> for CliOverrides {
    fn from(args: &CliArgs) -> Self {
        Self {
            compiler: args.compiler.clone(),
            artifact_extension: args.artifact_ext.clone(),
            jobs: args.jobs,
            log_level: args.log_level,
        }
    }
}

impl ForgeSettings {
    /// Builds the figment for `args`: defaults < TOML file < environment < CLI.
    ///
    /// An explicit `--config` file must exist; the default file is optional.
    pub fn figment(args: &CliArgs) -> Figment {
        let file = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(CliOverrides::from(args)))
    }

    /// Extracts the effective settings for `args`.
    pub fn load(args: &CliArgs) -> Result<Self, AppError> {
        if let Some(path) = &args.config {
            let meta = std::fs::metadata(path)
                .with_context(|| format!("cannot read configuration file {}", path.display()))?;
            if !meta.is_file() {
                return Err(AppError::Config(format!(
                    "configuration path {} is not a file",
                    path.display()
                )));
            }
        }
        Ok(Self::figment(args).extract()?)
    }

    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter::new(
            self.vertex_extensions.as_slice(),
            self.fragment_extensions.as_slice(),
            self.other_extensions.as_slice(),
        )
    }

    /// Turns the settings into a build configuration.
    ///
    /// `search_path` is the executable search path to resolve the compiler in.
    pub fn build_config(
        &self,
        input: &Path,
        output_dir: &Path,
        search_path: Option<OsString>,
    ) -> BuildConfig {
        let mut config = BuildConfig::new(input, output_dir)
            .filter(self.source_filter())
            .artifact_extension(self.artifact_extension.clone())
            .jobs(self.jobs);
        config.compiler = self.compiler.clone();
        config.compiler_name = self.compiler_name.clone();
        config.compiler_args = self.compiler_args.clone();
        config.search_path = search_path;
        config
    }
}
