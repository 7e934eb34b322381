//! Shader Forge Application Library
//!
//! Command line surface, configuration, logging and console reporting around
//! the `forge-core` build pipeline.

pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod setup;

pub use config::{CliArgs, ForgeSettings};
pub use error::AppError;

use clap::Parser;
use forge_core::{BuildAggregator, ExitStatus};
use log::{error, info};
use report::ConsoleReporter;
use std::process::ExitCode;

/// Parses the process arguments, runs one build and returns its exit code.
pub fn run() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    ExitCode::from(run_with_args(&args).code())
}

/// Runs one build for already parsed arguments.
pub fn run_with_args(args: &CliArgs) -> ExitStatus {
    match execute(args) {
        Ok(status) => status,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e:#}");
            if let Some(hint) = e.hint() {
                eprintln!("{hint}");
            }
            e.exit_status()
        }
    }
}

fn execute(args: &CliArgs) -> Result<ExitStatus, AppError> {
    let settings = ForgeSettings::load(args)?;
    logging::init_logger(settings.log_level, args.log_level.is_some());
    log::debug!("Effective settings: {:?}", settings);

    if args.no_color {
        colored::control::set_override(false);
    }

    setup::prepare_directories(&args.prepare_dirs);
    if args.check_toolkit {
        setup::check_toolkit(args.sdk_root.as_deref(), &args.vulkaninfo);
    }

    let config = settings.build_config(
        &args.input,
        &args.output_dir,
        std::env::var_os("PATH"),
    );
    if config.artifact_extension.trim_start_matches('.').is_empty() {
        return Err(AppError::Config(
            "artifact extension must not be empty".to_string(),
        ));
    }

    let result = BuildAggregator::new(config).run(&ConsoleReporter)?;
    info!("{}", report::summary_line(&result));
    Ok(result.outcome().exit_status())
}
