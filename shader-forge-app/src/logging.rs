//! Logging setup for the application.

use crate::config::LogLevel;
use env_logger::{Builder, Env};

/// Initializes the logger.
///
/// `RUST_LOG` is respected unless `explicit` is set, in which case `level`
/// (from `--log-level`) overrides it. Without either, `level` acts as the
/// default global filter. Logs go to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(level: LogLevel, explicit: bool) {
    let env = Env::default().filter_or("RUST_LOG", level.as_str());
    let mut builder = Builder::from_env(env);

    if explicit {
        builder.filter_level(level.as_filter());
    }

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized with level {:?} (explicit: {})", level, explicit);
    }
}
