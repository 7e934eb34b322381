//! Host toolkit helpers used around a shader build.
//!
//! Directory preparation and graphics toolkit presence checks. Nothing here
//! installs or downloads anything.

use std::path::PathBuf;
use thiserror::Error;

pub mod dirs;
pub mod presence;
pub mod version;

pub use dirs::{prepare_dirs, DirReport};
pub use presence::{
    PresenceChecker, RuntimeProbe, RuntimeStatus, SdkStatus, ToolkitReport, VulkanInfoProbe,
};
pub use version::{parse_instance_version, parse_sdk_version, MIN_VERSION};

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Invalid version string '{0}'")]
    VersionParse(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
