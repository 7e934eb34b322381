use forge_core::{ExitStatus, ForgeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Configuration Error: {0}")]
    Settings(#[from] figment::Error),

    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Exit status for a run that ended in this error.
    ///
    /// Anything that is not a build error is a configuration problem.
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Forge(e) => e.exit_status(),
            Self::Config(_) | Self::Settings(_) | Self::Anyhow(_) => ExitStatus::NoUnits,
        }
    }

    /// A hint printed after the error, if there is one worth giving.
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Forge(ForgeError::ToolMissing { .. }) => {
                Some("Install the Vulkan SDK or provide --compiler <path to glslc>")
            }
            Self::Forge(ForgeError::NoUnitsFound(_)) => {
                Some("Shader sources need a recognised extension such as .vert or .frag")
            }
            _ => None,
        }
    }
}
