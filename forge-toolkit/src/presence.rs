//! Reports whether a compatible graphics toolkit is present on the host.
//!
//! Two independent checks: the Vulkan runtime (via `vulkaninfo`) and the SDK
//! rooted at an explicitly supplied directory (normally `$VULKAN_SDK`).

use crate::version::{parse_instance_version, parse_sdk_version, MIN_VERSION};
use log::{debug, warn};
use semver::Version;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source of the runtime's self-description.
pub trait RuntimeProbe {
    /// Raw `vulkaninfo` style output, `None` if the runtime is unavailable.
    fn query(&self) -> Option<String>;
}

/// Runs the `vulkaninfo` executable.
#[derive(Debug, Clone)]
pub struct VulkanInfoProbe {
    executable: PathBuf,
}

impl VulkanInfoProbe {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for VulkanInfoProbe {
    fn default() -> Self {
        Self::new("vulkaninfo")
    }
}

impl RuntimeProbe for VulkanInfoProbe {
    fn query(&self) -> Option<String> {
        match Command::new(&self.executable).output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                debug!("{:?} exited with {}", self.executable, output.status);
                None
            }
            Err(e) => {
                debug!("Could not run {:?}: {}", self.executable, e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeStatus {
    NotFound,
    Unparseable,
    TooOld(Version),
    Supported(Version),
}

impl RuntimeStatus {
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Vulkan not found on this system"),
            Self::Unparseable => write!(f, "couldn't detect Vulkan version"),
            Self::TooOld(v) => write!(f, "Vulkan {v} detected, version too low"),
            Self::Supported(v) => write!(f, "Vulkan {v} detected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkStatus {
    /// No SDK root was supplied.
    NotConfigured,
    /// The root has no `VERSION.txt`.
    NotInstalled,
    /// `VERSION.txt` could not be read or parsed.
    Invalid(String),
    Outdated(Version),
    UpToDate(Version),
}

impl SdkStatus {
    pub const fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate(_))
    }
}

impl fmt::Display for SdkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Vulkan SDK root not set"),
            Self::NotInstalled => write!(f, "Vulkan SDK not properly installed"),
            Self::Invalid(reason) => write!(f, "Vulkan SDK version unreadable: {reason}"),
            Self::Outdated(v) => write!(f, "Vulkan SDK {v} is outdated"),
            Self::UpToDate(v) => write!(f, "Vulkan SDK {v} is up to date"),
        }
    }
}

/// Outcome of both checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitReport {
    pub runtime: RuntimeStatus,
    pub sdk: SdkStatus,
}

impl ToolkitReport {
    /// True if both the runtime and the SDK meet the minimum version.
    pub const fn is_ready(&self) -> bool {
        self.runtime.is_supported() && self.sdk.is_up_to_date()
    }
}

/// Checks runtime and SDK against a minimum version.
pub struct PresenceChecker {
    minimum: Version,
    sdk_root: Option<PathBuf>,
    probe: Box<dyn RuntimeProbe>,
}

impl PresenceChecker {
    /// Checks against [`MIN_VERSION`] using `vulkaninfo` from the search path.
    pub fn new(sdk_root: Option<PathBuf>) -> Self {
        Self {
            minimum: MIN_VERSION,
            sdk_root,
            probe: Box::new(VulkanInfoProbe::default()),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: impl RuntimeProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    #[must_use]
    pub fn with_minimum(mut self, minimum: Version) -> Self {
        self.minimum = minimum;
        self
    }

    pub fn check_runtime(&self) -> RuntimeStatus {
        let Some(output) = self.probe.query() else {
            return RuntimeStatus::NotFound;
        };
        match parse_instance_version(&output) {
            None => RuntimeStatus::Unparseable,
            Some(v) if v >= self.minimum => RuntimeStatus::Supported(v),
            Some(v) => RuntimeStatus::TooOld(v),
        }
    }

    pub fn check_sdk(&self) -> SdkStatus {
        self.sdk_root
            .as_deref()
            .map_or(SdkStatus::NotConfigured, |root| sdk_status(root, &self.minimum))
    }

    pub fn check(&self) -> ToolkitReport {
        let report = ToolkitReport {
            runtime: self.check_runtime(),
            sdk: self.check_sdk(),
        };
        if !report.is_ready() {
            warn!("Toolkit check: {}; {}", report.runtime, report.sdk);
        }
        report
    }
}

fn sdk_status(root: &Path, minimum: &Version) -> SdkStatus {
    let version_file = root.join("VERSION.txt");
    if !version_file.is_file() {
        return SdkStatus::NotInstalled;
    }
    let parsed = std::fs::read_to_string(&version_file)
        .map_err(|e| e.to_string())
        .and_then(|text| parse_sdk_version(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(v) if v >= *minimum => SdkStatus::UpToDate(v),
        Ok(v) => SdkStatus::Outdated(v),
        Err(reason) => SdkStatus::Invalid(reason),
    }
}
