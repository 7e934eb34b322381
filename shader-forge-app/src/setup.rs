//! Steps run before the build: directory preparation and toolkit checks.

use forge_toolkit::{prepare_dirs, PresenceChecker, ToolkitReport, VulkanInfoProbe};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Creates every requested directory, reporting each one on stderr.
///
/// Returns false if any directory could not be created; the build still runs.
pub fn prepare_directories(dirs: &[PathBuf]) -> bool {
    if dirs.is_empty() {
        return true;
    }
    info!("Preparing {} asset directories", dirs.len());

    let mut ok = true;
    for report in prepare_dirs(dirs) {
        match &report.outcome {
            Ok(resolved) => eprintln!("Exists:  {}", resolved.display()),
            Err(e) => {
                eprintln!("Error creating {}: {}", report.requested.display(), e);
                ok = false;
            }
        }
    }
    if !ok {
        warn!("Some asset directories could not be created");
    }
    ok
}

/// Runs the toolkit presence checks and prints the findings on stderr.
pub fn check_toolkit(sdk_root: Option<&Path>, vulkaninfo: &Path) -> ToolkitReport {
    let checker = PresenceChecker::new(sdk_root.map(Path::to_path_buf))
        .with_probe(VulkanInfoProbe::new(vulkaninfo));
    let report = checker.check();

    eprintln!("Runtime: {}", report.runtime);
    eprintln!("SDK:     {}", report.sdk);
    if report.is_ready() {
        info!("Toolkit ready");
    } else {
        eprintln!("Warning: toolkit below the required version; the build may fail");
    }
    report
}
