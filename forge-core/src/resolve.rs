//! Locates the compiler executable.

use crate::ForgeError;
use log::debug;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolves the compiler to an existing file.
///
/// An explicit path containing a directory component is used as-is and must
/// exist. A bare explicit name, or `default_name` when nothing was given, is
/// looked up in each entry of `search_path`.
///
/// # Errors
///
/// [`ForgeError::ToolMissing`] if nothing resolves.
pub fn resolve_compiler(
    explicit: Option<&Path>,
    default_name: &str,
    search_path: Option<&OsStr>,
) -> Result<PathBuf, ForgeError> {
    let requested = explicit.unwrap_or_else(|| Path::new(default_name));

    if has_directory(requested) {
        return if requested.is_file() {
            debug!("Using explicit compiler {:?}", requested);
            Ok(requested.to_path_buf())
        } else {
            Err(ForgeError::ToolMissing {
                tool: requested.display().to_string(),
                reason: "no such file".to_string(),
            })
        };
    }

    find_on_path(requested, search_path).ok_or_else(|| ForgeError::ToolMissing {
        tool: requested.display().to_string(),
        reason: "not found on the executable search path".to_string(),
    })
}

fn has_directory(path: &Path) -> bool {
    path.is_absolute() || path.components().count() > 1
}

fn find_on_path(name: &Path, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
        .inspect(|found| debug!("Resolved {:?} to {:?}", name, found))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn candidates(dir: &Path, name: &Path) -> Vec<PathBuf> {
    let plain = dir.join(name);
    if cfg!(windows) && name.extension().is_none() {
        vec![plain.with_extension("exe"), plain]
    } else {
        vec![plain]
    }
}
