use crate::ToolkitError;
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

/// Oldest runtime and SDK version the build targets.
pub const MIN_VERSION: Version = Version::new(1, 3, 0);

static INSTANCE_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Vulkan Instance Version:\s+(\d+)\.(\d+)\.(\d+)")
        .expect("instance version pattern is valid")
});

/// Extracts the instance version from `vulkaninfo` output.
pub fn parse_instance_version(output: &str) -> Option<Version> {
    let caps = INSTANCE_VERSION.captures(output)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Parses an SDK `VERSION.txt` value such as `1.3.250.1`.
///
/// Only the first three components are kept; missing ones are zero.
pub fn parse_sdk_version(text: &str) -> Result<Version, ToolkitError> {
    let trimmed = text.trim();
    let invalid = || ToolkitError::VersionParse(trimmed.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut parts = [0u64; 3];
    for (i, component) in trimmed.split('.').enumerate() {
        let value = component.parse::<u64>().map_err(|_| invalid())?;
        if let Some(slot) = parts.get_mut(i) {
            *slot = value;
        }
    }
    Ok(Version::new(parts[0], parts[1], parts[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_version_from_vulkaninfo() {
        let output = "==========\nVULKANINFO\n==========\n\nVulkan Instance Version: 1.3.268\n\n";
        assert_eq!(
            parse_instance_version(output),
            Some(Version::new(1, 3, 268))
        );
    }

    #[test]
    fn test_instance_version_missing() {
        assert_eq!(parse_instance_version("ERROR: no ICD found"), None);
        assert_eq!(parse_instance_version(""), None);
    }

    #[test]
    fn test_sdk_version_four_components() {
        assert_eq!(
            parse_sdk_version("1.3.250.1\n").unwrap(),
            Version::new(1, 3, 250)
        );
    }

    #[test]
    fn test_sdk_version_short() {
        assert_eq!(parse_sdk_version("1.2").unwrap(), Version::new(1, 2, 0));
    }

    #[test]
    fn test_sdk_version_garbage() {
        assert!(matches!(
            parse_sdk_version("latest"),
            Err(ToolkitError::VersionParse(_))
        ));
        assert!(parse_sdk_version("  ").is_err());
        assert!(parse_sdk_version("1..3").is_err());
    }

    #[test]
    fn test_minimum_comparison() {
        assert!(Version::new(1, 3, 0) >= MIN_VERSION);
        assert!(Version::new(1, 2, 198) < MIN_VERSION);
    }
}
