//! Timestamp based build avoidance.
//!
//! An artifact is considered current when it exists and is at least as new as
//! its source. Changes to files the source pulls in (e.g. via `#include`) are
//! not detected. Equal timestamps count as current, so a source and artifact
//! written within the same filesystem tick will not be rebuilt.

use crate::mapper::OutputTarget;
use crate::unit::ShaderUnit;
use std::time::SystemTime;

/// Build avoidance decision for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The artifact is missing or older than its source.
    Recompile,
    /// The artifact is up to date.
    Skip,
}

/// Decides from the two timestamps alone.
pub fn decide(source_modified: SystemTime, output_modified: Option<SystemTime>) -> Freshness {
    match output_modified {
        Some(output) if output >= source_modified => Freshness::Skip,
        _ => Freshness::Recompile,
    }
}

/// Decides for `unit`, reading the current state of `target` from disk.
pub fn check(unit: &ShaderUnit, target: &OutputTarget) -> Freshness {
    decide(unit.modified(), target.modified())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_output_recompiles() {
        assert_eq!(decide(SystemTime::now(), None), Freshness::Recompile);
        assert_eq!(decide(SystemTime::UNIX_EPOCH, None), Freshness::Recompile);
    }

    #[test]
    fn test_newer_output_skips() {
        let source = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let output = source + Duration::from_millis(1);
        assert_eq!(decide(source, Some(output)), Freshness::Skip);
    }

    #[test]
    fn test_older_output_recompiles() {
        let source = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let output = source - Duration::from_secs(1);
        assert_eq!(decide(source, Some(output)), Freshness::Recompile);
    }

    #[test]
    fn test_equal_timestamps_skip() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        assert_eq!(decide(t, Some(t)), Freshness::Skip);
    }
}
