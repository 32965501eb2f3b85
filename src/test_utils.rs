//! Test utilities for reviewd
//!
//! Common helpers for unit tests: temporary directories and canned
//! configuration values.

use crate::config::Config;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Examples
///
/// ```
/// use reviewd::test_utils::temp_dir;
///
/// let dir = temp_dir();
/// assert!(dir.path().exists());
/// ```
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_is_created() {
        let dir = temp_dir();
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }
}
