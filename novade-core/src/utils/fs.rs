//! Filesystem helpers.
//!
//! These wrap `std::fs` so that failures surface as [`CoreError::Filesystem`]
//! carrying the offending path.

use crate::error::CoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Ensures that a directory exists at `path`, creating it and any missing
/// parents.
///
/// # Errors
///
/// Returns [`CoreError::Filesystem`] if the path exists but is not a directory,
/// or if creating it fails.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(CoreError::Filesystem {
            message: "Path exists but is not a directory".to_string(),
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "not a directory"),
        });
    }
    fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to create directory".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads a file into a string, treating a missing file as `Ok(None)`.
///
/// Blank files are also reported as `None` so callers can fall back to
/// defaults the same way they would for an absent file.
pub fn read_optional_to_string(path: &Path) -> Result<Option<String>, CoreError> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::Filesystem {
            message: "Failed to read file to string".to_string(),
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
