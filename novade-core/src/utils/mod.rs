//! General utilities for NovaDE core.
//!
//! - [`fs`]: directory creation and file reading mapped onto [`crate::error::CoreError`].
//! - [`paths`]: XDG base directories and the daemon's application directories.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_optional_to_string};
