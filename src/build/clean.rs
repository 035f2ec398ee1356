//! Build directory reset.
//!
//! SwiftPM's incremental state is not trusted, so every invocation starts
//! from an empty build directory. Removing a directory that is already gone
//! is not an error.

use colored::*;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{HelperError, Result};

/// Recursively remove `path`, tolerating its absence.
pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    println!("{} {}", "Cleaning".yellow(), path.display());

    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(HelperError::Clean {
            path: path.to_path_buf(),
            source,
        }),
    }
}
