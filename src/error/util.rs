//! Utility functions for error handling
//!
//! Path checks that turn bare IO failures into errors naming the file and
//! what it was needed for.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::error::{Error, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
        .with_context(|| format!("Needed for: {purpose}"));
    }

    if !path.is_file() {
        return Err(anyhow::anyhow!("Path is not a file: {}", path.display()))
            .with_context(|| format!("Expected a file for: {purpose}"));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            io::ErrorKind::NotFound => {
                "File not found - it may have been deleted during operation".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        anyhow::Error::new(e).context(format!("{context}: {}", path.display()))
    })
}

/// Check that the directory a file will be created in exists
///
/// An empty parent (a bare file name) refers to the working directory.
pub fn validate_parent_directory(path: &Path, purpose: &str) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    if !parent.is_dir() {
        return Err(anyhow::anyhow!(
            "Directory does not exist: {}",
            parent.display()
        ))
        .with_context(|| format!("Needed for: {purpose}"));
    }

    Ok(())
}
