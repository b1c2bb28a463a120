//! Settings files: one pre-formed SCPI command per line.
//!
//! Blank lines and lines beginning with `#` are skipped; everything else is
//! passed to the instrument verbatim, so a settings file can use any command
//! the instrument understands, not just ones this crate has a method for.

use std::path::Path;

use crate::error::ScpiError;

/// Read a settings file and return its command lines in order.
pub fn read_settings(path: &Path) -> Result<Vec<String>, ScpiError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScpiError::Io {
        source,
        context: format!("Could not read settings file {}", path.display()),
    })?;
    Ok(parse_settings(&content))
}

/// Extract command lines from settings file content.
pub fn parse_settings(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
