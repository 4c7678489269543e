//! Destination list loading.
use std::path::Path;

use eyre::WrapErr;

/// Marks a line of the destination file as a comment.
pub const COMMENT_PREFIX: char = '#';

/// Extracts the destination addresses out of `contents`.
///
/// Every line is trimmed; empty lines and lines starting with
/// [`COMMENT_PREFIX`] are dropped. The remaining lines are returned verbatim
/// and in file order, without any format validation.
#[must_use]
pub fn parse_destinations(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(ToOwned::to_owned)
        .collect()
}

/// Reads the destination file at `path`.
///
/// # Errors
///
/// May fail if the file cannot be read as UTF-8 text.
pub fn load_destinations(path: impl AsRef<Path>) -> eyre::Result<Vec<String>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).wrap_err_with(|| {
        format!("failed to read destination file {}", path.display())
    })?;
    Ok(parse_destinations(&contents))
}
