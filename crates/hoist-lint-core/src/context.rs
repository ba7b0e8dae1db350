//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::syntax::Dialect;

/// Context provided to per-file rules.
///
/// Carries the file's text so rules can look at comments (for allow
/// directives) and the path used when reporting violations.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Dialect the file was parsed with.
    pub dialect: Dialect,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, dialect: Dialect, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            dialect,
            relative_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_strips_root() {
        let ctx = FileContext::new(
            Path::new("/project/src/app.js"),
            "",
            Dialect::JavaScript,
            Path::new("/project"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("src/app.js"));
    }

    #[test]
    fn relative_path_falls_back_to_full_path() {
        let ctx = FileContext::new(
            Path::new("/elsewhere/app.js"),
            "",
            Dialect::JavaScript,
            Path::new("/project"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/app.js"));
    }
}
