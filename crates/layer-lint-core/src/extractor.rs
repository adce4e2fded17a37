//! Language-agnostic import extraction types and trait.
//!
//! [`ImportExtractor`] is the extension point for adding languages. The
//! checker only sees the ordered import paths it produces, so nothing in the
//! core depends on a particular import syntax.

use serde::{Deserialize, Serialize};

/// A single import statement extracted from source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportInfo {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Import path as written, quotes stripped (e.g. `myapp/infrastructure/db`).
    pub path: String,
}

impl ImportInfo {
    /// Creates an import record.
    #[must_use]
    pub fn new(path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            path: path.into(),
        }
    }
}

/// Errors raised while extracting imports from one file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The source is not syntactically valid where imports are declared.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
        /// What went wrong.
        message: String,
    },
    /// The parser could not be set up.
    #[error("parser unavailable: {0}")]
    Parser(String),
}

/// Language-specific import extraction.
///
/// Implementations receive raw source text and return the file's import
/// paths in source order.
pub trait ImportExtractor: Send + Sync {
    /// Language identifier (e.g. `"go"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles, with the dot (e.g. `&[".go"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract the import list from source code.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the source cannot be parsed far enough to
    /// read its imports.
    fn extract(&self, source: &str) -> Result<Vec<ImportInfo>, ExtractError>;

    /// Whether this extractor handles `path`, judged by its extension.
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.strip_prefix('.') == Some(ext))
            })
    }
}
