//! Violation records and scan results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::extractor::ImportInfo;
use crate::registry::Rank;
use crate::resolver::ResolvedLayer;

/// An owned copy of the layer a path resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer {
    /// The registered prefix that matched.
    pub prefix: String,
    /// Rank of that prefix.
    pub rank: Rank,
}

impl From<ResolvedLayer<'_>> for Layer {
    fn from(l: ResolvedLayer<'_>) -> Self {
        Self {
            prefix: l.prefix.to_owned(),
            rank: l.rank,
        }
    }
}

/// An inner-layer file importing a path from a strictly outer layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// Absolute path of the offending file.
    pub file: PathBuf,
    /// Logical package path of the file (e.g. `domain/user`).
    pub package: String,
    /// Layer the file belongs to.
    pub file_layer: Layer,
    /// The offending import.
    pub import: ImportInfo,
    /// Layer the import belongs to.
    pub import_layer: Layer,
}

impl Violation {
    /// One-line `file:line:col` form with both ranks.
    #[must_use]
    pub fn compact(&self) -> String {
        format!(
            "{}:{}:{}: {} [rank {}] -> {} [rank {}]",
            self.file.display(),
            self.import.line,
            self.import.column,
            self.package,
            self.file_layer.rank,
            self.import.path,
            self.import_layer.rank,
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error: bad dependency on '{}' in layer '{}' ('{}')",
            self.import.path,
            self.package,
            self.file.display()
        )
    }
}

/// A file skipped with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of one scan.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// All violations, ordered by file then import order.
    pub violations: Vec<Violation>,
    /// Number of files read and checked.
    pub files_checked: usize,
    /// Candidate files outside every layer; these are never read.
    #[serde(default)]
    pub files_unlayered: usize,
    /// Files that could not be read or parsed.
    pub files_skipped: Vec<SkippedFile>,
}

impl ScanReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any violation was found.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Number of distinct files with at least one violation.
    #[must_use]
    pub fn offending_files(&self) -> usize {
        let mut files: Vec<&PathBuf> = self.violations.iter().map(|v| &v.file).collect();
        files.dedup();
        files.len()
    }

    /// Adds violations and counters from another report.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_unlayered += other.files_unlayered;
        self.files_skipped.extend(other.files_skipped);
    }
}
