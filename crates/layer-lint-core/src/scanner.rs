//! Tree walker: discovers source files under a root and checks each one.

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::checker::LayerChecker;
use crate::extractor::{ExtractError, ImportExtractor};
use crate::package::logical_package_path;
use crate::registry::LayerRegistry;
use crate::types::{ScanReport, SkippedFile, Violation};

/// Excludes applied when none are given.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/vendor/**", "**/testdata/**"];

/// Errors that abort a scan before any file is checked.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root does not exist.
    #[error("root path {path} does not exist")]
    RootNotFound {
        /// Root as given.
        path: PathBuf,
    },

    /// The root exists but is not a directory.
    #[error("root path {path} is not a directory")]
    RootNotDirectory {
        /// Root as given.
        path: PathBuf,
    },

    /// No extractor was registered, so no file could be checked.
    #[error("no import extractor registered")]
    NoExtractor,

    /// IO error resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Glob pattern error.
    #[error("invalid exclude pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a single file produced no result.
#[derive(Debug, Error)]
enum FileError {
    #[error("failed to read: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse: {0}")]
    Extract(#[from] ExtractError),
}

/// Outcome of checking one file.
#[derive(Debug)]
enum FileOutcome {
    Checked(Vec<Violation>),
    /// Package path outside every layer; the file was not read.
    Unlayered,
    Vanished,
    Skipped(SkippedFile),
}

impl FileOutcome {
    fn record(self, report: &mut ScanReport) {
        match self {
            Self::Checked(violations) => {
                report.violations.extend(violations);
                report.files_checked += 1;
            }
            Self::Unlayered => report.files_unlayered += 1,
            Self::Vanished => {}
            Self::Skipped(skipped) => report.files_skipped.push(skipped),
        }
    }
}

/// Builder for configuring a [`Scanner`].
pub struct ScannerBuilder {
    checker: LayerChecker,
    root: Option<PathBuf>,
    extractors: Vec<Box<dyn ImportExtractor>>,
    exclude_patterns: Vec<String>,
    respect_gitignore: bool,
    jobs: Option<usize>,
}

impl ScannerBuilder {
    /// Creates a builder checking against `registry`.
    #[must_use]
    pub fn new(registry: &LayerRegistry) -> Self {
        Self {
            checker: LayerChecker::new(registry),
            root: None,
            extractors: Vec::new(),
            exclude_patterns: Vec::new(),
            respect_gitignore: true,
            jobs: None,
        }
    }

    /// Sets the root directory to scan.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds an import extractor.
    #[must_use]
    pub fn extractor<E: ImportExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Adds a boxed import extractor.
    #[must_use]
    pub fn extractor_box(mut self, extractor: Box<dyn ImportExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Adds an exclude glob pattern, matched against root-relative paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether `.gitignore`/`.ignore` files are honored (default: true).
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Sets the number of worker threads; `1` checks files sequentially.
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Builds the scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or not a directory, no
    /// extractor was added, or an exclude pattern is invalid.
    pub fn build(self) -> Result<Scanner, ScanError> {
        let given = self.root.unwrap_or_else(|| PathBuf::from("."));

        match std::fs::metadata(&given) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ScanError::RootNotDirectory { path: given }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ScanError::RootNotFound { path: given })
            }
            Err(e) => return Err(e.into()),
        }

        if self.extractors.is_empty() {
            return Err(ScanError::NoExtractor);
        }

        let root = if given.is_absolute() {
            normalize(&given)
        } else {
            normalize(&std::env::current_dir()?.join(&given))
        };

        let mut patterns = self.exclude_patterns;
        if patterns.is_empty() {
            patterns.extend(DEFAULT_EXCLUDES.iter().map(|p| (*p).to_string()));
        }
        let excludes = patterns
            .into_iter()
            .map(|p| Ok(Exclude::new(glob::Pattern::new(&p)?, &p)))
            .collect::<Result<Vec<_>, ScanError>>()?;

        Ok(Scanner {
            checker: self.checker,
            root,
            extractors: self.extractors,
            excludes,
            respect_gitignore: self.respect_gitignore,
            jobs: self.jobs,
        })
    }
}

/// Folds `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// A compiled exclude pattern.
struct Exclude {
    glob: glob::Pattern,
    /// For `**/<dir>/**`: `/<dir>/`, matched against any path segment.
    segment: Option<String>,
}

impl Exclude {
    fn new(glob: glob::Pattern, raw: &str) -> Self {
        let segment = raw
            .strip_prefix("**/")
            .and_then(|r| r.strip_suffix("/**"))
            .filter(|dir| !dir.is_empty() && !dir.contains(['*', '?', '[']))
            .map(|dir| format!("/{dir}/"));
        Self { glob, segment }
    }

    fn matches(&self, rel: &str) -> bool {
        self.glob.matches(rel)
            || self
                .segment
                .as_ref()
                .is_some_and(|seg| format!("/{rel}").contains(seg.as_str()))
    }
}

/// Walks a directory tree and checks every candidate source file.
///
/// Use [`Scanner::builder()`] to construct an instance.
pub struct Scanner {
    checker: LayerChecker,
    root: PathBuf,
    extractors: Vec<Box<dyn ImportExtractor>>,
    excludes: Vec<Exclude>,
    respect_gitignore: bool,
    jobs: Option<usize>,
}

impl Scanner {
    /// Creates a new builder checking against `registry`.
    #[must_use]
    pub fn builder(registry: &LayerRegistry) -> ScannerBuilder {
        ScannerBuilder::new(registry)
    }

    /// Returns the absolute root directory being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans all candidate files and returns the results.
    ///
    /// File-level failures never abort the scan: vanished files are skipped
    /// silently, other read or parse failures are logged and recorded in
    /// [`ScanReport::files_skipped`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker pool cannot be started.
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        info!("Scanning {}", self.root.display());

        let mut report = ScanReport::new();
        let files = self.discover_files(&mut report.files_skipped);

        info!("Found {} files to check", files.len());

        let outcomes: Vec<FileOutcome> = if self.jobs == Some(1) {
            files.iter().map(|f| self.check_file(f)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs.unwrap_or(0))
                .build()?;
            pool.install(|| files.par_iter().map(|f| self.check_file(f)).collect())
        };

        for outcome in outcomes {
            outcome.record(&mut report);
        }

        info!(
            "Scan complete: {} violations in {} files",
            report.violations.len(),
            report.files_checked
        );

        Ok(report)
    }

    /// Checks one file. Runs on worker threads.
    fn check_file(&self, path: &Path) -> FileOutcome {
        let package = logical_package_path(&self.root, path);
        if self.checker.resolver().rank(&package).is_none() {
            debug!("Outside declared layers: {}", path.display());
            return FileOutcome::Unlayered;
        }

        debug!("Checking: {}", path.display());

        match self.read_and_check(path, &package) {
            Ok(violations) => FileOutcome::Checked(violations),
            Err(FileError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Vanished before read: {}", path.display());
                FileOutcome::Vanished
            }
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                FileOutcome::Skipped(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn read_and_check(&self, path: &Path, package: &str) -> Result<Vec<Violation>, FileError> {
        let Some(extractor) = self.extractors.iter().find(|e| e.handles(path)) else {
            return Ok(Vec::new());
        };
        let source = std::fs::read_to_string(path)?;
        let imports = extractor.extract(&source)?;
        Ok(self.checker.check(path, package, &imports))
    }

    /// Discovers candidate files, sorted by path.
    fn discover_files(&self, skipped: &mut Vec<SkippedFile>) -> Vec<PathBuf> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.io_error().is_some_and(|e| e.kind() == io::ErrorKind::NotFound) {
                        debug!("Entry vanished during walk: {err}");
                    } else {
                        warn!("Walk error: {err}");
                        skipped.push(SkippedFile {
                            path: walk_error_path(&err).unwrap_or(&self.root).to_path_buf(),
                            reason: err.to_string(),
                        });
                    }
                    continue;
                }
            };

            let path = entry.path();
            if self.is_candidate(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files
    }

    /// Regular, non-hidden file handled by an extractor and not excluded.
    fn is_candidate(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        if hidden || !path.is_file() {
            return false;
        }
        if !self.extractors.iter().any(|e| e.handles(path)) {
            return false;
        }
        if self.should_exclude(path) {
            debug!("Excluding: {}", path.display());
            return false;
        }
        true
    }

    /// Checks if a path matches an exclude pattern.
    fn should_exclude(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        self.excludes.iter().any(|e| e.matches(&rel))
    }
}

/// The entry a walk error refers to, if it carries one.
fn walk_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::Loop { child, .. } => Some(child),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(walk_error_path),
        _ => None,
    }
}
