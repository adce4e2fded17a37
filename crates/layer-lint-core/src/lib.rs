//! # layer-lint-core
//!
//! Core of a dependency checker for layered ("clean") architectures.
//!
//! Layers are declared as path prefixes with integer ranks, innermost
//! lowest. A file may import from its own layer or any inner layer; an
//! import resolving to a strictly outer layer is a [`Violation`]. Files and
//! imports outside every declared layer are never flagged.
//!
//! - [`LayerRegistry`] holds the declared prefix → rank table
//! - [`LayerResolver`] maps a path to its layer (longest prefix wins)
//! - [`LayerChecker`] applies the ordering rule to one file's imports
//! - [`ImportExtractor`] is the per-language import extraction boundary
//! - [`Scanner`] walks a tree and checks every candidate file
//!
//! ## Example
//!
//! ```ignore
//! use layer_lint_core::{LayerConfig, Scanner};
//!
//! let config = LayerConfig::from_file("layers.json".as_ref())?;
//! let scanner = Scanner::builder(&config.registry())
//!     .root("./src")
//!     .extractor(GoExtractor::new())
//!     .build()?;
//!
//! for violation in scanner.scan()?.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod config;
mod extractor;
mod package;
mod registry;
mod resolver;
mod scanner;
mod types;

pub use checker::LayerChecker;
pub use config::{ConfigError, ConfigFormat, LayerConfig};
pub use extractor::{ExtractError, ImportExtractor, ImportInfo};
pub use package::logical_package_path;
pub use registry::{LayerRegistry, Rank};
pub use resolver::{LayerResolver, ResolvedLayer};
pub use scanner::{ScanError, Scanner, ScannerBuilder, DEFAULT_EXCLUDES};
pub use types::{Layer, ScanReport, SkippedFile, Violation};
