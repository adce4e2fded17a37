//! # layer-lint-ts
//!
//! Tree-sitter powered import extraction for layer-lint.
//!
//! Each extractor implements [`layer_lint_core::ImportExtractor`] and turns
//! a source file into its ordered list of import paths:
//!
//! - [`GoExtractor`] for Go (`.go`) sources

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod go;

pub use go::GoExtractor;
