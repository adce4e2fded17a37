//! Layer configuration: a flat prefix → rank document.
//!
//! JSON (`{"domain": 1, "usecases": 2}`) is the standard form. TOML with
//! top-level `"prefix" = rank` pairs is accepted as well, and so is the
//! legacy line format where each line names a prefix and its rank is its
//! position in the file.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::registry::LayerRegistry;

/// On-disk format of a layer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// `{ "<prefix>": <rank>, ... }`
    #[default]
    Json,
    /// `"<prefix>" = <rank>` pairs.
    Toml,
    /// One prefix per line, innermost first.
    Lines,
}

impl ConfigFormat {
    /// Picks the format from a file extension; unknown extensions are JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("cfg" | "txt") => Self::Lines,
            _ => Self::Json,
        }
    }
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}")]
    #[diagnostic(
        code(layer_lint::config::io),
        help("check the path given to --config")
    )]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// The document is not a flat prefix → integer mapping.
    #[error("invalid layer config: {message}")]
    #[diagnostic(
        code(layer_lint::config::parse),
        help("declare layers as a flat map of prefix to integer rank")
    )]
    Parse {
        /// Parse error detail.
        message: String,
        /// The offending document.
        #[source_code]
        src: NamedSource<String>,
        /// Where the error was detected, when known.
        #[label("here")]
        span: Option<SourceSpan>,
    },
    /// No configuration was given and none was found.
    #[error("no layer configuration specified")]
    #[diagnostic(code(layer_lint::config::missing))]
    Missing {
        /// Locations looked at, in priority order.
        searched: Vec<PathBuf>,
        /// Where to put a config, listing `searched`.
        #[help]
        help: String,
    },
}

impl ConfigError {
    /// No configuration at any of the `searched` locations.
    #[must_use]
    pub fn missing(searched: Vec<PathBuf>) -> Self {
        let mut help =
            String::from("pass --config <file>, or run `layer-lint init` to create layers.json");
        if !searched.is_empty() {
            help.push_str("\nsearched:");
            for path in &searched {
                help.push_str("\n  ");
                help.push_str(&path.display().to_string());
            }
        }
        Self::Missing { searched, help }
    }
}

/// Declared layers, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerConfig {
    /// File the configuration was loaded from.
    pub source: Option<PathBuf>,
    /// `(prefix, rank)` pairs as declared, duplicates included.
    pub entries: Vec<(String, i64)>,
}

impl LayerConfig {
    /// Load from a file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse_named(
            &content,
            ConfigFormat::from_path(path),
            &path.display().to_string(),
        )?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse from a string.
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        Self::parse_named(content, format, "<config>")
    }

    fn parse_named(content: &str, format: ConfigFormat, name: &str) -> Result<Self, ConfigError> {
        let entries = match format {
            ConfigFormat::Json => serde_json::from_str::<Entries>(content)
                .map_err(|e| {
                    let span = (e.line() > 0)
                        .then(|| SourceSpan::from((offset_of(content, e.line(), e.column()), 0)));
                    parse_error(content, name, e.to_string(), span)
                })?
                .0,
            ConfigFormat::Toml => toml::from_str::<Entries>(content)
                .map_err(|e| {
                    let span = e.span().map(SourceSpan::from);
                    parse_error(content, name, e.message().to_owned(), span)
                })?
                .0,
            ConfigFormat::Lines => parse_lines(content),
        };

        Ok(Self {
            source: None,
            entries,
        })
    }

    /// Build the registry, registering entries in document order.
    ///
    /// A prefix declared twice keeps its last rank; the overwrite is logged.
    #[must_use]
    pub fn registry(&self) -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        for (prefix, rank) in &self.entries {
            if let Some(previous) = registry.register(prefix.clone(), *rank) {
                warn!("layer '{prefix}' declared twice: rank {previous} replaced by {rank}");
            }
        }
        registry
    }
}

fn parse_error(content: &str, name: &str, message: String, span: Option<SourceSpan>) -> ConfigError {
    ConfigError::Parse {
        message,
        src: NamedSource::new(name, content.to_owned()),
        span,
    }
}

/// Byte offset of a 1-indexed line/column position.
fn offset_of(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len())
}

/// Legacy format: rank is the 1-based position among non-blank lines.
fn parse_lines(content: &str) -> Vec<(String, i64)> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .zip(1_i64..)
        .map(|(prefix, rank)| (prefix.to_owned(), rank))
        .collect()
}

/// Map entries in document order, duplicates kept.
struct Entries(Vec<(String, i64)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of layer prefix to integer rank")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((prefix, rank)) = map.next_entry::<String, i64>()? {
                    entries.push((prefix, rank));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
