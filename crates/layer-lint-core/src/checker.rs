//! Layer ordering check for a single file.
//!
//! Inner layers must not depend on outer ones: an import is a violation when
//! it resolves to a rank strictly greater than the importing file's rank.

use std::path::Path;
use tracing::debug;

use crate::extractor::ImportInfo;
use crate::registry::LayerRegistry;
use crate::resolver::LayerResolver;
use crate::types::{Layer, Violation};

/// Evaluates the layer ordering rule against one file's imports.
#[derive(Debug, Clone)]
pub struct LayerChecker {
    resolver: LayerResolver,
}

impl LayerChecker {
    /// Create a checker over the given registry.
    #[must_use]
    pub fn new(registry: &LayerRegistry) -> Self {
        Self {
            resolver: LayerResolver::new(registry),
        }
    }

    /// The resolver backing this checker.
    #[must_use]
    pub fn resolver(&self) -> &LayerResolver {
        &self.resolver
    }

    /// Check one file.
    ///
    /// `package` is the file's logical package path. Files outside every
    /// declared layer, and imports outside every declared layer, never
    /// produce violations.
    #[must_use]
    pub fn check(&self, file: &Path, package: &str, imports: &[ImportInfo]) -> Vec<Violation> {
        let Some(from_layer) = self.resolver.resolve(package) else {
            debug!("{}: package '{package}' is in no layer", file.display());
            return Vec::new();
        };

        let mut violations = Vec::new();

        for imp in imports {
            let Some(to_layer) = self.resolver.resolve(&imp.path) else {
                continue;
            };

            debug!(
                "comparing package {package} (rank {}) to import {} (rank {})",
                from_layer.rank, imp.path, to_layer.rank
            );

            if to_layer.rank > from_layer.rank {
                violations.push(Violation {
                    file: file.to_path_buf(),
                    package: package.to_owned(),
                    file_layer: Layer::from(from_layer),
                    import: imp.clone(),
                    import_layer: Layer::from(to_layer),
                });
            }
        }

        violations
    }
}
