//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod layers;
pub mod output;

use layer_lint_core::{ConfigError, LayerConfig};

use crate::config_resolver::{ConfigSource, Origin};

/// Loads the layer configuration a [`ConfigSource`] points at.
///
/// Errors are returned unwrapped so `main` can render them as diagnostics.
fn load_config(source: ConfigSource) -> Result<LayerConfig, ConfigError> {
    match source {
        ConfigSource::Found { path, origin } => {
            if origin == Origin::Global {
                tracing::info!("Using global config: {}", path.display());
            } else {
                tracing::debug!("Using config: {}", path.display());
            }
            LayerConfig::from_file(&path)
        }
        ConfigSource::Missing { searched } => Err(ConfigError::missing(searched)),
    }
}
