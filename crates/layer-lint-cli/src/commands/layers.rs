//! List layers command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config_resolver;

/// Runs the layers command.
pub fn run(root: &Path, explicit_config: Option<&Path>) -> Result<()> {
    let source = config_resolver::resolve(root, explicit_config);
    let config = super::load_config(source)?;
    let registry = config.registry();

    if let Some(path) = &config.source {
        println!("Layers from {}:\n", path.display());
    }

    if registry.is_empty() {
        println!("  (no layers declared)");
        return Ok(());
    }

    println!("{:<8} Prefix", "Rank");
    println!("{}", "-".repeat(40));

    for (prefix, rank) in registry.by_rank() {
        let note = if rank.is_unranked() { "  (exempt)" } else { "" };
        println!("{:<8} {prefix}{note}", rank.to_string());
    }

    println!("\nPackages may import layers of equal or lower rank only.");

    Ok(())
}
