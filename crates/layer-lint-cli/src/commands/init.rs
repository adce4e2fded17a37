//! Init command implementation.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

const JSON_TEMPLATE: &str = r#"{
  "domain": 1,
  "usecases": 2,
  "interfaces": 3,
  "infrastructure": 4
}
"#;

const TOML_TEMPLATE: &str = r#"# layer-lint configuration
#
# Each key is a package path prefix relative to the scanned root; the value
# is its rank. Lower ranks are inner layers and may not import higher ranks.
# A rank of 0 exempts a sub-tree from checking.

domain = 1
usecases = 2
interfaces = 3
infrastructure = 4
"#;

/// Starter configuration format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InitFormat {
    /// `layers.json`
    #[default]
    Json,
    /// `layers.toml`
    Toml,
}

impl InitFormat {
    fn file_name(self) -> &'static str {
        match self {
            Self::Json => "layers.json",
            Self::Toml => "layers.toml",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Json => JSON_TEMPLATE,
            Self::Toml => TOML_TEMPLATE,
        }
    }
}

/// Runs the init command in the current directory.
pub fn run(force: bool, format: InitFormat) -> Result<()> {
    let path = run_in(Path::new("."), force, format)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to match your package layout", format.file_name());
    println!("  2. Run: layer-lint .");

    Ok(())
}

fn run_in(dir: &Path, force: bool, format: InitFormat) -> Result<PathBuf> {
    let config_path = dir.join(format.file_name());

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, format.template())?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::{ConfigFormat, LayerConfig, Rank};
    use tempfile::TempDir;

    fn starter_ranks(format: InitFormat) -> Vec<(String, Rank)> {
        let config_format = match format {
            InitFormat::Json => ConfigFormat::Json,
            InitFormat::Toml => ConfigFormat::Toml,
        };
        LayerConfig::parse(format.template(), config_format)
            .unwrap()
            .registry()
            .by_rank()
            .into_iter()
            .map(|(prefix, rank)| (prefix.to_string(), rank))
            .collect()
    }

    #[test]
    fn templates_declare_the_same_layers() {
        let expected = vec![
            ("domain".to_string(), Rank(1)),
            ("usecases".to_string(), Rank(2)),
            ("interfaces".to_string(), Rank(3)),
            ("infrastructure".to_string(), Rank(4)),
        ];
        assert_eq!(starter_ranks(InitFormat::Json), expected);
        assert_eq!(starter_ranks(InitFormat::Toml), expected);
    }

    #[test]
    fn writes_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = run_in(tmp.path(), false, InitFormat::Json).unwrap();
        assert_eq!(path, tmp.path().join("layers.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), JSON_TEMPLATE);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("layers.toml"), "keep = 1\n").unwrap();

        let err = run_in(tmp.path(), false, InitFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("layers.toml")).unwrap(),
            "keep = 1\n"
        );
    }

    #[test]
    fn force_overwrites() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("layers.toml"), "keep = 1\n").unwrap();

        run_in(tmp.path(), true, InitFormat::Toml).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("layers.toml")).unwrap(),
            TOML_TEMPLATE
        );
    }
}
