//! Default command: scan a tree for layer violations.

use anyhow::{Context, Result};
use layer_lint_core::Scanner;
use layer_lint_ts::GoExtractor;
use std::path::Path;
use std::process::ExitCode;

use crate::CheckArgs;

/// Runs the scan.
///
/// Violations do not affect the exit status unless `--fail-on-violations`
/// is given; configuration and root errors are returned.
pub fn run(args: &CheckArgs, explicit_config: Option<&Path>) -> Result<ExitCode> {
    let root = args.root.as_deref().context("no root directory specified")?;

    let source = crate::config_resolver::resolve(root, explicit_config);
    let config = super::load_config(source)?;
    let registry = config.registry();
    if registry.is_empty() {
        tracing::warn!("Layer configuration declares no layers; nothing will be reported");
    }

    let mut builder = Scanner::builder(&registry)
        .root(root)
        .extractor(GoExtractor::new())
        .excludes(args.exclude.iter().cloned())
        .respect_gitignore(!args.no_ignore);
    if let Some(jobs) = args.jobs {
        builder = builder.jobs(jobs);
    }
    let scanner = builder.build()?;

    tracing::info!(
        "Checking {} against {} layer(s)",
        scanner.root().display(),
        registry.len()
    );

    let report = scanner.scan()?;

    super::output::print(&report, args.format)?;

    tracing::info!(
        "Found {} violation(s) in {} file(s) ({} checked, {} outside layers, {} skipped)",
        report.violations.len(),
        report.offending_files(),
        report.files_checked,
        report.files_unlayered,
        report.files_skipped.len()
    );

    if args.fail_on_violations && report.has_violations() {
        return Ok(ExitCode::from(1));
    }

    Ok(ExitCode::SUCCESS)
}
