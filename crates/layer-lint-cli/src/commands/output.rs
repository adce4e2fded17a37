//! Report output formatting.

use anyhow::Result;
use layer_lint_core::ScanReport;
use std::io::Write;

use crate::OutputFormat;

/// Print the report to stdout in the specified format.
pub fn print(report: &ScanReport, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format)?;
    out.flush()?;
    Ok(())
}

/// Write the report; only violations go to `out`, one per line.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for violation in &report.violations {
                writeln!(out, "{violation}")?;
            }
        }
        OutputFormat::Compact => {
            for violation in &report.violations {
                writeln!(out, "{}", violation.compact())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
