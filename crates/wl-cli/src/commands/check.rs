//! Check command for listing lines the parser skipped or flagged.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::Config;
use crate::commands::util::load_worklog;

/// Prints every parse issue; returns `true` when the work log is clean.
pub fn run<W: Write>(writer: &mut W, file: Option<&Path>, config: &Config) -> Result<bool> {
    let parsed = load_worklog(file, config)?;

    for issue in &parsed.issues {
        writeln!(writer, "{issue}")?;
    }

    let skipped = parsed.issues.iter().filter(|i| i.kind.skips_line()).count();
    writeln!(
        writer,
        "{} clocks, {} issues ({skipped} lines skipped)",
        parsed.records.len(),
        parsed.issues.len()
    )?;

    Ok(parsed.issues.is_empty())
}
