//! Day command for resolving day specs.

use std::io::Write;

use anyhow::Result;

pub fn run<W: Write>(writer: &mut W, spec: Option<&str>, offset: i64) -> Result<()> {
    let day = wl_core::tellday(spec, offset)?;
    writeln!(writer, "{day}")?;
    Ok(())
}
