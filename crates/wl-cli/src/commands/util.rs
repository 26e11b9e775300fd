//! Shared utilities for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use wl_core::Parsed;

use crate::Config;

/// Picks the work log from the command line, falling back to the config.
pub fn worklog_path(file: Option<&Path>, config: &Config) -> anyhow::Result<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| config.worklog_path.clone())
        .context("no work log given: pass a FILE or set worklog_path in the config")
}

/// Reads and parses the selected work log.
pub fn load_worklog(file: Option<&Path>, config: &Config) -> anyhow::Result<Parsed> {
    let path = worklog_path(file, config)?;
    tracing::debug!(path = %path.display(), "reading work log");
    let parsed = wl_core::read_file(&path)?;
    Ok(parsed)
}
