//! CLI subcommand implementations.

pub mod check;
pub mod day;
pub mod report;
pub mod util;
