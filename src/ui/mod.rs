//! User-facing output.
//!
//! Separates concerns:
//! - `formatter` - Human-readable diagnostics on stderr
//! - This module - The machine-readable result on stdout

use std::io::Write;

use crate::domain::ReleaseResult;
use crate::error::Result;

pub mod formatter;

pub use formatter::{display_boundary_warning, display_result_summary, summary_line};

/// Write the result as exactly one JSON line.
pub fn emit_result<W: Write>(writer: &mut W, result: &ReleaseResult) -> Result<()> {
    let json = result.to_json()?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}
