//! Human and JSON renderings of an [`ExtractionResult`].

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::extract::ExtractionResult;
use crate::input::TextEncoding;

/// Everything reported at the end of a run.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub input: &'a Path,
    pub encoding: TextEncoding,
    pub dry_run: bool,
    #[serde(flatten)]
    pub result: &'a ExtractionResult,
}

impl RunSummary<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        writeln!(f)?;
        if self.dry_run {
            writeln!(f, "Dry run complete (nothing was written).")?;
        } else {
            writeln!(f, "Extraction complete!")?;
        }
        writeln!(f, "Total strictly matched code blocks found: {}", r.blocks_found)?;
        writeln!(f, "Files successfully extracted: {}", r.successful)?;

        if !r.rejected.is_empty() {
            writeln!(f, "Blocks rejected: {}", r.rejected.len())?;
            writeln!(f)?;
            writeln!(f, "Rejected blocks:")?;
            for block in &r.rejected {
                writeln!(f, "  - {} (line {}): {}", block.identifier(), block.line + 1, block.reason)?;
            }
        }

        if !r.overwritten.is_empty() {
            writeln!(f)?;
            writeln!(f, "Files overwritten: {}", r.overwritten.len())?;
            for path in &r.overwritten {
                writeln!(f, "  - {}", path)?;
            }
            writeln!(f, "Note: Multiple code blocks with the same filename were found, or the file already existed.")?;
            writeln!(f, "Each file contains the content from the last matching block.")?;
        }
        Ok(())
    }
}
