//! # Extraction Module
//!
//! Scans a compacted document for fenced blocks of the form
//!
//! ````text
//! ```python
//! # File: path/to/file.py
//! <file contents>
//! ```
//! ````
//!
//! and writes each one out through a [`Filesystem`]. The marker line stays in the written file
//! as its first line. Malformed blocks are recorded in the [`ExtractionResult`] and the scan moves
//! on; nothing in here fails the run.

mod grammar;
mod path;
mod writer;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::fsx::Filesystem;
use writer::{WriteFailure, WrittenPaths};

pub use grammar::{file_marker, is_closing_fence, opening_fence, FenceTag};
pub use path::normalize_path;

/// Identifier shown for rejected blocks whose target path is not known.
pub const UNKNOWN_TARGET: &str = "<unknown>";

/// Why a block was not extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The opening fence was the last line of the document.
    MissingMarker,
    /// The line after the opening fence is not a `# File:` marker.
    ExpectedMarker,
    /// The document ended before a closing fence.
    MissingClosingFence,
    /// The marker path is empty once normalized.
    EmptyFilename,
    /// The parent directory of the target could not be created.
    DirectoryCreation,
    /// Writing the target failed; holds the underlying error text.
    Write(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingMarker => f.write_str("missing file marker after opening fence"),
            RejectReason::ExpectedMarker => {
                f.write_str("expected file marker ('# File: <path>') after opening fence")
            }
            RejectReason::MissingClosingFence => f.write_str("missing closing fence"),
            RejectReason::EmptyFilename => f.write_str("empty filename"),
            RejectReason::DirectoryCreation => f.write_str("failed to create directory"),
            RejectReason::Write(msg) => write!(f, "error writing file: {}", msg),
        }
    }
}

impl Serialize for RejectReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One block that was not extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedBlock {
    /// Normalized target path, `None` when it was never parsed or came out empty.
    pub target: Option<String>,
    /// Zero-based line index of the opening fence.
    pub line: usize,
    pub reason: RejectReason,
}

impl RejectedBlock {
    /// The target path, or [`UNKNOWN_TARGET`].
    pub fn identifier(&self) -> &str {
        self.target.as_deref().unwrap_or(UNKNOWN_TARGET)
    }
}

/// Accounting for one extraction run.
///
/// `blocks_found == successful + rejected.len()` holds for every finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub blocks_found: usize,
    pub successful: usize,
    pub rejected: Vec<RejectedBlock>,
    /// Paths whose content was replaced, either from disk or from an earlier block.
    pub overwritten: BTreeSet<String>,
}

impl ExtractionResult {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// A block whose marker has been accepted and whose content is being collected.
#[derive(Debug)]
struct Block {
    tag: FenceTag,
    open_line: usize,
    target_path: String,
    content_lines: Vec<String>,
}

#[derive(Debug)]
enum ScanState {
    SeekingFence,
    /// The cursor sits on the line after an opening fence.
    ExpectMarker { tag: FenceTag, open_line: usize },
    CollectingContent(Block),
}

/// Runs one extraction over `lines`.
///
/// Owns the run-wide bookkeeping, so separate extractors never share state.
pub struct Extractor<'a, F: Filesystem + ?Sized> {
    fs: &'a mut F,
    written: WrittenPaths,
    result: ExtractionResult,
}

impl<'a, F: Filesystem + ?Sized> Extractor<'a, F> {
    pub fn new(fs: &'a mut F) -> Self {
        Self { fs, written: WrittenPaths::default(), result: ExtractionResult::default() }
    }

    /// Scans the whole document once, front to back.
    pub fn run<S: AsRef<str>>(mut self, lines: &[S]) -> ExtractionResult {
        let mut state = ScanState::SeekingFence;
        let mut i = 0usize;

        loop {
            state = match state {
                ScanState::SeekingFence => {
                    let Some(line) = lines.get(i) else { break };
                    i += 1;
                    match opening_fence(line.as_ref()) {
                        Some(tag) => {
                            self.result.blocks_found += 1;
                            debug!("Opening ```{} fence at line {}", tag, i);
                            ScanState::ExpectMarker { tag, open_line: i - 1 }
                        }
                        None => ScanState::SeekingFence,
                    }
                }
                ScanState::ExpectMarker { tag, open_line } => {
                    // On failure the cursor stays put, so this line is looked at again as text.
                    let Some(line) = lines.get(i) else {
                        self.reject(None, open_line, RejectReason::MissingMarker);
                        break;
                    };
                    let line = line.as_ref();
                    match file_marker(line) {
                        Some(raw) => {
                            i += 1;
                            ScanState::CollectingContent(Block {
                                tag,
                                open_line,
                                target_path: normalize_path(raw),
                                content_lines: vec![line.to_owned()],
                            })
                        }
                        None => {
                            self.reject(None, open_line, RejectReason::ExpectedMarker);
                            ScanState::SeekingFence
                        }
                    }
                }
                ScanState::CollectingContent(mut block) => {
                    let Some(line) = lines.get(i) else {
                        let target = non_empty(block.target_path);
                        self.reject(target, block.open_line, RejectReason::MissingClosingFence);
                        break;
                    };
                    i += 1;
                    let line = line.as_ref();
                    if is_closing_fence(line) {
                        self.finish(block);
                        ScanState::SeekingFence
                    } else {
                        block.content_lines.push(line.to_owned());
                        ScanState::CollectingContent(block)
                    }
                }
            };
        }

        self.result
    }

    fn finish(&mut self, block: Block) {
        debug!(
            "Closed ```{} block for '{}' ({} lines)",
            block.tag,
            block.target_path,
            block.content_lines.len()
        );
        if block.target_path.is_empty() {
            self.reject(None, block.open_line, RejectReason::EmptyFilename);
            return;
        }

        let target = block.target_path;
        match writer::write_block(&mut *self.fs, &mut self.written, &target, &block.content_lines) {
            Ok(overwrite) => {
                if overwrite {
                    warn!("Overwriting file: {}", target);
                    self.result.overwritten.insert(target.clone());
                }
                info!("Extracted: {}", target);
                self.result.successful += 1;
            }
            Err(WriteFailure::Directory) => {
                self.reject(Some(target), block.open_line, RejectReason::DirectoryCreation);
            }
            Err(WriteFailure::Io(e)) => {
                self.reject(Some(target), block.open_line, RejectReason::Write(e.to_string()));
            }
        }
    }

    fn reject(&mut self, target: Option<String>, line: usize, reason: RejectReason) {
        let block = RejectedBlock { target, line, reason };
        warn!("Rejected block at line {}: {}: {}", line + 1, block.identifier(), block.reason);
        self.result.rejected.push(block);
    }
}

fn non_empty(path: String) -> Option<String> {
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Extracts every block in `lines` through `fs`.
pub fn extract<F, S>(lines: &[S], fs: &mut F) -> ExtractionResult
where
    F: Filesystem + ?Sized,
    S: AsRef<str>,
{
    Extractor::new(fs).run(lines)
}
