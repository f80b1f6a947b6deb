//! Materializes one accepted block through a [`Filesystem`].

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::fsx::Filesystem;

/// Why a write did not happen.
#[derive(Debug)]
pub(crate) enum WriteFailure {
    Directory,
    Io(io::Error),
}

/// Paths written so far in the current run.
#[derive(Debug, Default)]
pub(crate) struct WrittenPaths(HashSet<String>);

impl WrittenPaths {
    pub(crate) fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    fn insert(&mut self, path: &str) {
        self.0.insert(path.to_owned());
    }
}

/// Renders block content as file text: trailing empty lines dropped, one final newline.
pub(crate) fn render(content_lines: &[String]) -> String {
    let end = content_lines.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
    let mut out = content_lines[..end].join("\n");
    out.push('\n');
    out
}

/// Writes `content_lines` to `target` and returns whether this replaced existing content.
///
/// The overwrite flag is computed before writing: the path was already written in this run, or
/// the filesystem reports it as existing.
pub(crate) fn write_block<F: Filesystem + ?Sized>(
    fs: &mut F,
    written: &mut WrittenPaths,
    target: &str,
    content_lines: &[String],
) -> Result<bool, WriteFailure> {
    let path = Path::new(target);
    if !fs.ensure_directory(path) {
        return Err(WriteFailure::Directory);
    }
    let overwrite = written.contains(target) || fs.file_exists(path);
    fs.write_file(path, &render(content_lines)).map_err(WriteFailure::Io)?;
    written.insert(target);
    Ok(overwrite)
}
