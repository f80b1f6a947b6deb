use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors for a `codesplit` run.
///
/// These only cover failures to obtain the input document. Problems with individual blocks are
/// never errors: they are recorded as [`crate::extract::RejectedBlock`]s and the scan carries on.
#[derive(Debug, Error)]
pub enum SplitError {
    /// An I/O error occurred while reading the input document.
    /// Includes the path where the error happened.
    #[error("I/O error on path '{}': {source}", path.display())]
    Io { source: std::io::Error, path: PathBuf },

    /// The input path does not exist.
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The input path exists but is a directory or some other non-regular file.
    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// A NUL byte was found near the start of the input.
    #[error("File appears to be binary: {}", .0.display())]
    Binary(PathBuf),

    /// None of the candidate encodings could decode the input.
    #[error("Could not determine text encoding of '{}'", path.display())]
    Undecodable { path: PathBuf },

    /// The forced encoding could not decode the input.
    #[error("'{}' is not valid {encoding}", path.display())]
    WrongEncoding { path: PathBuf, encoding: &'static str },

    /// No input path was given and none could be read from the prompt.
    #[error("No input file given")]
    MissingInput,
}

impl SplitError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        SplitError::Io { source, path: path.into() }
    }
}

impl From<std::io::Error> for SplitError {
    fn from(err: std::io::Error) -> Self {
        SplitError::Io { source: err, path: PathBuf::new() } // Generic path
    }
}
