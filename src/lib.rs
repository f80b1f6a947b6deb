//! # codesplit Core Library
//!
//! This crate provides the core functionality for the `codesplit` command-line tool, which
//! takes one "compacted" text document made of fenced code blocks and writes every block back out
//! as its own file.
//!
//! A block looks like this; the marker line is kept as the first line of the written file:
//!
//! ````text
//! ```python
//! # File: app/models.py
//! class User: ...
//! ```
//! ````
//!
//! ## Key Modules
//!
//! - [`extract`]: The block scanner, its grammar and path normalization.
//! - [`fsx`]: The filesystem capability the scanner writes through.
//! - [`input`]: Reading and decoding the compacted document.
//! - [`report`]: The end-of-run summary.
//! - [`cli`] / [`cli_runner`]: Argument parsing and the binary's run loop.
//!
//! ## Examples
//!
//! ```
//! use codesplit::extract::extract;
//! use codesplit::fsx::MemoryFs;
//!
//! let lines = ["```py", "# File: hello.py", "print('hi')", "```"];
//! let mut fs = MemoryFs::new();
//! let result = extract(&lines, &mut fs);
//! assert_eq!(result.successful, 1);
//! assert_eq!(fs.read("hello.py"), Some("# File: hello.py\nprint('hi')\n"));
//! ```

pub mod cli;
pub mod cli_runner;
pub mod error;
pub use error::SplitError;

pub mod extract;
pub use extract::{extract, ExtractionResult, RejectReason, RejectedBlock};

pub mod fsx;
pub mod input;
pub mod report;
