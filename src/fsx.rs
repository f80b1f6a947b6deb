//! Filesystem capability used by the extractor.
//!
//! The scanner never touches `std::fs` directly. Everything it needs from storage goes through
//! [`Filesystem`], so the same extraction logic runs against the real disk ([`DiskFs`]), a
//! report-only view of the disk ([`DryRunFs`]) or a plain map ([`MemoryFs`]) in tests.
//!
//! Paths handed to a `Filesystem` are the normalized marker paths, relative to whatever root
//! the implementation was built with.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub trait Filesystem {
    /// Makes sure the parent directory of `path` exists.
    ///
    /// Returns `false` if it is missing and could not be created.
    fn ensure_directory(&mut self, path: &Path) -> bool;

    /// Whether something already exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Replaces the full contents of `path` with `contents`.
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem, rooted at the output directory.
#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Filesystem for DiskFs {
    fn ensure_directory(&mut self, path: &Path) -> bool {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return true,
        };
        let directory = self.resolve(parent);
        if directory.is_dir() {
            return true;
        }
        match fs::create_dir_all(&directory) {
            Ok(()) => {
                info!("Created directory: {}", directory.display());
                true
            }
            Err(e) => {
                warn!("Error creating directory {}: {}", directory.display(), e);
                false
            }
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(self.resolve(path), contents)
    }
}

/// Answers existence checks from disk but never creates or writes anything.
#[derive(Debug, Clone)]
pub struct DryRunFs {
    disk: DiskFs,
}

impl DryRunFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { disk: DiskFs::new(root) }
    }
}

impl Filesystem for DryRunFs {
    fn ensure_directory(&mut self, _path: &Path) -> bool {
        true
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.disk.file_exists(path)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        info!("Would write {} bytes to {}", contents.len(), self.disk.resolve(path).display());
        Ok(())
    }
}

/// In-memory filesystem. Directories are implicit; failures can be injected per path.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: HashMap<PathBuf, String>,
    failing_dirs: HashSet<PathBuf>,
    failing_writes: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file as if it existed before the run.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Makes `ensure_directory` fail for every file whose parent is `dir`.
    pub fn fail_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failing_dirs.insert(dir.into());
        self
    }

    /// Makes `write_file` fail for `path`.
    pub fn fail_write(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_writes.insert(path.into());
        self
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filesystem for MemoryFs {
    fn ensure_directory(&mut self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => !self.failing_dirs.contains(parent),
            None => true,
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if self.failing_writes.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"));
        }
        self.files.insert(path.to_path_buf(), contents.to_owned());
        Ok(())
    }
}
