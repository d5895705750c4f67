//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait allows scrapers to read from the real `/proc`
//! filesystem on Linux or from an in-memory mock in tests and CI.

use std::io;
use std::path::Path;

/// Abstraction for read-only filesystem access.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads a file, treating any failure as empty content.
///
/// A missing, unreadable, or empty kernel file must degrade to absent
/// metrics rather than aborting the whole scrape cycle (network stats are
/// commonly absent on constrained kernels).
pub fn read_or_empty<F: FileSystem>(fs: &F, path: impl AsRef<Path>) -> String {
    fs.read_to_string(path.as_ref()).unwrap_or_default()
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
