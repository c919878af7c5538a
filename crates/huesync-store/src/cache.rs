//! Local fallback cache
//!
//! Synchronous, durable-within-profile storage of the last known theme mode.
//! The cache is the immediate source of truth before the remote fetch
//! resolves, and the only source when the owner service is unreachable.
//!
//! The invariant is that the cache is written on every accepted mode change
//! and never speculatively; a value lands here only after it has already
//! been applied in memory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use huesync_core::ThemeMode;

use crate::error::CacheError;

/// Durable storage of the last known theme mode
pub trait ThemeCache: Send + Sync {
    /// Read the cached mode.
    ///
    /// Returns `Ok(None)` when nothing is cached or the cached content is
    /// not a recognized mode; an `Err` is reserved for I/O failures on an
    /// existing cache.
    fn load(&self) -> Result<Option<ThemeMode>, CacheError>;

    /// Overwrite the cached mode
    fn store(&self, mode: ThemeMode) -> Result<(), CacheError>;
}

/// File-backed cache: a single file holding the lowercase mode string.
///
/// The equivalent of a one-key browser storage slot. Parent directories are
/// created on first write.
#[derive(Debug)]
pub struct FileThemeCache {
    path: PathBuf,
}

impl FileThemeCache {
    /// Create a cache backed by the given file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this cache reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeCache for FileThemeCache {
    fn load(&self) -> Result<Option<ThemeMode>, CacheError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match raw.trim().parse::<ThemeMode>() {
            Ok(mode) => Ok(Some(mode)),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Ignoring unrecognized cached theme");
                Ok(None)
            }
        }
    }

    fn store(&self, mode: ThemeMode) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{mode}\n"))?;
        Ok(())
    }
}

/// In-memory cache for tests and embedded use
#[derive(Debug, Default)]
pub struct InMemoryThemeCache {
    slot: Mutex<Option<ThemeMode>>,
}

impl InMemoryThemeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-filled with a mode
    pub fn with_mode(mode: ThemeMode) -> Self {
        Self {
            slot: Mutex::new(Some(mode)),
        }
    }
}

impl ThemeCache for InMemoryThemeCache {
    fn load(&self) -> Result<Option<ThemeMode>, CacheError> {
        Ok(*self.slot.lock().unwrap())
    }

    fn store(&self, mode: ThemeMode) -> Result<(), CacheError> {
        *self.slot.lock().unwrap() = Some(mode);
        Ok(())
    }
}
