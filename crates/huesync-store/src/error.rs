//! Error types for the store crate

use thiserror::Error;

/// Errors from the local fallback cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed
    #[error("cache I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::Io("permission denied".to_string());
        assert!(err.to_string().contains("cache I/O error"));
        assert!(err.to_string().contains("permission denied"));
    }
}
