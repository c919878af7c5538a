//! Error types shared across the huesync stack

use thiserror::Error;

/// A string did not name one of the recognized theme modes.
///
/// Every string boundary (cache file, push payload, CLI argument) parses
/// through this; callers discard the failure and leave state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized theme mode: {0:?}")]
pub struct ParseThemeModeError(pub String);
