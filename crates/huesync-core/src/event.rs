//! Theme change notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::theme::{EffectiveTheme, ThemeMode};

/// Where an applied theme value came from.
///
/// The origin decides what happens after the apply: only `LocalSet` feeds
/// the persistence queue, so values that already came from the owner service
/// are never written back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeOrigin {
    /// An explicit local toggle
    LocalSet,
    /// The initial fetch from the owner service
    RemoteFetch,
    /// A realtime push from the owner service
    Push,
    /// The local fallback cache, read at startup
    CacheLoad,
}

/// A change notification delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeEvent {
    /// The mode that was applied
    pub mode: ThemeMode,
    /// The concrete theme resolved at apply time
    pub effective: EffectiveTheme,
    /// Where the value came from
    pub origin: ChangeOrigin,
    /// When the change was applied. For observability only; arrival order,
    /// not this timestamp, decides which of two competing writes wins.
    pub at: DateTime<Utc>,
}

impl ThemeEvent {
    /// Create an event stamped with the current time
    pub fn new(mode: ThemeMode, effective: EffectiveTheme, origin: ChangeOrigin) -> Self {
        Self {
            mode,
            effective,
            origin,
            at: Utc::now(),
        }
    }
}
