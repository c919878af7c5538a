//! Observable theme state holder
//!
//! [`ThemeStore`] is the single source of truth for the current
//! [`ThemeMode`] in a running client. Every write source — local toggle,
//! initial fetch, realtime push, cache load — funnels through
//! [`ThemeStore::apply`], which updates in-memory state, writes the fallback
//! cache, repaints the document markers, and notifies watchers.
//!
//! The explicit setter, [`ThemeStore::set_mode`], is a two-phase update:
//! the local apply happens synchronously, then the resolved concrete theme
//! is enqueued on the sync queue for best-effort remote persistence. Values
//! that already originate from the owner service are applied with a
//! non-local [`ChangeOrigin`] and never touch the queue, so nothing is ever
//! written back to where it came from.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, warn};

use huesync_core::{ChangeOrigin, EffectiveTheme, SystemScheme, ThemeEvent, ThemeMode};

use crate::cache::ThemeCache;
use crate::document::DocumentRoot;

/// Default capacity of the change-event broadcast channel
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Single source of truth for the current theme mode
pub struct ThemeStore {
    scheme: Arc<dyn SystemScheme>,
    cache: Arc<dyn ThemeCache>,
    document: Arc<DocumentRoot>,
    mode_tx: watch::Sender<ThemeMode>,
    events_tx: broadcast::Sender<ThemeEvent>,
    /// Best-effort persistence queue; absent for local-only stores
    sync_tx: Option<mpsc::Sender<EffectiveTheme>>,
}

impl ThemeStore {
    /// Create a local-only store with no persistence queue attached
    pub fn new(scheme: Arc<dyn SystemScheme>, cache: Arc<dyn ThemeCache>) -> Self {
        Self::build(scheme, cache, None, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a store whose explicit sets feed the given persistence queue
    pub fn with_sync_queue(
        scheme: Arc<dyn SystemScheme>,
        cache: Arc<dyn ThemeCache>,
        sync_tx: mpsc::Sender<EffectiveTheme>,
        event_capacity: usize,
    ) -> Self {
        Self::build(scheme, cache, Some(sync_tx), event_capacity)
    }

    fn build(
        scheme: Arc<dyn SystemScheme>,
        cache: Arc<dyn ThemeCache>,
        sync_tx: Option<mpsc::Sender<EffectiveTheme>>,
        event_capacity: usize,
    ) -> Self {
        let (mode_tx, _) = watch::channel(ThemeMode::default());
        let (events_tx, _) = broadcast::channel(event_capacity.max(1));
        Self {
            scheme,
            cache,
            document: Arc::new(DocumentRoot::new()),
            mode_tx,
            events_tx,
            sync_tx,
        }
    }

    /// The current mode. Synchronous; never blocks.
    pub fn mode(&self) -> ThemeMode {
        *self.mode_tx.borrow()
    }

    /// The current mode resolved to a concrete theme.
    ///
    /// Recomputed on every call, so an environment preference change is
    /// reflected on the next read without any mode change.
    pub fn effective(&self) -> EffectiveTheme {
        self.mode().resolve(&*self.scheme)
    }

    /// Subscribe to mode changes
    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.mode_tx.subscribe()
    }

    /// Subscribe to change events with origin information
    pub fn subscribe_events(&self) -> broadcast::Receiver<ThemeEvent> {
        self.events_tx.subscribe()
    }

    /// The document markers this store paints
    pub fn document(&self) -> &Arc<DocumentRoot> {
        &self.document
    }

    /// Initialize from the fallback cache.
    ///
    /// Reads synchronously, applies the cached mode (or the default when
    /// nothing usable is cached), and paints the initial markers. Called
    /// once at startup, before any network round trip.
    pub fn load_cached(&self) -> ThemeMode {
        let mode = match self.cache.load() {
            Ok(Some(mode)) => mode,
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read theme cache, using default");
                ThemeMode::default()
            }
        };
        self.apply(mode, ChangeOrigin::CacheLoad);
        mode
    }

    /// Apply a mode from any source.
    ///
    /// Updates in-memory state, repaints the document markers, and — when
    /// the value actually changed — writes the fallback cache and notifies
    /// subscribers. Returns whether the value changed.
    ///
    /// This path never talks to the network; remote persistence is the
    /// setter's second phase.
    pub fn apply(&self, mode: ThemeMode, origin: ChangeOrigin) -> bool {
        let changed = self.mode_tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        });

        // Markers are repainted even for a no-op apply so that the first
        // apply after construction always paints the initial state.
        let effective = mode.resolve(&*self.scheme);
        self.document.apply(effective);

        if changed {
            // A cache-loaded value is already durable; everything else is
            // written back only after it took effect in memory.
            if origin != ChangeOrigin::CacheLoad {
                if let Err(e) = self.cache.store(mode) {
                    warn!(mode = %mode, error = %e, "Failed to write theme cache");
                }
            }

            debug!(mode = %mode, effective = %effective, origin = ?origin, "Theme applied");
            let _ = self
                .events_tx
                .send(ThemeEvent::new(mode, effective, origin));
        }

        changed
    }

    /// Explicit local setter: apply, then enqueue best-effort persistence.
    ///
    /// The enqueue is fire-and-forget; a full or closed queue is logged and
    /// dropped, and the local change stands either way. Only the resolved
    /// concrete theme is enqueued — the owner service never stores `system`.
    pub fn set_mode(&self, mode: ThemeMode) {
        self.apply(mode, ChangeOrigin::LocalSet);

        if let Some(sync_tx) = &self.sync_tx {
            let resolved = mode.resolve(&*self.scheme);
            if let Err(e) = sync_tx.try_send(resolved) {
                warn!(theme = %resolved, error = %e, "Dropping theme persistence request");
            }
        }
    }
}
