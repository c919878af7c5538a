//! # Huesync Client
//!
//! The composition root of theme synchronization. [`ThemeSyncClient`] wires
//! the observable store, the local fallback cache, the owner service
//! persistence adapter, and the realtime push listener into a running
//! client with explicit startup and shutdown.
//!
//! ## Startup sequence
//!
//! 1. The store initializes from the fallback cache and paints the initial
//!    markers — the UI renders before any network round trip.
//! 2. A one-shot fetch asks the owner service for the authoritative value;
//!    a returned value overwrites local state and cache, a failure falls
//!    back silently.
//! 3. The push listener subscribes; any accepted update is applied
//!    immediately, whether or not the fetch has resolved. No ordering is
//!    enforced between the two — last write wins by arrival time.
//! 4. The persistence worker drains the store's sync queue, writing each
//!    explicit local toggle to the owner service best-effort.
//!
//! ## Shutdown
//!
//! A broadcast signal stops all three tasks, the push subscription is
//! explicitly closed, and the in-flight fetch is abandoned rather than
//! applied to a torn-down client.

pub mod config;
pub mod error;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use huesync_core::{
    ChangeOrigin, DesktopScheme, EffectiveTheme, SystemScheme, ThemeEvent, ThemeMode,
};
use huesync_remote::{
    ChannelState, HttpThemeApi, OwnerThemeApi, PushTransport, SseTransport,
};
use huesync_store::{FileThemeCache, ThemeCache, ThemeStore};

pub use config::SyncConfig;
pub use error::SyncError;

/// A running theme synchronization client
pub struct ThemeSyncClient {
    store: Arc<ThemeStore>,
    channel_state: watch::Receiver<ChannelState>,
    shutdown_tx: broadcast::Sender<()>,
    tasks: Vec<JoinHandle<()>>,
}

impl ThemeSyncClient {
    /// Start a client with the production adapters: file cache, desktop
    /// scheme detection, HTTP persistence, and the SSE push channel.
    pub async fn start(config: SyncConfig) -> Result<Self, SyncError> {
        let api = Arc::new(HttpThemeApi::new(&config.owner_base_url)?);
        let push = Arc::new(SseTransport::new(&config.owner_base_url)?);
        let cache = Arc::new(FileThemeCache::new(&config.cache_path));
        Self::start_with(config, api, push, cache, Arc::new(DesktopScheme)).await
    }

    /// Start a client with injected dependencies.
    ///
    /// This is the seam tests and embedders use; [`ThemeSyncClient::start`]
    /// is just this with the production implementations filled in.
    pub async fn start_with(
        config: SyncConfig,
        api: Arc<dyn OwnerThemeApi>,
        push: Arc<dyn PushTransport>,
        cache: Arc<dyn ThemeCache>,
        scheme: Arc<dyn SystemScheme>,
    ) -> Result<Self, SyncError> {
        let (sync_tx, mut sync_rx) = mpsc::channel(config.sync_queue_capacity.max(1));
        let store = Arc::new(ThemeStore::with_sync_queue(
            scheme,
            cache,
            sync_tx,
            config.event_channel_capacity,
        ));
        let (shutdown_tx, _) = broadcast::channel(1);
        let mut tasks = Vec::with_capacity(3);

        // Local-first: the cached value paints before any network activity.
        let initial = store.load_cached();
        info!(mode = %initial, "Theme client starting from cached mode");

        // One-shot authoritative fetch, raced against shutdown so a late
        // response is never applied to a torn-down client.
        {
            let api = Arc::clone(&api);
            let store = Arc::clone(&store);
            let mut shutdown_rx = shutdown_tx.subscribe();
            tasks.push(tokio::spawn(async move {
                let result = tokio::select! {
                    _ = shutdown_rx.recv() => return,
                    result = api.fetch_mode() => result,
                };
                match result {
                    Ok(Some(mode)) => {
                        store.apply(mode, ChangeOrigin::RemoteFetch);
                    }
                    Ok(None) => debug!("Owner service has no theme configured"),
                    Err(e) => warn!(error = %e, "Theme fetch failed, keeping local value"),
                }
            }));
        }

        // Push listener: accepted updates go through the internal apply
        // path, never the setter, so nothing is written back to the owner.
        let mut subscription = push.open().await?;
        let channel_state = subscription.state_watch();
        {
            let store = Arc::clone(&store);
            let mut shutdown_rx = shutdown_tx.subscribe();
            tasks.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        update = subscription.recv() => match update {
                            Some(update) => {
                                store.apply(update.theme.into(), ChangeOrigin::Push);
                            }
                            None => {
                                debug!("Push subscription ended");
                                break;
                            }
                        }
                    }
                }
                subscription.close();
            }));
        }

        // Persistence worker: each explicit toggle is synced best-effort;
        // a failure is logged and the local value stands.
        {
            let api = Arc::clone(&api);
            let mut shutdown_rx = shutdown_tx.subscribe();
            tasks.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        theme = sync_rx.recv() => match theme {
                            Some(theme) => {
                                if let Err(e) = api.persist_mode(theme).await {
                                    warn!(theme = %theme, error = %e, "Theme persistence failed; local value stands");
                                }
                            }
                            None => break,
                        }
                    }
                }
            }));
        }

        Ok(Self {
            store,
            channel_state,
            shutdown_tx,
            tasks,
        })
    }

    /// The underlying observable store
    pub fn store(&self) -> &Arc<ThemeStore> {
        &self.store
    }

    /// Current theme mode
    pub fn mode(&self) -> ThemeMode {
        self.store.mode()
    }

    /// Current mode resolved to a concrete theme
    pub fn effective(&self) -> EffectiveTheme {
        self.store.effective()
    }

    /// Explicit local toggle: applies immediately, persists in background
    pub fn set_mode(&self, mode: ThemeMode) {
        self.store.set_mode(mode);
    }

    /// Subscribe to mode changes
    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.store.subscribe()
    }

    /// Subscribe to change events with origin information
    pub fn subscribe_events(&self) -> broadcast::Receiver<ThemeEvent> {
        self.store.subscribe_events()
    }

    /// Current push channel state
    pub fn channel_state(&self) -> ChannelState {
        *self.channel_state.borrow()
    }

    /// Watch push channel state transitions
    pub fn channel_state_watch(&self) -> watch::Receiver<ChannelState> {
        self.channel_state.clone()
    }

    /// Stop all background tasks and close the push subscription
    pub async fn shutdown(mut self) {
        debug!("Theme client shutting down");
        let _ = self.shutdown_tx.send(());
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
    }
}
