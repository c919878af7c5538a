//! In-memory test doubles for the owner service
//!
//! [`MockOwnerApi`] and [`MockPushTransport`] let synchronization logic be
//! exercised deterministically, without a network: reads and writes can be
//! made to fail on demand, every write attempt is counted, and pushes are
//! injected through a handle.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch};

use huesync_core::{EffectiveTheme, ThemeMode};

use crate::api::OwnerThemeApi;
use crate::error::{ApiError, ApiResult, PushError};
use crate::push::{ChannelState, PushSubscription, PushTransport, PushUpdate};

/// In-memory owner service persistence surface
#[derive(Debug, Default)]
pub struct MockOwnerApi {
    mode: Mutex<Option<ThemeMode>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay: Mutex<Option<Duration>>,
    write_attempts: AtomicUsize,
    persisted: Mutex<Vec<EffectiveTheme>>,
}

impl MockOwnerApi {
    /// Create a service with no stored value
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service with a stored value
    pub fn with_mode(mode: ThemeMode) -> Self {
        Self {
            mode: Mutex::new(Some(mode)),
            ..Self::default()
        }
    }

    /// Make subsequent reads fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay reads by the given duration.
    ///
    /// Lets tests stage a slow initial fetch racing a fast push.
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    /// Number of write attempts, successful or not.
    ///
    /// This is the probe tests use to verify the write path is never
    /// invoked for values that originated remotely.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Themes that were successfully persisted, in order
    pub fn persisted(&self) -> Vec<EffectiveTheme> {
        self.persisted.lock().unwrap().clone()
    }
}

#[async_trait]
impl OwnerThemeApi for MockOwnerApi {
    async fn fetch_mode(&self) -> ApiResult<Option<ThemeMode>> {
        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Request("simulated read failure".to_string()));
        }
        Ok(*self.mode.lock().unwrap())
    }

    async fn persist_mode(&self, theme: EffectiveTheme) -> ApiResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Request("simulated write failure".to_string()));
        }

        *self.mode.lock().unwrap() = Some(theme.into());
        self.persisted.lock().unwrap().push(theme);
        Ok(())
    }
}

/// In-memory push transport; updates are injected via [`MockPushHandle`]
pub struct MockPushTransport {
    updates_rx: Mutex<Option<mpsc::Receiver<PushUpdate>>>,
    state_tx: watch::Sender<ChannelState>,
}

/// Injection side of a [`MockPushTransport`]
#[derive(Clone)]
pub struct MockPushHandle {
    updates_tx: mpsc::Sender<PushUpdate>,
    state_rx: watch::Receiver<ChannelState>,
}

impl MockPushTransport {
    /// Create a transport and the handle that feeds it
    pub fn channel() -> (Self, MockPushHandle) {
        let (updates_tx, updates_rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);

        let transport = Self {
            updates_rx: Mutex::new(Some(updates_rx)),
            state_tx,
        };
        let handle = MockPushHandle {
            updates_tx,
            state_rx,
        };
        (transport, handle)
    }
}

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn open(&self) -> Result<PushSubscription, PushError> {
        let updates_rx = self
            .updates_rx
            .lock()
            .unwrap()
            .take()
            .ok_or(PushError::AlreadyOpen)?;

        let (close_tx, close_rx) = oneshot::channel();
        let _ = self.state_tx.send(ChannelState::Connected);

        // Reflect teardown in the observable state, like the real transport.
        let state_tx = self.state_tx.clone();
        tokio::spawn(async move {
            let _ = close_rx.await;
            let _ = state_tx.send(ChannelState::Disconnected);
        });

        Ok(PushSubscription::new(
            updates_rx,
            self.state_tx.subscribe(),
            close_tx,
        ))
    }
}

impl MockPushHandle {
    /// Inject a pushed theme update.
    ///
    /// Returns `false` once the subscription has been torn down.
    pub async fn push(&self, theme: EffectiveTheme) -> bool {
        self.updates_tx.send(PushUpdate::new(theme)).await.is_ok()
    }

    /// Whether the subscription side has been dropped
    pub fn is_closed(&self) -> bool {
        self.updates_tx.is_closed()
    }

    /// Current channel state as seen by subscribers
    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api_read_write() {
        let api = MockOwnerApi::new();
        assert_eq!(api.fetch_mode().await.unwrap(), None);

        api.persist_mode(EffectiveTheme::Dark).await.unwrap();
        assert_eq!(api.fetch_mode().await.unwrap(), Some(ThemeMode::Dark));
        assert_eq!(api.write_attempts(), 1);
        assert_eq!(api.persisted(), vec![EffectiveTheme::Dark]);
    }

    #[tokio::test]
    async fn test_mock_api_failures() {
        let api = MockOwnerApi::with_mode(ThemeMode::Light);

        api.set_fail_reads(true);
        assert!(api.fetch_mode().await.is_err());

        api.set_fail_writes(true);
        assert!(api.persist_mode(EffectiveTheme::Dark).await.is_err());
        // Failed writes still count as attempts but never land.
        assert_eq!(api.write_attempts(), 1);
        assert!(api.persisted().is_empty());
    }

    #[tokio::test]
    async fn test_mock_push_delivery_and_teardown() {
        let (transport, handle) = MockPushTransport::channel();
        let mut subscription = transport.open().await.unwrap();
        assert_eq!(handle.state(), ChannelState::Connected);

        assert!(handle.push(EffectiveTheme::Light).await);
        let update = subscription.recv().await.unwrap();
        assert_eq!(update.theme, EffectiveTheme::Light);

        subscription.close();
        tokio::task::yield_now().await;
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_mock_push_single_subscription() {
        let (transport, _handle) = MockPushTransport::channel();
        let _subscription = transport.open().await.unwrap();
        assert!(matches!(
            transport.open().await,
            Err(PushError::AlreadyOpen)
        ));
    }
}
