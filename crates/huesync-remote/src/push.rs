//! Realtime push channel
//!
//! A long-lived subscription to the owner service's event stream. The
//! production transport is Server-Sent Events over HTTP; incoming
//! `theme:update` events are validated strictly and anything malformed is
//! discarded without a state change.
//!
//! Delivery is at-most-once from the client's perspective: nothing is
//! replayed after a reconnect, and updates missed while disconnected are
//! only recovered by the next full fetch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use huesync_core::EffectiveTheme;

use crate::error::PushError;
use crate::sse::SseParser;

/// Event name carrying theme updates
pub const THEME_EVENT: &str = "theme:update";

/// Path of the owner service's event stream
pub const EVENTS_PATH: &str = "/api/internal/events";

/// Reconnect interval until the server dictates one via `retry:`
const DEFAULT_RETRY: Duration = Duration::from_millis(3000);

/// Capacity of the update delivery channel
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Connection state of the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No transport connection; a reconnect may be pending
    Disconnected,
    /// A connection attempt is in flight
    Connecting,
    /// Subscribed and receiving events
    Connected,
}

/// A validated theme update received from the push channel
#[derive(Debug, Clone)]
pub struct PushUpdate {
    /// The concrete theme the owner service fanned out
    pub theme: EffectiveTheme,
    /// Local arrival time, for observability only
    pub received_at: DateTime<Utc>,
}

impl PushUpdate {
    /// Create an update stamped with the current time
    pub fn new(theme: EffectiveTheme) -> Self {
        Self {
            theme,
            received_at: Utc::now(),
        }
    }
}

/// A push channel that can be opened into a subscription
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open the subscription.
    ///
    /// The returned handle delivers validated updates until it is closed
    /// or dropped; transport reconnects happen behind it.
    async fn open(&self) -> Result<PushSubscription, PushError>;
}

/// Handle to an open push subscription
pub struct PushSubscription {
    updates_rx: mpsc::Receiver<PushUpdate>,
    state_rx: watch::Receiver<ChannelState>,
    close_tx: Option<oneshot::Sender<()>>,
}

impl PushSubscription {
    /// Assemble a subscription from its channel halves.
    ///
    /// Used by transport implementations; consumers obtain subscriptions
    /// from [`PushTransport::open`].
    pub fn new(
        updates_rx: mpsc::Receiver<PushUpdate>,
        state_rx: watch::Receiver<ChannelState>,
        close_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            updates_rx,
            state_rx,
            close_tx: Some(close_tx),
        }
    }

    /// Receive the next update.
    ///
    /// Returns `None` once the transport has shut down for good.
    pub async fn recv(&mut self) -> Option<PushUpdate> {
        self.updates_rx.recv().await
    }

    /// Current channel state
    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    /// Watch channel state transitions
    pub fn state_watch(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    /// Explicitly tear the subscription down
    pub fn close(self) {
        // Drop runs the teardown.
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        if let Some(close_tx) = self.close_tx.take() {
            let _ = close_tx.send(());
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdatePayload {
    #[serde(default)]
    mode: Option<String>,
}

/// Decode a `theme:update` payload, discarding anything malformed.
///
/// Only the two concrete modes are accepted; `system` is not a value the
/// owner service fans out.
pub fn decode_update(data: &str) -> Option<EffectiveTheme> {
    let payload: UpdatePayload = match serde_json::from_str(data) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Discarding malformed push payload");
            return None;
        }
    };

    let raw = payload.mode?;
    match raw.parse::<EffectiveTheme>() {
        Ok(theme) => Some(theme),
        Err(e) => {
            warn!(error = %e, "Discarding push update with unrecognized mode");
            None
        }
    }
}

/// Production push transport: Server-Sent Events over HTTP
#[derive(Debug, Clone)]
pub struct SseTransport {
    client: reqwest::Client,
    events_url: String,
}

impl SseTransport {
    /// Create a transport for the given owner service base URL
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, PushError> {
        // No request timeout here: the event stream is meant to stay open.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PushError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            events_url: format!("{}{}", base_url.as_ref().trim_end_matches('/'), EVENTS_PATH),
        })
    }
}

#[async_trait]
impl PushTransport for SseTransport {
    async fn open(&self) -> Result<PushSubscription, PushError> {
        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);
        let (close_tx, close_rx) = oneshot::channel();

        let client = self.client.clone();
        let url = self.events_url.clone();
        tokio::spawn(run_subscription(client, url, updates_tx, state_tx, close_rx));

        Ok(PushSubscription::new(updates_rx, state_rx, close_tx))
    }
}

/// Connect-consume-reconnect loop behind an SSE subscription
async fn run_subscription(
    client: reqwest::Client,
    url: String,
    updates_tx: mpsc::Sender<PushUpdate>,
    state_tx: watch::Sender<ChannelState>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let mut retry = DEFAULT_RETRY;

    'outer: loop {
        let _ = state_tx.send(ChannelState::Connecting);

        let request = client.get(&url).header(ACCEPT, "text/event-stream").send();
        let response = tokio::select! {
            _ = &mut close_rx => break 'outer,
            response = request => response,
        };

        match response {
            Ok(response) if response.status().is_success() => {
                let _ = state_tx.send(ChannelState::Connected);
                debug!(url = %url, "Push channel connected");

                let mut stream = response.bytes_stream();
                let mut parser = SseParser::new();

                loop {
                    let chunk = tokio::select! {
                        _ = &mut close_rx => break 'outer,
                        chunk = stream.next() => chunk,
                    };

                    match chunk {
                        Some(Ok(bytes)) => {
                            for frame in parser.push(&bytes) {
                                if let Some(ms) = frame.retry {
                                    retry = Duration::from_millis(ms);
                                }
                                if frame.event != THEME_EVENT {
                                    continue;
                                }
                                if let Some(theme) = decode_update(&frame.data) {
                                    if updates_tx.send(PushUpdate::new(theme)).await.is_err() {
                                        // Subscriber is gone; stop for good.
                                        break 'outer;
                                    }
                                }
                            }
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "Push stream failed, reconnecting");
                            break;
                        }
                        None => {
                            debug!("Push stream ended, reconnecting");
                            break;
                        }
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "Push channel rejected, retrying");
            }
            Err(e) => {
                warn!(error = %e, "Push channel connect failed, retrying");
            }
        }

        let _ = state_tx.send(ChannelState::Disconnected);
        tokio::select! {
            _ = &mut close_rx => break 'outer,
            _ = tokio::time::sleep(retry) => {}
        }
    }

    let _ = state_tx.send(ChannelState::Disconnected);
    debug!("Push subscription closed");
}
