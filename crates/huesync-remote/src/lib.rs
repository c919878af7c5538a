//! # Huesync Remote
//!
//! Adapters for the owner service: the theme persistence endpoints over
//! HTTP and the realtime push channel over Server-Sent Events.
//!
//! Both surfaces are trait-abstracted ([`OwnerThemeApi`], [`PushTransport`])
//! so the synchronization logic in the client crate works identically
//! against the real service and the in-memory mocks in [`mock`].
//!
//! ## Push channel
//!
//! The push channel is a long-lived subscription with an explicit
//! lifecycle: [`PushTransport::open`] yields a [`PushSubscription`] that
//! delivers validated updates and exposes the channel state; closing (or
//! dropping) the subscription tears the transport down. Reconnects are
//! driven by the SSE protocol's own `retry:` interval — no custom backoff
//! is layered on top, and events missed while disconnected are only
//! recovered by the next full fetch.

pub mod api;
pub mod error;
pub mod mock;
pub mod push;
pub mod sse;

// Re-exports
pub use api::{HttpThemeApi, OwnerThemeApi};
pub use error::{ApiError, ApiResult, PushError};
pub use mock::{MockOwnerApi, MockPushHandle, MockPushTransport};
pub use push::{
    ChannelState, PushSubscription, PushTransport, PushUpdate, SseTransport, EVENTS_PATH,
    THEME_EVENT,
};
pub use sse::{SseFrame, SseParser};
