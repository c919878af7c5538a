//! End-to-end tests against an in-process owner service
//!
//! Stands up a real HTTP server with the theme read/write endpoints and the
//! SSE event stream, then drives the production adapters against it.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use tokio::sync::broadcast;
use tokio::time::timeout;

use huesync_core::{EffectiveTheme, ThemeMode};
use huesync_remote::{
    ChannelState, HttpThemeApi, OwnerThemeApi, PushTransport, SseTransport, THEME_EVENT,
};

const WAIT: Duration = Duration::from_secs(5);

struct OwnerState {
    mode: Mutex<Option<ThemeMode>>,
    events: broadcast::Sender<String>,
}

impl OwnerState {
    fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            mode: Mutex::new(None),
            events,
        }
    }

    /// Fan a raw event payload out to connected subscribers
    fn emit(&self, payload: &str) {
        let _ = self.events.send(payload.to_string());
    }
}

async fn read_theme(State(state): State<Arc<OwnerState>>) -> Json<serde_json::Value> {
    let mode = state.mode.lock().unwrap().map(|m| m.as_str());
    Json(serde_json::json!({ "mode": mode }))
}

async fn write_theme(
    State(state): State<Arc<OwnerState>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let raw = body.get("mode").and_then(|v| v.as_str()).unwrap_or("");
    match raw.parse::<EffectiveTheme>() {
        Ok(theme) => {
            *state.mode.lock().unwrap() = Some(theme.into());
            state.emit(&format!(r#"{{"mode":"{theme}"}}"#));
            Json(serde_json::json!({ "mode": theme.as_str() })).into_response()
        }
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn event_stream(
    State(state): State<Arc<OwnerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(data) => {
                    let event = Event::default().event(THEME_EVENT).data(data);
                    return Some((Ok(event), rx));
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream)
}

async fn spawn_owner_service() -> (String, Arc<OwnerState>) {
    let state = Arc::new(OwnerState::new());
    let app = Router::new()
        .route("/api/internal/theme", get(read_theme))
        .route("/api/internal/theme-sync", post(write_theme))
        .route("/api/internal/events", get(event_stream))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_reports_absent_then_present() {
    let (base, state) = spawn_owner_service().await;
    let api = HttpThemeApi::new(&base).unwrap();

    assert_eq!(api.fetch_mode().await.unwrap(), None);

    *state.mode.lock().unwrap() = Some(ThemeMode::Dark);
    assert_eq!(api.fetch_mode().await.unwrap(), Some(ThemeMode::Dark));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_persist_roundtrip() {
    let (base, _state) = spawn_owner_service().await;
    let api = HttpThemeApi::new(&base).unwrap();

    api.persist_mode(EffectiveTheme::Light).await.unwrap();
    assert_eq!(api.fetch_mode().await.unwrap(), Some(ThemeMode::Light));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_against_unreachable_service_errors() {
    // Nothing listens here; the adapter reports the failure and the caller
    // decides to fall back.
    let api = HttpThemeApi::new("http://127.0.0.1:9").unwrap();
    assert!(api.fetch_mode().await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sse_delivers_pushed_updates() {
    let (base, state) = spawn_owner_service().await;
    let transport = SseTransport::new(&base).unwrap();
    let mut subscription = transport.open().await.unwrap();

    let mut channel_state = subscription.state_watch();
    timeout(WAIT, channel_state.wait_for(|s| *s == ChannelState::Connected))
        .await
        .expect("connect timed out")
        .unwrap();

    state.emit(r#"{"mode":"light"}"#);

    let update = timeout(WAIT, subscription.recv())
        .await
        .expect("push timed out")
        .expect("stream closed");
    assert_eq!(update.theme, EffectiveTheme::Light);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sse_discards_malformed_payloads() {
    let (base, state) = spawn_owner_service().await;
    let transport = SseTransport::new(&base).unwrap();
    let mut subscription = transport.open().await.unwrap();

    let mut channel_state = subscription.state_watch();
    timeout(WAIT, channel_state.wait_for(|s| *s == ChannelState::Connected))
        .await
        .expect("connect timed out")
        .unwrap();

    // The invalid payload is dropped; the valid one that follows is the
    // first update the subscriber sees.
    state.emit(r#"{"mode":"purple"}"#);
    state.emit(r#"{"mode":"dark"}"#);

    let update = timeout(WAIT, subscription.recv())
        .await
        .expect("push timed out")
        .expect("stream closed");
    assert_eq!(update.theme, EffectiveTheme::Dark);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sse_close_tears_down() {
    let (base, _state) = spawn_owner_service().await;
    let transport = SseTransport::new(&base).unwrap();
    let subscription = transport.open().await.unwrap();

    let mut channel_state = subscription.state_watch();
    timeout(WAIT, channel_state.wait_for(|s| *s == ChannelState::Connected))
        .await
        .expect("connect timed out")
        .unwrap();

    subscription.close();

    timeout(
        WAIT,
        channel_state.wait_for(|s| *s == ChannelState::Disconnected),
    )
    .await
    .expect("teardown timed out")
    .unwrap();
}
