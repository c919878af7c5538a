//! Theme persistence endpoints
//!
//! The owner service stores a single authoritative theme value. Reads
//! tolerate an unconfigured service (`Ok(None)`); the caller treats a
//! failed read the same way and falls back to the local cache. Writes only
//! ever carry a concrete theme — `system` is resolved before it gets here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use huesync_core::{EffectiveTheme, ThemeMode};

use crate::error::{ApiError, ApiResult};

/// Path of the theme read endpoint
pub const THEME_PATH: &str = "/api/internal/theme";

/// Path of the theme write endpoint
pub const THEME_SYNC_PATH: &str = "/api/internal/theme-sync";

/// HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The owner service's theme persistence surface
#[async_trait]
pub trait OwnerThemeApi: Send + Sync {
    /// Read the stored mode.
    ///
    /// Returns `Ok(None)` when the service has no value configured. An
    /// `Err` means the service could not be reached or answered outside
    /// its contract; callers fall back to the local cache.
    async fn fetch_mode(&self) -> ApiResult<Option<ThemeMode>>;

    /// Persist a concrete theme.
    ///
    /// Failure is expected to be logged and swallowed by the caller — the
    /// local change it follows has already taken effect.
    async fn persist_mode(&self, theme: EffectiveTheme) -> ApiResult<()>;
}

#[derive(Debug, Deserialize)]
struct ThemeDoc {
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct PersistBody<'a> {
    mode: &'a str,
}

/// Production adapter over the owner service's HTTP endpoints
#[derive(Debug, Clone)]
pub struct HttpThemeApi {
    client: reqwest::Client,
    base: String,
}

impl HttpThemeApi {
    /// Create an adapter for the given base URL (trailing slash tolerated)
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: base_url.as_ref().trim_end_matches('/').to_string(),
        })
    }

    fn read_url(&self) -> String {
        format!("{}{}", self.base, THEME_PATH)
    }

    fn write_url(&self) -> String {
        format!("{}{}", self.base, THEME_SYNC_PATH)
    }
}

#[async_trait]
impl OwnerThemeApi for HttpThemeApi {
    async fn fetch_mode(&self) -> ApiResult<Option<ThemeMode>> {
        let url = self.read_url();
        debug!(url = %url, "Fetching owner theme");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // An unconfigured service is "absent", not an error.
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let doc: ThemeDoc =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

        match doc.mode {
            None => Ok(None),
            Some(raw) => match raw.parse::<ThemeMode>() {
                Ok(mode) => Ok(Some(mode)),
                Err(e) => {
                    warn!(error = %e, "Owner service returned an unrecognized mode");
                    Ok(None)
                }
            },
        }
    }

    async fn persist_mode(&self, theme: EffectiveTheme) -> ApiResult<()> {
        let url = self.write_url();
        debug!(url = %url, theme = %theme, "Persisting theme to owner service");

        let response = self
            .client
            .post(&url)
            .json(&PersistBody {
                mode: theme.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_tolerate_trailing_slash() {
        let api = HttpThemeApi::new("http://localhost:5001/").unwrap();
        assert_eq!(api.read_url(), "http://localhost:5001/api/internal/theme");
        assert_eq!(
            api.write_url(),
            "http://localhost:5001/api/internal/theme-sync"
        );
    }

    #[test]
    fn test_persist_body_wire_shape() {
        let body = PersistBody { mode: "dark" };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"mode":"dark"}"#);
    }

    #[test]
    fn test_theme_doc_tolerates_absent_mode() {
        let doc: ThemeDoc = serde_json::from_str(r#"{"mode":null}"#).unwrap();
        assert!(doc.mode.is_none());

        let doc: ThemeDoc = serde_json::from_str("{}").unwrap();
        assert!(doc.mode.is_none());

        let doc: ThemeDoc = serde_json::from_str(r#"{"mode":"light"}"#).unwrap();
        assert_eq!(doc.mode.as_deref(), Some("light"));
    }
}
