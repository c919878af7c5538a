//! Command line for the huesync theme client
//!
//! `watch` runs the full synchronization client and logs every change and
//! channel state transition; `get` and `set` are one-shot operations against
//! the owner service with the local cache as fallback.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use huesync_client::{SyncConfig, ThemeSyncClient};
use huesync_core::{DesktopScheme, ThemeMode};
use huesync_remote::{HttpThemeApi, OwnerThemeApi};
use huesync_store::{FileThemeCache, ThemeCache};

#[derive(Parser)]
#[command(name = "huesync", version, about = "Owner-synchronized theme client")]
struct Cli {
    /// Owner service base URL
    #[arg(long, default_value = "http://localhost:5001")]
    owner_url: String,

    /// Local fallback cache file
    #[arg(long, default_value = "./huesync-data/theme")]
    cache_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the sync client and log theme changes until interrupted
    Watch,
    /// Print the current mode (owner service first, cache as fallback)
    Get,
    /// Select a mode: applied locally at once, synced best-effort
    Set {
        /// One of `light`, `dark`, `system`
        mode: ThemeMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config =
        SyncConfig::with_owner_base_url(&cli.owner_url).with_cache_path(&cli.cache_path);

    match cli.command {
        Command::Watch => watch(config).await,
        Command::Get => get(config).await,
        Command::Set { mode } => set(config, mode).await,
    }
}

async fn watch(config: SyncConfig) -> anyhow::Result<()> {
    let client = ThemeSyncClient::start(config)
        .await
        .context("failed to start theme client")?;

    info!(
        mode = %client.mode(),
        effective = %client.effective(),
        "Theme client running; press Ctrl-C to stop"
    );

    let mut events = client.subscribe_events();
    let mut channel_state = client.channel_state_watch();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => info!(
                    mode = %event.mode,
                    effective = %event.effective,
                    origin = ?event.origin,
                    "Theme changed"
                ),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dropped change events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = channel_state.changed() => {
                if changed.is_err() {
                    break;
                }
                info!(state = ?*channel_state.borrow_and_update(), "Push channel state");
            }
        }
    }

    client.shutdown().await;
    Ok(())
}

async fn get(config: SyncConfig) -> anyhow::Result<()> {
    let cache = FileThemeCache::new(&config.cache_path);
    let api = HttpThemeApi::new(&config.owner_base_url)?;

    let mode = match api.fetch_mode().await {
        Ok(Some(mode)) => mode,
        Ok(None) => cache.load().unwrap_or(None).unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Owner service unreachable, using cached value");
            cache.load().unwrap_or(None).unwrap_or_default()
        }
    };

    let effective = mode.resolve(&DesktopScheme);
    println!("{mode} (effective: {effective})");
    Ok(())
}

async fn set(config: SyncConfig, mode: ThemeMode) -> anyhow::Result<()> {
    // Two phases: the local cache takes the change unconditionally, then
    // the owner sync is best-effort. A sync failure is reported but does
    // not undo the local change.
    let cache = FileThemeCache::new(&config.cache_path);
    cache.store(mode).context("failed to write theme cache")?;

    let resolved = mode.resolve(&DesktopScheme);
    let api = HttpThemeApi::new(&config.owner_base_url)?;
    match api.persist_mode(resolved).await {
        Ok(()) => info!(mode = %mode, theme = %resolved, "Theme synced to owner service"),
        Err(e) => warn!(error = %e, "Theme saved locally; owner sync failed"),
    }

    println!("{mode}");
    Ok(())
}
