//! # Huesync Store
//!
//! The in-process half of theme synchronization: an observable state holder
//! for the current [`ThemeMode`](huesync_core::ThemeMode), the local
//! fallback cache consulted before any network round trip, and the document
//! visual-marker model the resolved theme is painted onto.
//!
//! ## Components
//!
//! - [`ThemeStore`]: single source of truth, observable via a watch channel
//! - [`ThemeCache`] / [`FileThemeCache`] / [`InMemoryThemeCache`]: durable
//!   last-known-mode storage
//! - [`DocumentRoot`] / [`ThemedRegion`]: mutually exclusive `light`/`dark`
//!   markers on the root element plus propagation to opted-in regions
//!
//! All state mutation funnels through [`ThemeStore::apply`], so the three
//! write sources (local toggle, initial fetch, realtime push) share one
//! code path and differ only in their [`ChangeOrigin`](huesync_core::ChangeOrigin).

pub mod cache;
pub mod document;
pub mod error;
pub mod store;

// Re-exports
pub use cache::{FileThemeCache, InMemoryThemeCache, ThemeCache};
pub use document::{DocumentRoot, ThemedRegion, THEMED_MARKER};
pub use error::CacheError;
pub use store::ThemeStore;
