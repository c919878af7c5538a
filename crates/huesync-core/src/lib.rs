//! # Huesync Core
//!
//! Core types, events, and errors for the huesync theme client stack.
//!
//! This crate provides the foundational abstractions shared by the store,
//! remote, and client crates, so that the same synchronization logic works
//! against both the real owner service and in-memory test doubles.
//!
//! ## Key Types
//!
//! - [`ThemeMode`]: the owner-selected display preference (`light`, `dark`,
//!   `system`)
//! - [`EffectiveTheme`]: the concrete display mode after resolving `system`
//!   against the environment
//! - [`ThemeEvent`]: a change notification carried to subscribers
//! - [`SystemScheme`]: abstraction over the environment's color-scheme
//!   preference (real detection for production, a fixed scheme for tests)

pub mod error;
pub mod event;
pub mod scheme;
pub mod theme;

// Re-export main types
pub use error::*;
pub use event::*;
pub use scheme::*;
pub use theme::*;
