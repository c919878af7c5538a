//! Environment color-scheme preference
//!
//! The [`SystemScheme`] trait abstracts the operating environment's
//! light/dark preference so that `ThemeMode::System` can be resolved with
//! real detection in production and a controllable value in tests.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::theme::EffectiveTheme;

/// Source of the environment's color-scheme preference
pub trait SystemScheme: Send + Sync {
    /// The theme the environment currently prefers
    fn preferred(&self) -> EffectiveTheme;
}

/// Detects the preference from the desktop environment.
///
/// Environments that report no preference read as light.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopScheme;

impl SystemScheme for DesktopScheme {
    fn preferred(&self) -> EffectiveTheme {
        match dark_light::detect() {
            dark_light::Mode::Dark => EffectiveTheme::Dark,
            dark_light::Mode::Light | dark_light::Mode::Default => EffectiveTheme::Light,
        }
    }
}

/// A scheme with a fixed, externally controlled preference.
///
/// Used by tests and headless deployments; the preference can be flipped at
/// runtime and takes effect on the next read.
#[derive(Debug)]
pub struct FixedScheme {
    dark: AtomicBool,
}

impl FixedScheme {
    /// Create a scheme preferring light
    pub fn light() -> Self {
        Self {
            dark: AtomicBool::new(false),
        }
    }

    /// Create a scheme preferring dark
    pub fn dark() -> Self {
        Self {
            dark: AtomicBool::new(true),
        }
    }

    /// Change the reported preference
    pub fn set_dark(&self, dark: bool) {
        self.dark.store(dark, Ordering::SeqCst);
    }
}

impl SystemScheme for FixedScheme {
    fn preferred(&self) -> EffectiveTheme {
        if self.dark.load(Ordering::SeqCst) {
            EffectiveTheme::Dark
        } else {
            EffectiveTheme::Light
        }
    }
}
