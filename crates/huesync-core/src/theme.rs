//! Theme mode and effective theme types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseThemeModeError;
use crate::scheme::SystemScheme;

/// The owner-selected display preference.
///
/// `System` is not itself a displayable mode; it resolves to an
/// [`EffectiveTheme`] at read time via a [`SystemScheme`] query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light
    Light,
    /// Always dark
    Dark,
    /// Follow the environment's color-scheme preference
    #[default]
    System,
}

impl ThemeMode {
    /// All selectable modes, in menu order
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    /// Wire/cache string for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    /// Resolve this mode to a concrete theme.
    ///
    /// `Light` and `Dark` resolve to themselves; `System` queries the
    /// environment. Recomputed on every call, never cached.
    pub fn resolve(&self, scheme: &dyn SystemScheme) -> EffectiveTheme {
        match self {
            ThemeMode::Light => EffectiveTheme::Light,
            ThemeMode::Dark => EffectiveTheme::Dark,
            ThemeMode::System => scheme.preferred(),
        }
    }

    /// The concrete theme this mode names, or `None` for `System`
    pub fn as_concrete(&self) -> Option<EffectiveTheme> {
        match self {
            ThemeMode::Light => Some(EffectiveTheme::Light),
            ThemeMode::Dark => Some(EffectiveTheme::Dark),
            ThemeMode::System => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(ParseThemeModeError(other.to_string())),
        }
    }
}

/// The concrete display mode after resolving `system`.
///
/// Only `light` and `dark` exist at this level; this is the value applied to
/// the document markers and the only value ever sent to the owner service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    /// Light display mode
    Light,
    /// Dark display mode
    Dark,
}

impl EffectiveTheme {
    /// Marker class / wire string for this theme
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveTheme::Light => "light",
            EffectiveTheme::Dark => "dark",
        }
    }

    /// The other concrete theme
    pub fn opposite(&self) -> EffectiveTheme {
        match self {
            EffectiveTheme::Light => EffectiveTheme::Dark,
            EffectiveTheme::Dark => EffectiveTheme::Light,
        }
    }
}

impl fmt::Display for EffectiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectiveTheme {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(EffectiveTheme::Light),
            "dark" => Ok(EffectiveTheme::Dark),
            other => Err(ParseThemeModeError(other.to_string())),
        }
    }
}

impl From<EffectiveTheme> for ThemeMode {
    fn from(theme: EffectiveTheme) -> Self {
        match theme {
            EffectiveTheme::Light => ThemeMode::Light,
            EffectiveTheme::Dark => ThemeMode::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::FixedScheme;

    #[test]
    fn test_mode_roundtrip() {
        for mode in ThemeMode::ALL {
            let parsed: ThemeMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_mode_rejects_unknown_strings() {
        for bad in ["purple", "DARK", "Light ", "", "auto"] {
            assert!(bad.parse::<ThemeMode>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_effective_rejects_system() {
        assert!("system".parse::<EffectiveTheme>().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<ThemeMode>("\"system\"").unwrap(),
            ThemeMode::System
        );
        assert_eq!(
            serde_json::to_string(&EffectiveTheme::Light).unwrap(),
            "\"light\""
        );
    }

    #[test]
    fn test_resolve_concrete_ignores_scheme() {
        let dark_env = FixedScheme::dark();
        assert_eq!(ThemeMode::Light.resolve(&dark_env), EffectiveTheme::Light);
        assert_eq!(ThemeMode::Dark.resolve(&dark_env), EffectiveTheme::Dark);
    }

    #[test]
    fn test_resolve_system_follows_scheme() {
        let env = FixedScheme::dark();
        assert_eq!(ThemeMode::System.resolve(&env), EffectiveTheme::Dark);

        // Flipping the environment flips the resolution on the next read.
        env.set_dark(false);
        assert_eq!(ThemeMode::System.resolve(&env), EffectiveTheme::Light);
    }

    #[test]
    fn test_as_concrete() {
        assert_eq!(ThemeMode::Dark.as_concrete(), Some(EffectiveTheme::Dark));
        assert_eq!(ThemeMode::System.as_concrete(), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(EffectiveTheme::Light.opposite(), EffectiveTheme::Dark);
        assert_eq!(EffectiveTheme::Dark.opposite(), EffectiveTheme::Light);
    }
}
