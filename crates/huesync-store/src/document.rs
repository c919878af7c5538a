//! Document visual markers
//!
//! A process-local model of the root visual element and the elements that
//! opt into theme-reactive styling. Applying an effective theme installs
//! exactly one of the mutually exclusive `light`/`dark` marker classes on
//! the root and propagates the same class to every registered region.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, Weak};

use huesync_core::EffectiveTheme;

/// Secondary marker carried by every region that opts into theming
pub const THEMED_MARKER: &str = "themed";

/// The root visual element's class set plus the registered themed regions
#[derive(Debug, Default)]
pub struct DocumentRoot {
    classes: RwLock<BTreeSet<String>>,
    regions: RwLock<Vec<Weak<ThemedRegion>>>,
    last_applied: RwLock<Option<EffectiveTheme>>,
}

impl DocumentRoot {
    /// Create a root with no markers applied
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the marker for `theme` and remove its opposite, on the root
    /// and on every live registered region. Dead regions are pruned.
    pub fn apply(&self, theme: EffectiveTheme) {
        {
            let mut classes = self.classes.write().unwrap();
            classes.remove(theme.opposite().as_str());
            classes.insert(theme.as_str().to_string());
        }

        let mut regions = self.regions.write().unwrap();
        regions.retain(|weak| match weak.upgrade() {
            Some(region) => {
                region.apply(theme);
                true
            }
            None => false,
        });

        *self.last_applied.write().unwrap() = Some(theme);
    }

    /// Register an element for theme-reactive styling.
    ///
    /// The region starts with the secondary marker and, if a theme has
    /// already been applied, is painted immediately.
    pub fn register_region(&self) -> Arc<ThemedRegion> {
        let region = Arc::new(ThemedRegion::new());
        if let Some(theme) = *self.last_applied.read().unwrap() {
            region.apply(theme);
        }
        self.regions.write().unwrap().push(Arc::downgrade(&region));
        region
    }

    /// Whether the root currently carries the given class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.read().unwrap().contains(class)
    }

    /// Snapshot of the root's classes
    pub fn classes(&self) -> Vec<String> {
        self.classes.read().unwrap().iter().cloned().collect()
    }

    /// Number of live registered regions
    pub fn region_count(&self) -> usize {
        self.regions
            .read()
            .unwrap()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// An element opted into theme-reactive styling
#[derive(Debug)]
pub struct ThemedRegion {
    classes: RwLock<BTreeSet<String>>,
}

impl ThemedRegion {
    fn new() -> Self {
        let mut classes = BTreeSet::new();
        classes.insert(THEMED_MARKER.to_string());
        Self {
            classes: RwLock::new(classes),
        }
    }

    fn apply(&self, theme: EffectiveTheme) {
        let mut classes = self.classes.write().unwrap();
        classes.remove(theme.opposite().as_str());
        classes.insert(theme.as_str().to_string());
    }

    /// Whether this region currently carries the given class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.read().unwrap().contains(class)
    }

    /// Snapshot of this region's classes
    pub fn classes(&self) -> Vec<String> {
        self.classes.read().unwrap().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_mutually_exclusive() {
        let root = DocumentRoot::new();

        root.apply(EffectiveTheme::Dark);
        assert!(root.has_class("dark"));
        assert!(!root.has_class("light"));

        root.apply(EffectiveTheme::Light);
        assert!(root.has_class("light"));
        assert!(!root.has_class("dark"));
    }

    #[test]
    fn test_regions_receive_markers() {
        let root = DocumentRoot::new();
        let region = root.register_region();

        assert!(region.has_class(THEMED_MARKER));

        root.apply(EffectiveTheme::Dark);
        assert!(region.has_class("dark"));
        assert!(!region.has_class("light"));
    }

    #[test]
    fn test_region_registered_after_apply_is_painted() {
        let root = DocumentRoot::new();
        root.apply(EffectiveTheme::Light);

        let region = root.register_region();
        assert!(region.has_class("light"));
    }

    #[test]
    fn test_dropped_regions_are_pruned() {
        let root = DocumentRoot::new();
        let region = root.register_region();
        assert_eq!(root.region_count(), 1);

        drop(region);
        root.apply(EffectiveTheme::Dark);
        assert_eq!(root.region_count(), 0);
    }
}
