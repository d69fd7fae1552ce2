//! Component store for drawerlight.
//!
//! The store keeps the component list in memory and mirrors it to a flat
//! JSON file. Every mutation rewrites the whole file; there are no partial
//! updates and no transactions.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::component::{Component, LED_COUNT, UNKNOWN_DRAWER};
use crate::error::{Error, Result};

/// File-backed list of components.
///
/// The in-memory list is the source of truth for a session; the file is
/// rewritten in full after each [`add`](Self::add) or
/// [`remove`](Self::remove).
#[derive(Debug)]
pub struct ComponentStore {
    /// Path to the JSON file.
    path: PathBuf,
    /// Components in file order.
    components: Vec<Component>,
}

impl ComponentStore {
    /// Load the store from `path`.
    ///
    /// If the file does not exist an empty store is returned and an empty
    /// list is written to disk, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// initial empty file cannot be written.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!("No component file at {}, creating one", path.display());
            let store = Self {
                path,
                components: Vec::new(),
            };
            store.save()?;
            return Ok(store);
        }

        debug!("Loading components from {}", path.display());
        let text = std::fs::read_to_string(&path).map_err(|source| Error::StoreRead {
            path: path.clone(),
            source,
        })?;
        let components: Vec<Component> =
            serde_json::from_str(&text).map_err(|source| Error::StoreParse {
                path: path.clone(),
                source,
            })?;

        for component in &components {
            if component.led >= LED_COUNT {
                warn!(
                    "Component '{}' uses LED index {} outside 0..{}",
                    component.name, component.led, LED_COUNT
                );
            }
        }

        info!("Loaded {} components", components.len());
        Ok(Self { path, components })
    }

    /// Create a store that is not yet backed by an existing file.
    ///
    /// Nothing is written until the first mutation or [`save`](Self::save).
    #[must_use]
    pub fn with_components(path: impl Into<PathBuf>, components: Vec<Component>) -> Self {
        Self {
            path: path.into(),
            components,
        }
    }

    /// Write the whole component list to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.components)?;
        std::fs::write(&self.path, json).map_err(|source| Error::StoreWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "Saved {} components to {}",
            self.components.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Get the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All components in store order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the store holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Find the first component with exactly this name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// The lowest LED index no component uses, if any.
    #[must_use]
    pub fn free_led(&self) -> Option<u8> {
        (0..LED_COUNT).find(|led| !self.components.iter().any(|c| c.led == *led))
    }

    /// Add a component and persist the store.
    ///
    /// The name is trimmed and must not be empty. A blank drawer is stored
    /// as `"?"`. The component gets the lowest free LED index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] or [`Error::LedCapacity`] without
    /// touching the store, or a write error if persisting fails.
    pub fn add(&mut self, name: &str, drawer: &str) -> Result<Component> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let drawer = match drawer.trim() {
            "" => UNKNOWN_DRAWER,
            d => d,
        };
        let led = self.free_led().ok_or(Error::LedCapacity)?;

        let component = Component::new(name, drawer, led);
        self.components.push(component.clone());
        self.save()?;

        info!(
            "Added component '{}' in drawer {} on LED {}",
            component.name,
            component.drawer,
            component.led_number()
        );
        Ok(component)
    }

    /// Remove the first component equal to `component` and persist.
    ///
    /// Returns `true` if a component was removed, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn remove(&mut self, component: &Component) -> Result<bool> {
        let Some(index) = self.components.iter().position(|c| c == component) else {
            debug!("Component '{}' not in store", component.name);
            return Ok(false);
        };

        self.components.remove(index);
        self.save()?;
        info!("Removed component '{}'", component.name);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ComponentStore {
        ComponentStore::load(dir.path().join("komponenter.json")).unwrap()
    }

    #[test]
    fn test_load_missing_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("komponenter.json");

        let store = ComponentStore::load(&path).unwrap();

        assert!(store.is_empty());
        assert!(path.exists());
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim(), "[]");
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("komponenter.json");
        std::fs::write(
            &path,
            r#"[{"name": "A", "drawer": "1", "led": 0}, {"name": "B", "led": 1}]"#,
        )
        .unwrap();

        let store = ComponentStore::load(&path).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.components()[0], Component::new("A", "1", 0));
        assert_eq!(store.components()[1].drawer, "?");
    }

    #[test]
    fn test_save_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("komponenter.json");
        std::fs::write(
            &path,
            r#"[{"name": "A", "drawer": "1", "led": 0, "datasheet": "a.pdf"}]"#,
        )
        .unwrap();

        let mut store = ComponentStore::load(&path).unwrap();
        store.add("B", "2").unwrap();

        let reloaded = ComponentStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.components()[0].extra["datasheet"], "a.pdf");
        assert!(reloaded.components()[1].extra.is_empty());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("komponenter.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ComponentStore::load(&path).unwrap_err();
        assert!(matches!(err, Error::StoreParse { .. }));
    }

    #[test]
    fn test_save_load_is_fixed_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("komponenter.json");
        let original = "[\n  {\n    \"name\": \"A\",\n    \"drawer\": \"1\",\n    \"led\": 0\n  },\n  {\n    \"name\": \"B\",\n    \"drawer\": \"2\",\n    \"led\": 1\n  }\n]";
        std::fs::write(&path, original).unwrap();

        let store = ComponentStore::load(&path).unwrap();
        store.save().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        let reloaded = ComponentStore::load(&path).unwrap();
        assert_eq!(reloaded.components(), store.components());
    }

    #[test]
    fn test_add_assigns_lowest_free_led() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(store.add("A", "1").unwrap().led, 0);
        assert_eq!(store.add("B", "2").unwrap().led, 1);
        assert_eq!(store.add("C", "3").unwrap().led, 2);

        let b = store.find("B").unwrap().clone();
        store.remove(&b).unwrap();
        assert_eq!(store.add("D", "4").unwrap().led, 1);
    }

    #[test]
    fn test_add_eighth_gets_led_seven() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        for i in 0..7 {
            store.add(&format!("part{i}"), "x").unwrap();
        }

        let last = store.add("last", "x").unwrap();
        assert_eq!(last.led, 7);
        assert_eq!(last.mask(), 128);
    }

    #[test]
    fn test_add_when_full_fails_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        for i in 0..8 {
            store.add(&format!("part{i}"), "x").unwrap();
        }
        let before = std::fs::read_to_string(store.path()).unwrap();

        let err = store.add("ninth", "x").unwrap_err();

        assert!(err.is_capacity_error());
        assert_eq!(store.len(), 8);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_add_empty_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        assert!(matches!(store.add("   ", "1"), Err(Error::EmptyName)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_trims_and_defaults_drawer() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let c = store.add("  NE555  ", "  ").unwrap();
        assert_eq!(c.name, "NE555");
        assert_eq!(c.drawer, "?");
    }

    #[test]
    fn test_add_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("A", "1").unwrap();

        let reloaded = ComponentStore::load(store.path()).unwrap();
        assert_eq!(reloaded.components(), &[Component::new("A", "1", 0)]);
    }

    #[test]
    fn test_remove_keeps_other_leds() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("A", "1").unwrap();
        let b = store.add("B", "2").unwrap();
        store.add("C", "3").unwrap();

        assert!(store.remove(&b).unwrap());

        assert_eq!(
            store.components(),
            &[Component::new("A", "1", 0), Component::new("C", "3", 2)]
        );
        let reloaded = ComponentStore::load(store.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_remove_only_first_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("komponenter.json");
        let dup = Component::new("A", "1", 0);
        let mut store = ComponentStore::with_components(&path, vec![dup.clone(), dup.clone()]);

        assert!(store.remove(&dup).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("A", "1").unwrap();

        let removed = store.remove(&Component::new("A", "other", 0)).unwrap();
        assert!(!removed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_free_led_fills_gaps() {
        let store = ComponentStore::with_components(
            "unused.json",
            vec![Component::new("A", "1", 0), Component::new("B", "2", 2)],
        );
        assert_eq!(store.free_led(), Some(1));
    }
}
