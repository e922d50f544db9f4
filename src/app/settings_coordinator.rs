//! Settings persistence coordination.
//!
//! View preferences are stored as one JSON string in eframe's storage.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::ViewPreferences;

/// Storage key of the view preferences
pub const VIEW_PREFERENCES_KEY: &str = "view_preferences";

/// Coordinates settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Reads a JSON-encoded value from storage.
    ///
    /// # Returns
    /// `None` when there is no storage, no value under `key`, or the stored
    /// JSON does not decode into `T`.
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json_str = storage?.get_string(key)?;
        serde_json::from_str(&json_str)
            .inspect_err(|err| warn!(key, "ignoring stored setting: {err}"))
            .ok()
    }

    /// Writes a value to storage as JSON.
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => storage.set_string(key, json_str),
            Err(err) => warn!(key, "could not serialize setting: {err}"),
        }
    }

    /// Loads the view preferences, falling back to defaults.
    pub fn load_view_preferences(storage: Option<&dyn eframe::Storage>) -> ViewPreferences {
        Self::try_load_setting::<ViewPreferences>(storage, VIEW_PREFERENCES_KEY)
            .unwrap_or_default()
            .sanitized()
    }

    pub fn save_view_preferences(storage: &mut dyn eframe::Storage, preferences: &ViewPreferences) {
        Self::save_setting(storage, VIEW_PREFERENCES_KEY, preferences);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory storage for testing
    #[derive(Default)]
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_view_preferences_round_trip() {
        let mut storage = MockStorage::default();
        let prefs = ViewPreferences { ratio: 0.25, move_to_animation_ms: 400 };

        SettingsCoordinator::save_view_preferences(&mut storage, &prefs);
        let loaded = SettingsCoordinator::load_view_preferences(Some(&storage));
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_missing_storage_gives_defaults() {
        assert_eq!(SettingsCoordinator::load_view_preferences(None), ViewPreferences::default());
    }

    #[test]
    fn test_partial_and_corrupt_values() {
        let mut storage = MockStorage::default();
        storage.data.insert(VIEW_PREFERENCES_KEY.to_string(), r#"{"ratio": 2.0}"#.to_string());
        let loaded = SettingsCoordinator::load_view_preferences(Some(&storage));
        assert_eq!(loaded.ratio, 2.0);
        assert_eq!(loaded.move_to_animation_ms, ViewPreferences::default().move_to_animation_ms);

        storage.data.insert(VIEW_PREFERENCES_KEY.to_string(), "not json".to_string());
        assert_eq!(SettingsCoordinator::load_view_preferences(Some(&storage)), ViewPreferences::default());
    }

    #[test]
    fn test_generic_setting() {
        let mut storage = MockStorage::default();
        SettingsCoordinator::save_setting(&mut storage, "last_seed", &7u64);
        assert_eq!(SettingsCoordinator::try_load_setting::<u64>(Some(&storage), "last_seed"), Some(7));
        assert_eq!(SettingsCoordinator::try_load_setting::<u64>(Some(&storage), "other"), None);
    }
}
