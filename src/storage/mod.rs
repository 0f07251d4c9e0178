pub mod file;
pub mod memory;
pub mod traits;

use crate::{
    config::ClientConfig,
    error::Result,
    models::{PersistedSettings, SETTINGS_KEY},
};
use std::sync::Arc;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;
pub use traits::SettingsStore;

/// Reads and writes the numeric settings through whichever store backs it.
#[derive(Clone)]
pub struct SettingsManager {
    backend: Arc<dyn SettingsStore>,
}

impl SettingsManager {
    pub fn new(backend: Arc<dyn SettingsStore>) -> Self {
        Self { backend }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let path = config.resolved_settings_path();
        log::debug!("Settings file: {}", path.display());
        Self::new(Arc::new(FileSettingsStore::new(path)))
    }

    /// Stored settings, or `None` when nothing usable is stored. Failures
    /// are logged and never reach the user.
    pub fn load(&self) -> Option<PersistedSettings> {
        let raw = match self.backend.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("⚠️  Failed to load saved settings: {}", e);
                return None;
            }
        };

        match PersistedSettings::from_json(&raw) {
            Ok(settings) => {
                log::debug!(
                    "Loaded settings: {}x{}, steps={}",
                    settings.width,
                    settings.height,
                    settings.steps
                );
                Some(settings)
            }
            Err(e) => {
                log::warn!("⚠️  Failed to load saved settings: {}", e);
                None
            }
        }
    }

    pub fn save(&self, settings: &PersistedSettings) -> Result<()> {
        self.backend.set(SETTINGS_KEY, &settings.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let manager = SettingsManager::new(Arc::new(MemorySettingsStore::new()));
        assert_eq!(manager.load(), None);

        manager.save(&PersistedSettings::new(512, 768, 20)).unwrap();
        assert_eq!(manager.load(), Some(PersistedSettings::new(512, 768, 20)));
    }

    #[test]
    fn test_corrupted_value_loads_as_none() {
        let store = MemorySettingsStore::new().with_entry(SETTINGS_KEY, "{{{corrupt");
        let manager = SettingsManager::new(Arc::new(store));
        assert_eq!(manager.load(), None);
    }

    #[test]
    fn test_file_backed_manager_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::new().with_settings_path(dir.path().join("settings.json"));

        SettingsManager::from_config(&config)
            .save(&PersistedSettings::new(1280, 704, 35))
            .unwrap();

        let reopened = SettingsManager::from_config(&config);
        assert_eq!(reopened.load(), Some(PersistedSettings::new(1280, 704, 35)));
    }
}
