use crate::error::Result;

/// Durable string key/value store, the counterpart of browser local storage.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
