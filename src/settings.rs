use crate::store::{self, PersistentStore};
use serde::{Deserialize, Serialize};

const SETTINGS_KEY: &str = "settings";

/// Tunables for the selection and mastery policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Consecutive correct answers required to classify a word as mastered.
    pub mastery_threshold: u32,
    /// Probability of injecting a custom question on an eligible turn.
    pub custom_frequency: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mastery_threshold: 5,
            custom_frequency: 0.4,
        }
    }
}

impl Settings {
    pub fn load(store: &dyn PersistentStore) -> Self {
        store::load_or(store, SETTINGS_KEY, Settings::default())
    }

    pub fn save(&self, store: &mut dyn PersistentStore) {
        store::save(store, SETTINGS_KEY, self);
    }
}

/// Live settings access. Implementations must re-read the backing store
/// on every call rather than caching a copy across sessions.
pub trait SettingsProvider {
    fn settings(&self) -> Settings;
}

/// Store-backed provider; each call reflects the latest persisted values.
pub struct StoreSettings {
    store: Box<dyn PersistentStore>,
}

impl StoreSettings {
    pub fn new(store: Box<dyn PersistentStore>) -> Self {
        Self { store }
    }
}

impl SettingsProvider for StoreSettings {
    fn settings(&self) -> Settings {
        Settings::load(self.store.as_ref())
    }
}

/// Fixed settings for tests and one-shot runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedSettings(pub Settings);

impl SettingsProvider for FixedSettings {
    fn settings(&self) -> Settings {
        self.0
    }
}
