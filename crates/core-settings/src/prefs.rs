//! Persisted user preferences, read once when the settings screen is built.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    PushNotificationsEnabled,
    NewFollowerNotificationsEnabled,
}

impl PreferenceKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PushNotificationsEnabled => "pushNotificationsEnabled",
            Self::NewFollowerNotificationsEnabled => "newFollowerNotificationsEnabled",
        }
    }
}

pub trait PreferenceStore {
    fn bool_value(&self, key: &str) -> Option<bool>;

    fn get(&self, key: PreferenceKey) -> Option<bool> {
        self.bool_value(key.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: PreferenceKey, value: bool) -> Self {
        self.values.insert(key.as_str().to_string(), value);
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn bool_value(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }
}

/// Top-level boolean entries of a TOML file. Non-boolean entries are
/// skipped; a missing file is an empty store.
#[derive(Debug, Clone, Default)]
pub struct TomlPreferences {
    values: HashMap<String, bool>,
}

impl TomlPreferences {
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: "settings.prefs", path = %path.display(), "preferences_missing");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading preferences {}", path.display()));
            }
        };
        let table: toml::Table = toml::from_str(&content)
            .with_context(|| format!("parsing preferences {}", path.display()))?;
        let mut values = HashMap::new();
        for (key, value) in table {
            match value {
                toml::Value::Boolean(b) => {
                    values.insert(key, b);
                }
                other => {
                    debug!(
                        target: "settings.prefs",
                        key = %key,
                        kind = other.type_str(),
                        "preference_skipped"
                    );
                }
            }
        }
        Ok(Self { values })
    }

    pub fn set(&mut self, key: PreferenceKey, value: bool) {
        self.values.insert(key.as_str().to_string(), value);
    }

    /// Write every boolean back to `path`. Entries that were skipped on load
    /// are not preserved.
    pub fn store(&self, path: &Path) -> Result<()> {
        let table: toml::Table = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), toml::Value::Boolean(*v)))
            .collect();
        let content = toml::to_string(&table).context("serializing preferences")?;
        std::fs::write(path, content)
            .with_context(|| format!("writing preferences {}", path.display()))?;
        debug!(
            target: "settings.prefs",
            path = %path.display(),
            entries = self.values.len(),
            "preferences_stored"
        );
        Ok(())
    }
}

impl PreferenceStore for TomlPreferences {
    fn bool_value(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_answers_typed_keys() {
        let p = MemoryPreferences::new().with(PreferenceKey::PushNotificationsEnabled, true);
        assert_eq!(p.get(PreferenceKey::PushNotificationsEnabled), Some(true));
        assert_eq!(p.get(PreferenceKey::NewFollowerNotificationsEnabled), None);
    }

    #[test]
    fn toml_store_keeps_only_booleans() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "pushNotificationsEnabled = true\nnewFollowerNotificationsEnabled = \"yes\"\n",
        )
        .unwrap();
        let p = TomlPreferences::load(tmp.path()).unwrap();
        assert_eq!(p.get(PreferenceKey::PushNotificationsEnabled), Some(true));
        assert_eq!(p.get(PreferenceKey::NewFollowerNotificationsEnabled), None);
    }

    #[test]
    fn stored_values_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let mut p = TomlPreferences::load(&path).unwrap();
        p.set(PreferenceKey::NewFollowerNotificationsEnabled, true);
        p.store(&path).unwrap();
        let reloaded = TomlPreferences::load(&path).unwrap();
        assert_eq!(
            reloaded.get(PreferenceKey::NewFollowerNotificationsEnabled),
            Some(true)
        );
        assert_eq!(reloaded.get(PreferenceKey::PushNotificationsEnabled), None);
    }

    #[test]
    fn missing_file_is_empty_store() {
        let p = TomlPreferences::load(Path::new("__missing_prefs__.toml")).unwrap();
        assert_eq!(p.bool_value("pushNotificationsEnabled"), None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "= nope").unwrap();
        let err = TomlPreferences::load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("parsing preferences"));
    }
}
