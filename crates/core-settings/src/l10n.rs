//! Localization lookup.
//!
//! Catalog files are TOML. Keys may be written quoted
//! (`"settings.about" = "About"`) or as nested tables (`[settings] about =
//! "About"`); nested tables are flattened into dotted keys. Entries loaded
//! from a file overlay the built-in English strings, so a partial
//! translation still renders every row.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub trait Localizer {
    /// Display string for `key`; the key itself when no entry exists.
    fn localized(&self, key: &str) -> String;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading catalog {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing catalog {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("catalog entry `{key}` is not a string")]
    NotAString { key: String },
}

const BUILTIN_EN: &[(&str, &str)] = &[
    ("settings.general", "General"),
    ("settings.about", "About"),
    ("settings.reportProblem", "Report a problem"),
    ("settings.tellYourFriends", "Tell your friends"),
    ("settings.theme", "Theme"),
    ("settings.theme.light", "Light"),
    ("settings.theme.dark", "Dark"),
    ("settings.notifications", "Notifications"),
    ("settings.notifications.push", "Push notifications"),
    ("settings.notifications.newFollower", "New follower"),
    ("settings.legal", "Legal"),
    ("settings.legal.terms", "Terms of use"),
    ("settings.legal.privacy", "Privacy policy"),
    ("settings.legal.copyright", "Copyright"),
    ("settings.advanced", "Advanced"),
    ("settings.advanced.clearCache", "Clear cache"),
    (
        "settings.advanced.clearCache.footer",
        "Removes downloaded images and cached data.",
    ),
    ("settings.advanced.deleteProfile", "Delete profile"),
    ("settings.signOut", "Sign out"),
    ("settings.status.cacheCleared", "Cache cleared"),
    ("settings.status.unavailable", "Not available here"),
    ("settings.status.saveFailed", "Could not save preferences"),
    ("settings.status.hint", "j/k move  enter select  q quit"),
];

#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    strings: HashMap<String, String>,
}

impl StringCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in English strings for every settings key.
    pub fn builtin() -> Self {
        Self {
            strings: BUILTIN_EN
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Built-in strings overlaid with the entries of `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut catalog = Self::builtin();
        let added = catalog.merge_toml(&content).map_err(|e| match e {
            MergeError::Parse(source) => CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            },
            MergeError::NotAString(key) => CatalogError::NotAString { key },
        })?;
        debug!(target: "settings.l10n", path = %path.display(), added, "catalog_loaded");
        Ok(catalog)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    fn merge_toml(&mut self, content: &str) -> Result<usize, MergeError> {
        let table: toml::Table = toml::from_str(content).map_err(MergeError::Parse)?;
        let mut added = 0;
        flatten_into(&mut self.strings, String::new(), table, &mut added)?;
        Ok(added)
    }
}

enum MergeError {
    Parse(toml::de::Error),
    NotAString(String),
}

fn flatten_into(
    out: &mut HashMap<String, String>,
    prefix: String,
    table: toml::Table,
    added: &mut usize,
) -> Result<(), MergeError> {
    for (k, v) in table {
        let key = if prefix.is_empty() {
            k
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            toml::Value::String(s) => {
                out.insert(key, s);
                *added += 1;
            }
            toml::Value::Table(t) => flatten_into(out, key, t, added)?,
            _ => return Err(MergeError::NotAString(key)),
        }
    }
    Ok(())
}

impl Localizer for StringCatalog {
    fn localized(&self, key: &str) -> String {
        match self.get(key) {
            Some(s) => s.to_string(),
            None => {
                debug!(target: "settings.l10n", key, "missing_localization");
                key.to_string()
            }
        }
    }
}
