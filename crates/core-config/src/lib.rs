//! Configuration loading and parsing.
//!
//! Parses `listkit.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [layout]
//! fallback_horizontal_inset = 32.0
//!
//! [appearance]
//! theme = "dark"
//!
//! [paths]
//! strings = "strings.toml"
//! preferences = "prefs.toml"
//! ```
//!
//! Every field is optional. Unknown fields are ignored (TOML deserialization
//! tolerance). A missing file yields defaults; a file that fails to parse also
//! yields defaults, with a warning so the mistake is visible in the log.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "listkit.toml";
pub const DEFAULT_FALLBACK_INSET: f32 = 32.0;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LayoutConfig {
    #[serde(default = "LayoutConfig::default_fallback_inset")]
    pub fallback_horizontal_inset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fallback_horizontal_inset: Self::default_fallback_inset(),
        }
    }
}

impl LayoutConfig {
    const fn default_fallback_inset() -> f32 {
        DEFAULT_FALLBACK_INSET
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct AppearanceConfig {
    #[serde(default)]
    pub theme: ThemeName,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct PathsConfig {
    /// Localization catalog; the built-in English strings are used when absent.
    #[serde(default)]
    pub strings: Option<PathBuf>,
    /// Persisted preference file, read once at startup.
    #[serde(default)]
    pub preferences: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("listkit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Fallback inset for hosts that cannot report their own insets. Negative
    /// or non-finite values are replaced by the default.
    pub fn effective_fallback_inset(&self) -> f32 {
        let raw = self.file.layout.fallback_horizontal_inset;
        if raw.is_finite() && raw >= 0.0 {
            return raw;
        }
        info!(
            target: "config",
            raw,
            clamped = DEFAULT_FALLBACK_INSET,
            "fallback_inset_clamped"
        );
        DEFAULT_FALLBACK_INSET
    }

    pub fn theme(&self) -> ThemeName {
        self.file.appearance.theme
    }

    /// Resolve a configured path relative to the config file's directory when
    /// it is not absolute.
    pub fn resolve_path(&self, base: Option<&std::path::Path>, p: &std::path::Path) -> PathBuf {
        match base.and_then(|b| b.parent()) {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(level: Level, f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.layout.fallback_horizontal_inset, 32.0);
        assert_eq!(cfg.theme(), ThemeName::Light);
        assert!(cfg.file.paths.strings.is_none());
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            concat!(
                "[layout]\nfallback_horizontal_inset = 8.0\n",
                "[appearance]\ntheme = \"dark\"\n",
                "[paths]\nstrings = \"de.toml\"\npreferences = \"/tmp/prefs.toml\"\n",
            ),
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_fallback_inset(), 8.0);
        assert_eq!(cfg.theme(), ThemeName::Dark);
        assert_eq!(cfg.file.paths.strings, Some(PathBuf::from("de.toml")));
        assert_eq!(
            cfg.file.paths.preferences,
            Some(PathBuf::from("/tmp/prefs.toml"))
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[layout]\nfuture_knob = 3\n[extra]\nx = 1\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn parse_error_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[appearance]\ntheme = \"sepia\"\n").unwrap();
        let mut cfg = None;
        let log_output = capture(Level::WARN, || {
            cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        assert_eq!(cfg.unwrap().theme(), ThemeName::Light);
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
    }

    #[test]
    fn negative_inset_is_clamped_and_logged() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[layout]\nfallback_horizontal_inset = -4.0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let mut effective = 0.0;
        let log_output = capture(Level::INFO, || {
            effective = cfg.effective_fallback_inset();
        });
        assert_eq!(effective, DEFAULT_FALLBACK_INSET);
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("fallback_inset_clamped"));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let cfg = Config::default();
        let base = Path::new("/etc/listkit/listkit.toml");
        assert_eq!(
            cfg.resolve_path(Some(base), Path::new("strings.toml")),
            PathBuf::from("/etc/listkit/strings.toml")
        );
        assert_eq!(
            cfg.resolve_path(Some(base), Path::new("/abs/prefs.toml")),
            PathBuf::from("/abs/prefs.toml")
        );
        assert_eq!(
            cfg.resolve_path(None, Path::new("strings.toml")),
            PathBuf::from("strings.toml")
        );
    }
}
