//! listkit entrypoint.
use anyhow::Result;
use clap::Parser;
use core_adapter::FlowSizing;
use core_config::{Config, ThemeName, discover, load_from};
use core_settings::{StringCatalog, ThemeHandle, ThemeStyle, TomlPreferences};
use core_terminal::host::dump;
use core_terminal::{SessionEvent, TerminalCapabilities, TerminalHost, TerminalSession};
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod app;

use app::{LoopControl, PreferenceFile, SettingsApp};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "listkit", version, about = "Sectioned list settings screen")]
struct Args {
    /// Optional configuration file path (overrides discovery of `listkit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Print the laid-out rows to stdout and exit.
    #[arg(long)]
    pub dump: bool,
    /// Column count to lay out for instead of the detected terminal width.
    #[arg(long)]
    pub width: Option<u16>,
}

/// Everything the screen needs, resolved from config before a host exists.
struct Bootstrap {
    config_path: PathBuf,
    catalog: StringCatalog,
    prefs: PreferenceFile,
    theme: ThemeHandle,
    sizing: FlowSizing,
}

impl Bootstrap {
    fn load(args: &Args) -> Result<Self> {
        let config_path = args.config.clone().unwrap_or_else(discover);
        let config = load_from(Some(config_path.clone()))?;

        let catalog = load_catalog(&config, &config_path);
        let prefs = load_preferences(&config, &config_path);
        let theme = ThemeHandle::new(match config.theme() {
            ThemeName::Light => ThemeStyle::Light,
            ThemeName::Dark => ThemeStyle::Dark,
        });
        let inset = config.effective_fallback_inset();

        info!(
            target: "runtime",
            config = %config_path.display(),
            config_found = config.raw.is_some(),
            theme = ?config.theme(),
            fallback_inset = inset,
            "bootstrap_complete"
        );

        Ok(Self {
            config_path,
            catalog,
            prefs,
            theme,
            sizing: FlowSizing::new(inset),
        })
    }

    fn into_app(self, host: &TerminalHost) -> SettingsApp<'_> {
        SettingsApp::new(host, self.catalog, self.prefs, self.theme, self.sizing)
    }
}

fn load_catalog(config: &Config, config_path: &Path) -> StringCatalog {
    let Some(strings) = config.file.paths.strings.as_deref() else {
        return StringCatalog::builtin();
    };
    let path = config.resolve_path(Some(config_path), strings);
    match StringCatalog::load(&path) {
        Ok(catalog) => catalog,
        Err(error) => {
            warn!(
                target: "runtime",
                path = %path.display(),
                error = %error,
                "catalog_load_failed"
            );
            StringCatalog::builtin()
        }
    }
}

/// Preferences from the configured file. A file that fails to load is never
/// written back: toggles then last for the session only, so a malformed line
/// cannot cost the user the entries that did parse.
fn load_preferences(config: &Config, config_path: &Path) -> PreferenceFile {
    let Some(prefs) = config.file.paths.preferences.as_deref() else {
        return PreferenceFile {
            store: TomlPreferences::default(),
            path: None,
        };
    };
    let path = config.resolve_path(Some(config_path), prefs);
    match TomlPreferences::load(&path) {
        Ok(store) => PreferenceFile {
            store,
            path: Some(path),
        },
        Err(error) => {
            warn!(
                target: "runtime",
                path = %path.display(),
                error = %format!("{error:#}"),
                "preferences_load_failed"
            );
            PreferenceFile {
                store: TomlPreferences::default(),
                path: None,
            }
        }
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("listkit.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "listkit.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn run_dump(app: &SettingsApp<'_>) -> Result<()> {
    let lines = app.host().layout(&**app.settings());
    let mut out = stdout().lock();
    out.write_all(dump(&lines).as_bytes())?;
    out.flush()?;
    Ok(())
}

fn run_interactive(app: &mut SettingsApp<'_>, fixed_width: bool) -> Result<()> {
    let mut session = TerminalSession::enter("listkit", fixed_width)?;

    let reason = loop {
        if app.host().needs_repaint() {
            let rows = session.rows();
            app.render(session.out(), rows)?;
        }
        match session.next_event(app.host())? {
            SessionEvent::Key(key) => {
                if app.handle_key(key) == LoopControl::Exit {
                    break if app.settings().store().is_empty() {
                        "signed_out"
                    } else {
                        "quit"
                    };
                }
            }
            SessionEvent::Resized => {}
        }
    };

    info!(target: "runtime", reason, "shutdown");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", dump = args.dump, width = args.width, "startup");

    let bootstrap = Bootstrap::load(&args)?;
    let caps = TerminalCapabilities::detect();
    let host = TerminalHost::new(args.width.unwrap_or(caps.columns));
    info!(
        target: "runtime",
        columns = host.columns(),
        rows = caps.rows,
        config = %bootstrap.config_path.display(),
        "host_ready"
    );
    let mut app = bootstrap.into_app(&host);

    if args.dump {
        return run_dump(&app);
    }
    run_interactive(&mut app, args.width.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::{ConfigFile, PathsConfig};
    use core_settings::SettingsRow;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn config_with_prefs(path: &Path) -> Config {
        Config {
            raw: None,
            file: ConfigFile {
                paths: PathsConfig {
                    strings: None,
                    preferences: Some(path.to_path_buf()),
                },
                ..ConfigFile::default()
            },
        }
    }

    fn toggle_push(prefs: PreferenceFile) {
        let host = TerminalHost::new(40);
        let mut app = SettingsApp::new(
            &host,
            StringCatalog::builtin(),
            prefs,
            ThemeHandle::default(),
            FlowSizing::default(),
        );
        while app.selected_row() != Some(SettingsRow::PushNotifications) {
            app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn malformed_preferences_are_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let original =
            "newFollowerNotificationsEnabled = true\npushNotificationsEnabled = = nope\n";
        std::fs::write(&path, original).unwrap();
        let config_path = dir.path().join("listkit.toml");

        let prefs = load_preferences(&config_with_prefs(&path), &config_path);
        assert!(prefs.path.is_none());
        toggle_push(prefs);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn readable_preferences_are_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "newFollowerNotificationsEnabled = true\n").unwrap();
        let config_path = dir.path().join("listkit.toml");

        let prefs = load_preferences(&config_with_prefs(&path), &config_path);
        assert_eq!(prefs.path.as_deref(), Some(path.as_path()));
        toggle_push(prefs);

        let stored = std::fs::read_to_string(&path).unwrap();
        assert!(stored.contains("pushNotificationsEnabled = true"));
        assert!(stored.contains("newFollowerNotificationsEnabled = true"));
    }

    #[test]
    fn relative_preference_path_resolves_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("listkit.toml");
        let config = config_with_prefs(Path::new("prefs.toml"));
        let prefs = load_preferences(&config, &config_path);
        assert_eq!(prefs.path, Some(dir.path().join("prefs.toml")));
    }
}
