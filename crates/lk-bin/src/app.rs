//! Interactive settings screen state: selection, activation and painting.

use anyhow::Result;
use core_adapter::{CollectionDataSource, FlowSizing};
use core_model::IndexPath;
use core_settings::{
    Localizer, PreferenceKey, SettingsAdapter, SettingsEnvironment, SettingsRow, StringCatalog,
    ThemeHandle, TomlPreferences,
};
use core_terminal::TerminalHost;
use core_terminal::host::viewport_top;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Preference file the switches write back to; `path` is `None` when no
/// file is configured and toggles only live for the session.
pub struct PreferenceFile {
    pub store: TomlPreferences,
    pub path: Option<PathBuf>,
}

pub struct SettingsApp<'w> {
    settings: SettingsAdapter<'w, TerminalHost>,
    catalog: StringCatalog,
    prefs: PreferenceFile,
    selected: Option<IndexPath>,
    top: usize,
    status: Option<String>,
}

impl<'w> SettingsApp<'w> {
    pub fn new(
        host: &'w TerminalHost,
        catalog: StringCatalog,
        prefs: PreferenceFile,
        theme: ThemeHandle,
        sizing: FlowSizing,
    ) -> Self {
        let settings = SettingsAdapter::with_sizing(
            host,
            SettingsEnvironment {
                localizer: &catalog,
                preferences: &prefs.store,
                theme,
            },
            sizing,
        );
        let mut app = Self {
            settings,
            catalog,
            prefs,
            selected: None,
            top: 0,
            status: None,
        };
        app.selected = app.selectable().first().copied();
        app
    }

    pub fn settings(&self) -> &SettingsAdapter<'w, TerminalHost> {
        &self.settings
    }

    pub fn host(&self) -> &'w TerminalHost {
        self.settings.host()
    }

    pub fn selected(&self) -> Option<IndexPath> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<SettingsRow> {
        self.selected
            .and_then(|ip| self.settings.row_for_index_path(ip))
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Item positions in layout order.
    fn selectable(&self) -> Vec<IndexPath> {
        let source: &dyn CollectionDataSource = &*self.settings;
        (0..source.section_count())
            .flat_map(|s| (0..source.item_count(s)).map(move |i| IndexPath::new(s, i)))
            .collect()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let items = self.selectable();
        let Some(last) = items.len().checked_sub(1) else {
            self.selected = None;
            return;
        };
        let current = self
            .selected
            .and_then(|ip| items.iter().position(|p| *p == ip))
            .unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        if next != current || self.selected.is_none() {
            self.selected = Some(items[next]);
            self.host().mark_dirty();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoopControl {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                LoopControl::Exit
            }
            KeyCode::Char('q') | KeyCode::Esc => LoopControl::Exit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                LoopControl::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                LoopControl::Continue
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => LoopControl::Continue,
        }
    }

    /// Act on the selected row.
    pub fn activate(&mut self) -> LoopControl {
        let Some(row) = self.selected_row() else {
            return LoopControl::Continue;
        };
        debug!(target: "runtime", ?row, "row_activated");
        self.status = None;
        match row {
            SettingsRow::PushNotifications | SettingsRow::NewFollower => self.toggle_switch(row),
            SettingsRow::ThemeSetting => {
                let style = self.settings.theme().toggle();
                info!(target: "runtime", ?style, "theme_toggled");
            }
            SettingsRow::ClearCache => {
                self.status = Some(self.catalog.localized("settings.status.cacheCleared"));
            }
            SettingsRow::SignOut => {
                self.settings.clear_data();
                self.selected = None;
                info!(target: "runtime", "signed_out");
                return LoopControl::Exit;
            }
            SettingsRow::About
            | SettingsRow::ReportProblem
            | SettingsRow::ShareApp
            | SettingsRow::TermsOfUse
            | SettingsRow::PrivacyPolicy
            | SettingsRow::Copyright
            | SettingsRow::DeleteProfile => {
                self.status = Some(self.catalog.localized("settings.status.unavailable"));
            }
        }
        self.host().mark_dirty();
        LoopControl::Continue
    }

    fn toggle_switch(&mut self, row: SettingsRow) {
        let (Some(switch), Some(key)) = (self.settings.switch(row), preference_key(row)) else {
            return;
        };
        let on = switch.toggle();
        self.prefs.store.set(key, on);
        if let Some(path) = self.prefs.path.as_deref() {
            if let Err(error) = self.prefs.store.store(path) {
                warn!(target: "runtime", error = %format!("{error:#}"), "preferences_store_failed");
                self.status = Some(self.catalog.localized("settings.status.saveFailed"));
            }
        }
    }

    /// Lay out and paint the screen into a `rows`-line window.
    pub fn render<W: Write>(&mut self, out: &mut W, rows: u16) -> Result<()> {
        let host = self.host();
        let lines = host.layout(&*self.settings);
        let body_rows = usize::from(rows.saturating_sub(1));
        self.top = viewport_top(&lines, self.selected, self.top, body_rows);
        let hint = self.catalog.localized("settings.status.hint");
        let status = self.status.as_deref().unwrap_or(hint.as_str());
        host.paint(out, &lines, self.top, rows, self.selected, Some(status))
    }
}

fn preference_key(row: SettingsRow) -> Option<PreferenceKey> {
    match row {
        SettingsRow::PushNotifications => Some(PreferenceKey::PushNotificationsEnabled),
        SettingsRow::NewFollower => Some(PreferenceKey::NewFollowerNotificationsEnabled),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::Accessory;
    use core_settings::{PreferenceStore, ThemeSource, ThemeStyle};
    use pretty_assertions::assert_eq;

    fn app(host: &TerminalHost, path: Option<PathBuf>) -> SettingsApp<'_> {
        SettingsApp::new(
            host,
            StringCatalog::builtin(),
            PreferenceFile {
                store: TomlPreferences::default(),
                path,
            },
            ThemeHandle::new(ThemeStyle::Light),
            FlowSizing::default(),
        )
    }

    fn press(app: &mut SettingsApp<'_>, code: KeyCode) -> LoopControl {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn select(app: &mut SettingsApp<'_>, row: SettingsRow) {
        while app.selected_row() != Some(row) {
            assert_eq!(press(app, KeyCode::Down), LoopControl::Continue);
        }
    }

    #[test]
    fn selection_starts_on_first_row_and_clamps() {
        let host = TerminalHost::new(40);
        let mut app = app(&host, None);
        assert_eq!(app.selected_row(), Some(SettingsRow::About));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_row(), Some(SettingsRow::About));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_row(), Some(SettingsRow::ReportProblem));
        for _ in 0..40 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected_row(), Some(SettingsRow::SignOut));
    }

    #[test]
    fn switch_toggles_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let host = TerminalHost::new(40);
        let mut app = app(&host, Some(path.clone()));

        select(&mut app, SettingsRow::NewFollower);
        press(&mut app, KeyCode::Enter);

        let content = (app
            .settings()
            .content_at(SettingsRow::NewFollower.index_path()))();
        assert_eq!(content.accessory, Accessory::Switch(true));
        let stored = TomlPreferences::load(&path).unwrap();
        assert_eq!(
            stored.get(PreferenceKey::NewFollowerNotificationsEnabled),
            Some(true)
        );
        assert!(app.status().is_none());
    }

    #[test]
    fn unwritable_preferences_surface_in_status() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let host = TerminalHost::new(40);
        let mut app = app(&host, Some(dir.path().to_path_buf()));
        select(&mut app, SettingsRow::PushNotifications);
        assert_eq!(press(&mut app, KeyCode::Char(' ')), LoopControl::Continue);
        assert_eq!(app.status(), Some("Could not save preferences"));
    }

    #[test]
    fn theme_row_flips_style() {
        let host = TerminalHost::new(40);
        let mut app = app(&host, None);
        select(&mut app, SettingsRow::ThemeSetting);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.settings().theme().style(), ThemeStyle::Dark);
    }

    #[test]
    fn clear_cache_reports_without_removing_rows() {
        let host = TerminalHost::new(40);
        let mut app = app(&host, None);
        let before = app.settings().item_count(SettingsRow::ClearCache.index_path().section);
        select(&mut app, SettingsRow::ClearCache);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status(), Some("Cache cleared"));
        assert_eq!(
            app.settings().item_count(SettingsRow::ClearCache.index_path().section),
            before
        );
    }

    #[test]
    fn sign_out_clears_and_exits() {
        let host = TerminalHost::new(40);
        let mut app = app(&host, None);
        select(&mut app, SettingsRow::SignOut);
        assert_eq!(press(&mut app, KeyCode::Enter), LoopControl::Exit);
        assert_eq!(app.settings().section_count(), 0);
        assert_eq!(host.reload_count(), 1);
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn quit_keys_exit() {
        let host = TerminalHost::new(40);
        let mut app = app(&host, None);
        assert_eq!(press(&mut app, KeyCode::Char('q')), LoopControl::Exit);
        assert_eq!(press(&mut app, KeyCode::Esc), LoopControl::Exit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), LoopControl::Exit);
    }

    #[test]
    fn render_scrolls_selection_into_view() {
        let host = TerminalHost::new(40);
        let mut app = app(&host, None);
        select(&mut app, SettingsRow::SignOut);
        let mut sink = Vec::new();
        app.render(&mut sink, 6).unwrap();
        assert!(!host.needs_repaint());
        let painted = String::from_utf8_lossy(&sink);
        assert!(painted.contains("Sign out"));
        assert!(!painted.contains("GENERAL"));
    }
}
