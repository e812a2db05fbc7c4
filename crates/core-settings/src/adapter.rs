use crate::l10n::Localizer;
use crate::models::{SectionHeader, SignOutRow, SwitchRow, TableRow, ThemeSettingRow};
use crate::prefs::{PreferenceKey, PreferenceStore};
use crate::row::{SettingsRow, SettingsSection};
use crate::theme::{ThemeHandle, ThemeSource, ThemeStyle};
use core_adapter::{Adapter, CollectionHost, FlowSizing, SizingPolicy};
use core_model::{Accessory, IndexPath, SectionModel, SharedModel};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::debug;

/// External collaborators consulted while building the screen.
pub struct SettingsEnvironment<'a> {
    pub localizer: &'a dyn Localizer,
    pub preferences: &'a dyn PreferenceStore,
    pub theme: ThemeHandle,
}

/// Adapter pre-populated with the five settings sections.
///
/// Dereferences to the wrapped [`Adapter`], so the host-facing query traits
/// and the mutation API stay available.
pub struct SettingsAdapter<'w, H: CollectionHost + ?Sized, S: SizingPolicy = FlowSizing> {
    adapter: Adapter<'w, H, S>,
    theme: ThemeHandle,
    push_notifications: Arc<SwitchRow>,
    new_follower: Arc<SwitchRow>,
}

impl<'w, H: CollectionHost + ?Sized> SettingsAdapter<'w, H, FlowSizing> {
    pub fn new(host: &'w H, env: SettingsEnvironment<'_>) -> Self {
        Self::with_sizing(host, env, FlowSizing::default())
    }
}

impl<'w, H: CollectionHost + ?Sized, S: SizingPolicy> SettingsAdapter<'w, H, S> {
    pub fn with_sizing(host: &'w H, env: SettingsEnvironment<'_>, sizing: S) -> Self {
        let l = env.localizer;
        let title = |row: SettingsRow| l.localized(row.title_key());
        let header = |section: SettingsSection| -> Option<SharedModel> {
            section
                .header_key()
                .map(|key| Arc::new(SectionHeader::new(l.localized(key))) as SharedModel)
        };
        let table = |row: SettingsRow| -> SharedModel { Arc::new(TableRow::new(title(row))) };
        let detail = |row: SettingsRow| -> SharedModel {
            Arc::new(TableRow::new(title(row)).with_accessory(Accessory::DetailIndicator))
        };

        let push_notifications = Arc::new(SwitchRow::new(
            title(SettingsRow::PushNotifications),
            env.preferences
                .get(PreferenceKey::PushNotificationsEnabled)
                .unwrap_or(false),
        ));
        let new_follower = Arc::new(SwitchRow::new(
            title(SettingsRow::NewFollower),
            env.preferences
                .get(PreferenceKey::NewFollowerNotificationsEnabled)
                .unwrap_or(false),
        ));

        let section = |s: SettingsSection, items: Vec<SharedModel>| {
            debug_assert_eq!(items.len(), s.row_count(), "{s:?} row count");
            let mut model = SectionModel::new(items);
            model.header_model = header(s);
            model
        };

        let sections = vec![
            section(
                SettingsSection::General,
                vec![
                    detail(SettingsRow::About),
                    table(SettingsRow::ReportProblem),
                    table(SettingsRow::ShareApp),
                    Arc::new(ThemeSettingRow {
                        title: title(SettingsRow::ThemeSetting),
                        light_label: l.localized(ThemeStyle::Light.label_key()),
                        dark_label: l.localized(ThemeStyle::Dark.label_key()),
                        theme: env.theme.clone(),
                    }) as SharedModel,
                ],
            ),
            section(
                SettingsSection::Notifications,
                vec![
                    push_notifications.clone() as SharedModel,
                    new_follower.clone() as SharedModel,
                ],
            ),
            section(
                SettingsSection::Legal,
                vec![
                    detail(SettingsRow::TermsOfUse),
                    detail(SettingsRow::PrivacyPolicy),
                    detail(SettingsRow::Copyright),
                ],
            ),
            section(
                SettingsSection::Advanced,
                vec![
                    Arc::new(
                        TableRow::new(title(SettingsRow::ClearCache))
                            .with_subtitle(l.localized("settings.advanced.clearCache.footer")),
                    ) as SharedModel,
                    detail(SettingsRow::DeleteProfile),
                ],
            ),
            section(
                SettingsSection::SignOut,
                vec![Arc::new(SignOutRow {
                    title: title(SettingsRow::SignOut),
                    theme: env.theme.clone(),
                }) as SharedModel],
            ),
        ];

        debug!(
            target: "settings",
            push = push_notifications.is_on(),
            new_follower = new_follower.is_on(),
            theme = ?env.theme.style(),
            "settings_built"
        );

        Self {
            adapter: Adapter::with_sizing(host, sections, sizing),
            theme: env.theme,
            push_notifications,
            new_follower,
        }
    }

    /// Symbolic row for a grid position; `None` outside the fixed layout.
    pub fn row_for_index_path(&self, index_path: IndexPath) -> Option<SettingsRow> {
        SettingsRow::from_index_path(index_path)
    }

    /// Switch model backing a notification row.
    pub fn switch(&self, row: SettingsRow) -> Option<&Arc<SwitchRow>> {
        match row {
            SettingsRow::PushNotifications => Some(&self.push_notifications),
            SettingsRow::NewFollower => Some(&self.new_follower),
            _ => None,
        }
    }

    pub fn theme(&self) -> &ThemeHandle {
        &self.theme
    }

    pub fn into_inner(self) -> Adapter<'w, H, S> {
        self.adapter
    }
}

impl<'w, H: CollectionHost + ?Sized, S: SizingPolicy> Deref for SettingsAdapter<'w, H, S> {
    type Target = Adapter<'w, H, S>;

    fn deref(&self) -> &Self::Target {
        &self.adapter
    }
}

impl<'w, H: CollectionHost + ?Sized, S: SizingPolicy> DerefMut for SettingsAdapter<'w, H, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.adapter
    }
}
