//! Settings screen built on the generic adapter.
//!
//! Five fixed sections (general, notifications, legal, advanced, sign-out)
//! populated from localized strings and preference values read once at
//! construction. [`SettingsRow`] names every row; its index path mapping is a
//! static bijection over that layout, so consumers dispatch on what was
//! touched instead of on raw indices.

mod adapter;
pub mod l10n;
pub mod models;
pub mod prefs;
pub mod row;
pub mod theme;

pub use adapter::{SettingsAdapter, SettingsEnvironment};
pub use l10n::{CatalogError, Localizer, StringCatalog};
pub use prefs::{MemoryPreferences, PreferenceKey, PreferenceStore, TomlPreferences};
pub use row::{SettingsRow, SettingsSection};
pub use theme::{ThemeHandle, ThemeSource, ThemeStyle};
