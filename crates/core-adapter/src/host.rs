//! The collection host as seen from the adapter.
//!
//! Hosts are stateful widgets with interior mutability: every method takes
//! `&self` because the adapter only ever holds a shared, non-owning borrow.

use core_events::{CommitWaiter, UpdateBatch};

/// Horizontal/vertical content insets applied by the host's layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

/// Roles the adapter installed itself in when attaching to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registration {
    pub data_source: bool,
    pub layout_inspector: bool,
}

pub trait CollectionHost {
    /// Register a supplementary element kind so it may appear in any section.
    fn register_supplementary_kind(&self, kind: &'static str);

    /// Called once at adapter construction with the roles it took on.
    fn attach(&self, registration: Registration);

    /// Whether the host negotiates per-cell sizing with a layout inspector.
    fn supports_layout_inspection(&self) -> bool {
        false
    }

    /// Available width of the host's frame, in layout units.
    fn frame_width(&self) -> f32;

    /// Section insets when the host's layout exposes them; `None` otherwise.
    fn section_insets(&self) -> Option<Insets> {
        None
    }

    /// Apply an ordered group of incremental updates as a single step.
    fn apply(&self, batch: UpdateBatch);

    /// Schedule a full reload. The returned waiter resolves once the host has
    /// fully applied it.
    fn reload_data(&self) -> CommitWaiter;
}
