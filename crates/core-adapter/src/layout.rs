//! Sizing contract between adapter and host.
//!
//! Every cell and supplementary element is laid out inside a [`SizeRange`]
//! whose width is pinned to the usable host width and whose height is
//! unbounded, so content sizes itself vertically. [`FlowSizing`] is the
//! default policy for single-column lists; custom layouts supply their own
//! [`SizingPolicy`].

use bitflags::bitflags;
use crate::host::Insets;
use core_model::IndexPath;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScrollDirections: u8 {
        const RIGHT = 0b0001;
        const LEFT  = 0b0010;
        const UP    = 0b0100;
        const DOWN  = 0b1000;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL   = Self::UP.bits() | Self::DOWN.bits();
    }
}

impl ScrollDirections {
    pub fn is_vertical(self) -> bool {
        self.intersects(Self::VERTICAL) && !self.intersects(Self::HORIZONTAL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Minimum/maximum bounding box a laid-out element must fit in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min: Size,
    pub max: Size,
}

impl SizeRange {
    /// Fixed width, height free between 0 and `f32::MAX`.
    pub fn fixed_width(width: f32) -> Self {
        Self {
            min: Size::new(width, 0.0),
            max: Size::new(width, f32::MAX),
        }
    }

    pub fn contains(&self, size: Size) -> bool {
        size.width >= self.min.width
            && size.width <= self.max.width
            && size.height >= self.min.height
            && size.height <= self.max.height
    }
}

/// Host geometry snapshot handed to sizing policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub frame_width: f32,
    pub section_insets: Option<Insets>,
}

pub trait SizingPolicy {
    fn constrained_size(&self, ctx: &LayoutContext) -> SizeRange;

    fn constrained_size_for_item(&self, ctx: &LayoutContext, _index_path: IndexPath) -> SizeRange {
        self.constrained_size(ctx)
    }

    fn constrained_size_for_supplementary(
        &self,
        ctx: &LayoutContext,
        _kind: &str,
        _index_path: IndexPath,
    ) -> SizeRange {
        self.constrained_size(ctx)
    }

    fn scrollable_directions(&self) -> ScrollDirections {
        ScrollDirections::DOWN
    }
}

/// Single-column flow sizing: full usable width, self-sizing height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSizing {
    /// Horizontal inset subtracted when the host cannot report its insets.
    pub fallback_horizontal_inset: f32,
}

impl FlowSizing {
    pub const DEFAULT_FALLBACK_INSET: f32 = 32.0;

    pub const fn new(fallback_horizontal_inset: f32) -> Self {
        Self {
            fallback_horizontal_inset,
        }
    }
}

impl Default for FlowSizing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FALLBACK_INSET)
    }
}

impl SizingPolicy for FlowSizing {
    fn constrained_size(&self, ctx: &LayoutContext) -> SizeRange {
        let inset = ctx
            .section_insets
            .map(|i| i.horizontal())
            .unwrap_or(self.fallback_horizontal_inset);
        SizeRange::fixed_width((ctx.frame_width - inset).max(0.0))
    }
}
