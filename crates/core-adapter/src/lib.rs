//! Section store to collection host adapter.
//!
//! A host (the scrollable collection widget) pulls data through
//! [`CollectionDataSource`] and layout constraints through [`LayoutInspector`];
//! application code pushes mutations through [`Adapter`]'s `add_*`, `remove`
//! and `clear_data` methods. Each mutation updates the [`SectionStore`] first
//! and then tells the host exactly what changed, so the counts the host last
//! saw always equal the store's counts by the time it queries again.
//!
//! Contract summary:
//! * Query methods are side-effect free.
//! * `model_at` is the one defensive read: out-of-range paths yield `None`
//!   because callers may hold stale index paths.
//! * Mutations trust their indices. An invalid index is a programming error
//!   and panics through slice indexing.
//! * Only `clear_data` issues a full reload, and it blocks until the host
//!   confirms the reload was applied.
//!
//! Threading: one owning context per adapter. The adapter does no locking;
//! callers marshal cross-thread work onto the host's update context first.
//! The host is borrowed for `'w`, so the borrow checker enforces that the
//! widget outlives the adapter.
//!
//! [`SectionStore`]: core_model::SectionStore

mod adapter;
pub mod host;
pub mod layout;
pub mod metrics;
pub mod recording;

pub use adapter::{Adapter, CollectionDataSource, LayoutInspector, NodeBlock};
pub use host::{CollectionHost, Insets, Registration};
pub use layout::{FlowSizing, LayoutContext, ScrollDirections, Size, SizeRange, SizingPolicy};
pub use metrics::{UpdateMetrics, UpdateMetricsSnapshot};
pub use recording::RecordingHost;
