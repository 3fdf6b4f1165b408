//! Lookout Core
//!
//! This crate provides the pure building blocks of element observation:
//!
//! - **Geometry Sampling**: element rects, viewport size and scroll offset
//!   read from a [`Host`](lookout_platform::Host) with well-defined fallbacks
//! - **Viewability**: configurable axis-aligned "is it in view" test
//! - **Hover**: inclusive point-in-rect test
//! - **Layout Snapshots**: immutable [`LayoutState`] values built by merging
//!   per-pass [`LayoutPatch`]es
//! - **Publication**: [`Published<T>`] latest-value cells with subscriptions
//!
//! Nothing here schedules work or holds subscriptions on the host; see
//! `lookout_scheduler` and `lookout_observe` for that.
//!
//! # Example
//!
//! ```rust
//! use lookout_core::{is_hovering, is_in_view, PointerPosition, Rect, ViewabilityConfig, ViewportMetrics};
//!
//! let card = Rect::from_xywh(10.0, 10.0, 100.0, 50.0);
//! assert!(is_hovering(&PointerPosition::new(110.0, 60.0), &card));
//!
//! let viewport = ViewportMetrics::new(800.0, 600.0);
//! assert!(is_in_view(&card, &viewport, &ViewabilityConfig::default()));
//! ```

pub mod geometry;
pub mod hover;
pub mod layout_state;
pub mod published;
pub mod viewability;

pub use geometry::{
    sample_rect, scroll_position, scroll_top, try_sample_rect, viewport_metrics, PointerPosition,
    Rect, ScrollPosition, ViewportMetrics,
};
pub use hover::is_hovering;
pub use layout_state::{LayoutPatch, LayoutState};
pub use published::{Published, SubscriberId, Subscription};
pub use viewability::{is_in_view, Offsets, ViewabilityConfig};
