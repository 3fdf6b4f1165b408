//! Lookout Observe
//!
//! Binds element observation to a consumer's lifetime. Attaching registers
//! listeners on a [`Host`](lookout_platform::Host), every burst of host
//! activity is coalesced into at most one pass per frame and channel, and
//! detaching (or dropping) releases everything that was registered.
//!
//! # Observers
//!
//! - [`LayoutObserver`] - full [`LayoutState`] snapshots: rect, viewport,
//!   scroll, pointer, hover and viewability
//! - [`ResizeWatcher`] - callback on window or element resize
//! - [`ScrollWatcher`] - callback with the document scroll offset
//! - [`RectWatcher`] - published element rect
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use lookout_observe::prelude::*;
//!
//! let host = Rc::new(HeadlessHost::new());
//! let card = host.create_element(ClientRect::from_xywh(0.0, 500.0, 100.0, 200.0));
//!
//! let observer = LayoutObserver::new(host.clone(), ObserveConfig::default());
//! observer.attach(Some(card));
//! assert!(observer.state().in_view);
//!
//! host.scroll_to(0.0, 400.0);
//! host.tick_frame();
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod layout;
pub mod orientation;
pub mod rect;
pub mod resize;
pub mod scroll;

mod sources;


pub use config::{ObserveConfig, WatcherConfig};
pub use error::{ConfigError, Result};
pub use guard::{ListenerGuard, ObserverGuard};
pub use layout::LayoutObserver;
pub use orientation::OrientationFollowUp;
pub use rect::RectWatcher;
pub use resize::ResizeWatcher;
pub use scroll::ScrollWatcher;

// Re-export the snapshot types consumers read
pub use lookout_core::{LayoutState, Published, Rect, Subscription, ViewabilityConfig};
pub use lookout_scheduler::ThrottleMode;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ObserveConfig;
    pub use crate::layout::LayoutObserver;
    pub use crate::rect::RectWatcher;
    pub use crate::resize::ResizeWatcher;
    pub use crate::scroll::ScrollWatcher;

    pub use lookout_core::{LayoutState, Offsets, PointerPosition, Rect, ViewabilityConfig};
    pub use lookout_platform::{ClientRect, ElementId, HeadlessHost, Host, HostEvent, SharedHost};
    pub use lookout_scheduler::ThrottleMode;
}
