//! Lookout Host Abstraction Layer
//!
//! This crate provides the platform-agnostic surface an observer needs from
//! its environment: element geometry, viewport and scroll queries,
//! window-level event listeners, native per-element resize observation and
//! frame scheduling.
//!
//! # Architecture
//!
//! Everything is expressed through the [`Host`] trait. Hosts are
//! single-threaded: listeners and frame callbacks run on the thread that
//! owns the host, and the callback types are deliberately not `Send`.
//!
//! # Host Implementations
//!
//! - [`HeadlessHost`] - in-memory host driven explicitly by the caller
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use lookout_platform::*;
//!
//! let host = Rc::new(HeadlessHost::new());
//! let id = host.add_listener(EventKind::Scroll, Rc::new(|event| {
//!     println!("{:?}", event);
//! }))?;
//!
//! host.scroll_to(0.0, 120.0);
//! host.remove_listener(id);
//! ```

mod error;
mod event;
mod headless;
mod host;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use event::{EventKind, HostEvent};
pub use headless::{HeadlessHost, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
pub use host::{
    ClientRect, ElementId, FrameCallback, FrameHandle, Host, Listener, ListenerId, ObserverId,
    ResizeCallback, ScrollSource, SharedHost, ViewportSource,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{EventKind, HostEvent};
    pub use crate::headless::HeadlessHost;
    pub use crate::host::{
        ClientRect, ElementId, FrameHandle, Host, ListenerId, ObserverId, ScrollSource,
        SharedHost, ViewportSource,
    };
}
