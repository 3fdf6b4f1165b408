//! Host trait and handle types

use std::rc::Rc;

use slotmap::new_key_type;

use crate::error::Result;
use crate::event::{EventKind, HostEvent};

new_key_type! {
    /// Opaque handle to a visual element owned by the host
    pub struct ElementId;
    /// Handle to a registered window-level listener
    pub struct ListenerId;
    /// Handle to a native per-element resize observation
    pub struct ObserverId;
    /// Handle to a pending frame callback
    pub struct FrameHandle;
}

impl ElementId {
    /// Convert to raw u64 for storage
    ///
    /// Hosts that keep their own element table can encode their handles
    /// with `from_raw` and recover them here.
    pub fn to_raw(&self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Reconstruct from raw u64
    pub fn from_raw(raw: u64) -> Self {
        slotmap::KeyData::from_ffi(raw).into()
    }
}

/// Listener invoked for window-level events
pub type Listener = Rc<dyn Fn(&HostEvent)>;

/// Callback invoked when an observed element changes size
pub type ResizeCallback = Rc<dyn Fn(ElementId)>;

/// Callback run once on the next frame tick
pub type FrameCallback = Box<dyn FnOnce()>;

/// Shared host reference handed to observers
pub type SharedHost = Rc<dyn Host>;

/// Raw bounding rectangle as reported by the host, viewport relative
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClientRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl ClientRect {
    /// Build a rect from its origin and size
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
            width,
            height,
            x,
            y,
        }
    }

    /// The same rect moved by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Where a host reads viewport dimensions from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportSource {
    /// The window's inner size
    Window,
    /// The document element's client size
    DocumentElement,
}

/// Where a host reads the document scroll offset from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollSource {
    /// The window's page offset
    Window,
    /// The document element's scroll offset
    DocumentElement,
    /// The body element's scroll offset
    Body,
}

/// Host abstraction trait
///
/// Implemented by each environment an observer can run in (a browser
/// binding, a native windowing layer, or [`crate::HeadlessHost`]).
///
/// Hosts are single-threaded: every callback is delivered on the thread
/// that owns the host, and none of the callback types are `Send`.
pub trait Host {
    /// Query the bounding rectangle of an element
    ///
    /// Returns `None` if the element is not (or no longer) measurable.
    fn bounding_client_rect(&self, element: ElementId) -> Option<ClientRect>;

    /// Query the viewport size `(width, height)` from a source
    fn viewport_size(&self, source: ViewportSource) -> Option<(f64, f64)>;

    /// Query the document scroll offset `(x, y)` from a source
    fn scroll_offset(&self, source: ScrollSource) -> Option<(f64, f64)>;

    /// Register a window-level listener
    fn add_listener(&self, kind: EventKind, listener: Listener) -> Result<ListenerId>;

    /// Remove a window-level listener
    ///
    /// Returns `false` if the listener was already gone.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Whether native per-element resize observation is available
    fn supports_resize_observer(&self) -> bool;

    /// Observe size changes of a single element
    fn observe_resize(&self, element: ElementId, callback: ResizeCallback) -> Result<ObserverId>;

    /// Disconnect a resize observation
    ///
    /// Returns `false` if the observation was already gone.
    fn disconnect_observer(&self, id: ObserverId) -> bool;

    /// Schedule a callback for the next frame tick
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending frame callback
    ///
    /// Cancelling a handle that already fired or was already cancelled
    /// is a no-op.
    fn cancel_frame(&self, handle: FrameHandle);
}
