//! Headless host
//!
//! A deterministic in-memory [`Host`] for tests, demos and embedders that
//! have no windowing system. Geometry is set explicitly, events are
//! delivered with [`HeadlessHost::dispatch`] and frame callbacks only run
//! when [`HeadlessHost::tick_frame`] is called.
//!
//! ```ignore
//! use std::rc::Rc;
//! use lookout_platform::{ClientRect, HeadlessHost, HostEvent};
//!
//! let host = Rc::new(HeadlessHost::new());
//! let card = host.create_element(ClientRect::from_xywh(0.0, 500.0, 100.0, 200.0));
//!
//! host.dispatch(HostEvent::Scroll);
//! host.tick_frame();
//! ```

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{PlatformError, Result};
use crate::event::{EventKind, HostEvent};
use crate::host::{
    ClientRect, ElementId, FrameCallback, FrameHandle, Host, Listener, ListenerId, ObserverId,
    ResizeCallback, ScrollSource, ViewportSource,
};

/// Default headless viewport width
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
/// Default headless viewport height
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

struct HeadlessState {
    elements: SlotMap<ElementId, ClientRect>,
    viewports: FxHashMap<ViewportSource, (f64, f64)>,
    scroll: FxHashMap<ScrollSource, (f64, f64)>,
    listeners: SlotMap<ListenerId, (EventKind, Listener)>,
    observers: SlotMap<ObserverId, (ElementId, ResizeCallback)>,
    frames: SlotMap<FrameHandle, FrameCallback>,
    /// Request order of pending frames (cancelled handles are skipped)
    frame_order: Vec<FrameHandle>,
    window_available: bool,
    resize_observer: bool,
    frame_count: u64,
}

/// In-memory host driven explicitly by the caller
pub struct HeadlessHost {
    state: RefCell<HeadlessState>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Create a host with an 800x600 viewport, zero scroll and native
    /// resize observation enabled
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }

    /// Create a host with the given viewport size
    pub fn with_viewport(width: f64, height: f64) -> Self {
        let mut viewports = FxHashMap::default();
        viewports.insert(ViewportSource::Window, (width, height));
        viewports.insert(ViewportSource::DocumentElement, (width, height));

        let mut scroll = FxHashMap::default();
        scroll.insert(ScrollSource::Window, (0.0, 0.0));
        scroll.insert(ScrollSource::DocumentElement, (0.0, 0.0));
        scroll.insert(ScrollSource::Body, (0.0, 0.0));

        Self {
            state: RefCell::new(HeadlessState {
                elements: SlotMap::with_key(),
                viewports,
                scroll,
                listeners: SlotMap::with_key(),
                observers: SlotMap::with_key(),
                frames: SlotMap::with_key(),
                frame_order: Vec::new(),
                window_available: true,
                resize_observer: true,
                frame_count: 0,
            }),
        }
    }

    // =========================================================================
    // Host configuration
    // =========================================================================

    /// Toggle native per-element resize observation support
    pub fn set_resize_observer_supported(&self, supported: bool) {
        self.state.borrow_mut().resize_observer = supported;
    }

    /// Toggle the window object
    ///
    /// Without a window, window-sourced queries return `None` and listener
    /// registration fails with [`PlatformError::Unavailable`].
    pub fn set_window_available(&self, available: bool) {
        self.state.borrow_mut().window_available = available;
    }

    /// Set the viewport size on every source
    pub fn set_viewport(&self, width: f64, height: f64) {
        let mut state = self.state.borrow_mut();
        state
            .viewports
            .insert(ViewportSource::Window, (width, height));
        state
            .viewports
            .insert(ViewportSource::DocumentElement, (width, height));
    }

    /// Set or clear the viewport size of a single source
    pub fn set_viewport_source(&self, source: ViewportSource, size: Option<(f64, f64)>) {
        let mut state = self.state.borrow_mut();
        match size {
            Some(size) => state.viewports.insert(source, size),
            None => state.viewports.remove(&source),
        };
    }

    /// Set or clear the scroll offset of a single source
    pub fn set_scroll_source(&self, source: ScrollSource, offset: Option<(f64, f64)>) {
        let mut state = self.state.borrow_mut();
        match offset {
            Some(offset) => state.scroll.insert(source, offset),
            None => state.scroll.remove(&source),
        };
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Create an element with an initial bounding rect
    pub fn create_element(&self, rect: ClientRect) -> ElementId {
        self.state.borrow_mut().elements.insert(rect)
    }

    /// Remove an element; its rect becomes unmeasurable
    pub fn remove_element(&self, element: ElementId) {
        self.state.borrow_mut().elements.remove(element);
    }

    /// Move or resize an element
    ///
    /// Resize observers of the element are notified when its size changes.
    pub fn set_element_rect(&self, element: ElementId, rect: ClientRect) {
        let resized = {
            let mut state = self.state.borrow_mut();
            match state.elements.get_mut(element) {
                Some(current) => {
                    let resized = current.width != rect.width || current.height != rect.height;
                    *current = rect;
                    resized
                }
                None => false,
            }
        };

        if resized {
            self.notify_resize(element);
        }
    }

    // =========================================================================
    // Driving the host
    // =========================================================================

    /// Resize the viewport and deliver a `Resize` event
    pub fn resize_window(&self, width: f64, height: f64) -> usize {
        self.set_viewport(width, height);
        self.dispatch(HostEvent::Resize)
    }

    /// Scroll the document and deliver a `Scroll` event
    ///
    /// Element rects are viewport relative, so every element moves by the
    /// opposite of the scroll delta.
    pub fn scroll_to(&self, x: f64, y: f64) -> usize {
        {
            let mut state = self.state.borrow_mut();
            let (old_x, old_y) = state
                .scroll
                .get(&ScrollSource::Window)
                .copied()
                .unwrap_or((0.0, 0.0));
            let (dx, dy) = (old_x - x, old_y - y);

            for (_, rect) in state.elements.iter_mut() {
                *rect = rect.translated(dx, dy);
            }
            for offset in state.scroll.values_mut() {
                *offset = (x, y);
            }
        }
        self.dispatch(HostEvent::Scroll)
    }

    /// Deliver a window-level event to every listener registered for it
    ///
    /// Listeners may add or remove listeners while the event is being
    /// delivered; a listener removed mid-dispatch is not invoked.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: HostEvent) -> usize {
        let kind = event.kind();
        let targets: SmallVec<[(ListenerId, Listener); 4]> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, (k, _))| *k == kind)
            .map(|(id, (_, listener))| (id, listener.clone()))
            .collect();

        tracing::trace!("HeadlessHost: dispatch {:?} to {} listeners", kind, targets.len());

        let mut invoked = 0;
        for (id, listener) in targets {
            if !self.state.borrow().listeners.contains_key(id) {
                continue;
            }
            listener(&event);
            invoked += 1;
        }
        invoked
    }

    /// Notify the resize observers of an element
    ///
    /// Returns the number of observers notified.
    pub fn notify_resize(&self, element: ElementId) -> usize {
        let targets: SmallVec<[(ObserverId, ResizeCallback); 2]> = self
            .state
            .borrow()
            .observers
            .iter()
            .filter(|(_, (e, _))| *e == element)
            .map(|(id, (_, callback))| (id, callback.clone()))
            .collect();

        let mut notified = 0;
        for (id, callback) in targets {
            if !self.state.borrow().observers.contains_key(id) {
                continue;
            }
            callback(element);
            notified += 1;
        }
        notified
    }

    /// Run every frame callback that was pending when the tick started
    ///
    /// Callbacks requested while the tick runs are deferred to the next
    /// tick. Returns the number of callbacks run.
    pub fn tick_frame(&self) -> usize {
        let order = {
            let mut state = self.state.borrow_mut();
            state.frame_count += 1;
            std::mem::take(&mut state.frame_order)
        };

        let mut ran = 0;
        for handle in order {
            let callback = self.state.borrow_mut().frames.remove(handle);
            if let Some(callback) = callback {
                callback();
                ran += 1;
            }
        }

        tracing::trace!("HeadlessHost: frame tick ran {} callbacks", ran);
        ran
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of listeners registered for an event kind
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Number of listeners registered across all kinds
    pub fn total_listeners(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Number of active resize observations
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Number of frame callbacks waiting for the next tick
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Number of ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frame_count
    }
}

impl Host for HeadlessHost {
    fn bounding_client_rect(&self, element: ElementId) -> Option<ClientRect> {
        self.state.borrow().elements.get(element).copied()
    }

    fn viewport_size(&self, source: ViewportSource) -> Option<(f64, f64)> {
        let state = self.state.borrow();
        if source == ViewportSource::Window && !state.window_available {
            return None;
        }
        state.viewports.get(&source).copied()
    }

    fn scroll_offset(&self, source: ScrollSource) -> Option<(f64, f64)> {
        let state = self.state.borrow();
        if source == ScrollSource::Window && !state.window_available {
            return None;
        }
        state.scroll.get(&source).copied()
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) -> Result<ListenerId> {
        let mut state = self.state.borrow_mut();
        if !state.window_available {
            return Err(PlatformError::Unavailable("window".to_string()));
        }
        Ok(state.listeners.insert((kind, listener)))
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().listeners.remove(id).is_some()
    }

    fn supports_resize_observer(&self) -> bool {
        self.state.borrow().resize_observer
    }

    fn observe_resize(&self, element: ElementId, callback: ResizeCallback) -> Result<ObserverId> {
        let mut state = self.state.borrow_mut();
        if !state.resize_observer {
            return Err(PlatformError::Unsupported("resize observer".to_string()));
        }
        if !state.elements.contains_key(element) {
            return Err(PlatformError::UnknownElement(element));
        }
        Ok(state.observers.insert((element, callback)))
    }

    fn disconnect_observer(&self, id: ObserverId) -> bool {
        self.state.borrow_mut().observers.remove(id).is_some()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.frames.insert(callback);
        state.frame_order.push(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        state.frames.remove(handle);
        state.frame_order.retain(|queued| *queued != handle);
    }
}
