//! Layout observer
//!
//! A [`LayoutObserver`] tracks one element for as long as it is attached
//! and publishes a fresh [`LayoutState`] after every observation pass.
//!
//! # Channels
//!
//! Each kind of host activity feeds its own debounced [`FrameThrottle`],
//! so a burst of events of one kind costs at most one pass per frame:
//!
//! | Channel | Source                                   | Pass                       |
//! |---------|------------------------------------------|----------------------------|
//! | resize  | native observer, or window resize +      | full measurement           |
//! |         | orientation follow-up                    |                            |
//! | scroll  | window scroll                            | full measurement           |
//! | pointer | window pointer move                      | full measurement + pointer |
//!
//! Every pass samples rect, viewport and scroll together, so a published
//! snapshot never mixes values from different passes.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use lookout_observe::{LayoutObserver, ObserveConfig};
//!
//! let observer = LayoutObserver::new(host.clone(), ObserveConfig::default());
//! let _sub = observer.subscribe(|state| {
//!     if state.in_view {
//!         println!("visible at {:?}", state.rect);
//!     }
//! });
//!
//! observer.attach(Some(card));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use lookout_core::{LayoutPatch, LayoutState, PointerPosition, Published, Subscription};
use lookout_platform::{ElementId, EventKind, HostEvent, Listener, SharedHost};
use lookout_scheduler::FrameThrottle;
use smallvec::SmallVec;

use crate::config::ObserveConfig;
use crate::guard::ListenerGuard;
use crate::sources::ResizeSources;

struct ObserverInner {
    host: SharedHost,
    config: ObserveConfig,
    state: Published<LayoutState>,
    /// Element being tracked; `None` while detached
    element: Cell<Option<ElementId>>,
    /// Latest pointer position not yet folded into a snapshot
    pending_pointer: Cell<Option<PointerPosition>>,
    /// Pointer seen during the current attach; `None` until the first move
    last_pointer: Cell<Option<PointerPosition>>,
    passes: Cell<u64>,
    session: RefCell<Option<Session>>,
}

impl ObserverInner {
    /// One observation pass
    ///
    /// With `mouse` set the pass also records a new pointer position;
    /// otherwise hover is recomputed against the last pointer seen since
    /// attach, and is false if there has been none.
    fn measure(&self, mouse: Option<PointerPosition>) {
        let Some(element) = self.element.get() else {
            return;
        };

        if mouse.is_some() {
            self.last_pointer.set(mouse);
        }
        let pointer = self.last_pointer.get();
        let mut patch =
            LayoutPatch::measure(&*self.host, element, pointer, &self.config.viewability);
        if let Some(mouse) = mouse {
            patch = patch.with_mouse(mouse);
        }

        self.passes.set(self.passes.get() + 1);
        tracing::trace!(
            "LayoutObserver: pass #{} in_view={:?} hover={:?}",
            self.passes.get(),
            patch.in_view,
            patch.hover
        );
        self.state.update(|current| current.merge(&patch));
    }

    fn pointer_pass(&self) {
        if let Some(mouse) = self.pending_pointer.take() {
            self.measure(Some(mouse));
        }
    }
}

/// Everything one attach registered on the host
///
/// Fields drop in order: host registrations first, then the throttles,
/// which cancel their pending frames.
struct Session {
    element: ElementId,
    resize_sources: ResizeSources,
    listeners: SmallVec<[ListenerGuard; 2]>,
    resize: Rc<FrameThrottle>,
    scroll: Rc<FrameThrottle>,
    pointer: Rc<FrameThrottle>,
}

impl Session {
    fn open(inner: &Rc<ObserverInner>, element: ElementId) -> Session {
        let host = &inner.host;
        let config = &inner.config;

        let resize = Rc::new(channel(inner, "resize", |inner| inner.measure(None)));
        let scroll = Rc::new(channel(inner, "scroll", |inner| inner.measure(None)));
        let pointer = Rc::new(channel(inner, "pointer", ObserverInner::pointer_pass));

        let resize_sources = ResizeSources::connect(
            host,
            Some(element),
            config.prefer_native_resize,
            trigger_on(&resize),
            "LayoutObserver",
        );

        let mut listeners = SmallVec::new();

        if config.track_pointer {
            let weak_inner = Rc::downgrade(inner);
            let throttle = Rc::downgrade(&pointer);
            let listener: Listener = Rc::new(move |event| {
                let HostEvent::PointerMove { x, y } = *event else {
                    return;
                };
                let (Some(inner), Some(throttle)) = (weak_inner.upgrade(), throttle.upgrade())
                else {
                    return;
                };
                inner.pending_pointer.set(Some(PointerPosition::new(x, y)));
                throttle.trigger();
            });
            add_listener(host, EventKind::PointerMove, listener, &mut listeners);
        }

        if config.track_scroll {
            let on_scroll = trigger_on(&scroll);
            add_listener(host, EventKind::Scroll, Rc::new(move |_| on_scroll()), &mut listeners);
        }

        Session {
            element,
            resize_sources,
            listeners,
            resize,
            scroll,
            pointer,
        }
    }
}

/// Debounced channel throttle running `pass` on the observer
fn channel(
    inner: &Rc<ObserverInner>,
    label: &'static str,
    pass: fn(&ObserverInner),
) -> FrameThrottle {
    let weak: Weak<ObserverInner> = Rc::downgrade(inner);
    FrameThrottle::debounced(inner.host.clone(), move || {
        if let Some(inner) = weak.upgrade() {
            pass(&inner);
        }
    })
    .labeled(label)
}

fn trigger_on(throttle: &Rc<FrameThrottle>) -> Rc<dyn Fn()> {
    let weak = Rc::downgrade(throttle);
    Rc::new(move || {
        if let Some(throttle) = weak.upgrade() {
            throttle.trigger();
        }
    })
}

fn add_listener(
    host: &SharedHost,
    kind: EventKind,
    listener: Listener,
    listeners: &mut SmallVec<[ListenerGuard; 2]>,
) {
    match ListenerGuard::add(host, kind, listener) {
        Ok(guard) => listeners.push(guard),
        Err(err) => tracing::warn!("LayoutObserver: skipping {:?} listener: {}", kind, err),
    }
}

/// Tracks an element's geometry, viewability and hover state
///
/// Detaches on drop.
pub struct LayoutObserver {
    inner: Rc<ObserverInner>,
}

impl LayoutObserver {
    /// Create a detached observer
    ///
    /// Until the first attach the state is the all-zero snapshot.
    pub fn new(host: SharedHost, config: ObserveConfig) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                host,
                config,
                state: Published::new(LayoutState::default()),
                element: Cell::new(None),
                pending_pointer: Cell::new(None),
                last_pointer: Cell::new(None),
                passes: Cell::new(0),
                session: RefCell::new(None),
            }),
        }
    }

    /// Start tracking `element`
    ///
    /// An absent element is a no-op that returns false; call again once the
    /// element exists. Attaching while attached replaces the previous
    /// observation.
    pub fn attach(&self, element: Option<ElementId>) -> bool {
        let Some(element) = element else {
            tracing::trace!("LayoutObserver: no element to attach yet");
            return false;
        };

        if self.inner.session.borrow().is_some() {
            tracing::warn!("LayoutObserver: attach while attached, dropping previous observation");
            self.detach();
        }

        self.inner.element.set(Some(element));
        self.inner.measure(None);

        let session = Session::open(&self.inner, element);
        tracing::debug!(
            "LayoutObserver: attached to element {} (native resize: {}, listeners: {})",
            element.to_raw(),
            session.resize_sources.is_native(),
            session.listeners.len()
        );
        *self.inner.session.borrow_mut() = Some(session);
        true
    }

    /// Stop tracking
    ///
    /// Removes every listener, disconnects the native observer and cancels
    /// pending frames. Safe to call at any time, any number of times. The
    /// last snapshot stays readable.
    pub fn detach(&self) {
        let session = self.inner.session.borrow_mut().take();
        self.inner.element.set(None);
        self.inner.pending_pointer.set(None);
        self.inner.last_pointer.set(None);

        if let Some(session) = session {
            tracing::debug!(
                "LayoutObserver: detached from element {}",
                session.element.to_raw()
            );
            drop(session);
        }
    }

    /// Whether an element is being tracked
    pub fn is_attached(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    /// Element being tracked
    pub fn element(&self) -> Option<ElementId> {
        self.inner.element.get()
    }

    /// Latest snapshot
    pub fn state(&self) -> LayoutState {
        self.inner.state.get()
    }

    /// Subscribe to new snapshots
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LayoutState) + 'static,
    {
        self.inner.state.subscribe(callback)
    }

    /// Shared handle to the published snapshots
    pub fn published(&self) -> Published<LayoutState> {
        self.inner.state.clone()
    }

    /// Number of observation passes run so far
    pub fn pass_count(&self) -> u64 {
        self.inner.passes.get()
    }

    /// Whether the current attach uses native resize observation
    pub fn uses_native_resize(&self) -> bool {
        self.inner
            .session
            .borrow()
            .as_ref()
            .is_some_and(|session| session.resize_sources.is_native())
    }

    /// Whether any channel has a pass scheduled
    pub fn has_pending_pass(&self) -> bool {
        self.inner.session.borrow().as_ref().is_some_and(|session| {
            !(session.resize.is_idle() && session.scroll.is_idle() && session.pointer.is_idle())
        })
    }

    /// Configuration this observer was built with
    pub fn config(&self) -> &ObserveConfig {
        &self.inner.config
    }
}

impl Drop for LayoutObserver {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for LayoutObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutObserver")
            .field("element", &self.inner.element.get())
            .field("attached", &self.is_attached())
            .field("passes", &self.inner.passes.get())
            .field("state", &self.inner.state.get())
            .finish()
    }
}
