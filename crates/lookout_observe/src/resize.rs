//! Resize watcher
//!
//! Calls a user callback when the window, or a single element, changes
//! size. The callback also runs once immediately on attach.

use std::cell::RefCell;
use std::rc::Rc;

use lookout_platform::{ElementId, SharedHost};
use lookout_scheduler::{FrameThrottle, ThrottleMode};

use crate::config::ObserveConfig;
use crate::sources::ResizeSources;

/// Resize callback bound to an attach/detach lifetime
///
/// In [`ThrottleMode::Continuous`] the callback runs every frame from
/// attach until detach. Detaches on drop.
pub struct ResizeWatcher {
    host: SharedHost,
    prefer_native: bool,
    throttle: Rc<FrameThrottle>,
    sources: RefCell<Option<ResizeSources>>,
}

impl ResizeWatcher {
    pub fn new<F>(host: SharedHost, mode: ThrottleMode, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let throttle = FrameThrottle::new(host.clone(), mode, callback).labeled("resize-watcher");
        Self {
            host,
            prefer_native: true,
            throttle: Rc::new(throttle),
            sources: RefCell::new(None),
        }
    }

    /// Create a watcher using the configured resize mode and native
    /// observation preference
    pub fn from_config<F>(host: SharedHost, config: &ObserveConfig, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let mut watcher = Self::new(host, config.watchers.resize_mode, callback);
        watcher.prefer_native = config.prefer_native_resize;
        watcher
    }

    /// Watch the window
    pub fn attach_window(&self) {
        self.connect(None);
    }

    /// Watch an element
    ///
    /// An absent element is a no-op that returns false.
    pub fn attach_element(&self, element: Option<ElementId>) -> bool {
        match element {
            Some(element) => {
                self.connect(Some(element));
                true
            }
            None => {
                tracing::trace!("ResizeWatcher: no element to attach yet");
                false
            }
        }
    }

    fn connect(&self, element: Option<ElementId>) {
        if self.is_attached() {
            tracing::warn!("ResizeWatcher: attach while attached, dropping previous observation");
            self.detach();
        }

        let weak = Rc::downgrade(&self.throttle);
        let sources = ResizeSources::connect(
            &self.host,
            element,
            self.prefer_native,
            Rc::new(move || {
                if let Some(throttle) = weak.upgrade() {
                    throttle.trigger();
                }
            }),
            "ResizeWatcher",
        );
        *self.sources.borrow_mut() = Some(sources);

        self.throttle.run_now();
        if self.throttle.mode() == ThrottleMode::Continuous {
            self.throttle.trigger();
        }
    }

    /// Stop watching and cancel any pending callback
    pub fn detach(&self) {
        let sources = self.sources.borrow_mut().take();
        self.throttle.cancel();
        if sources.is_some() {
            tracing::debug!("ResizeWatcher: detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sources.borrow().is_some()
    }

    /// Whether the current attach uses native resize observation
    pub fn uses_native_resize(&self) -> bool {
        self.sources
            .borrow()
            .as_ref()
            .is_some_and(ResizeSources::is_native)
    }

    /// Number of callback runs so far
    pub fn run_count(&self) -> u64 {
        self.throttle.run_count()
    }

    pub fn mode(&self) -> ThrottleMode {
        self.throttle.mode()
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ResizeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeWatcher")
            .field("sources", &self.sources.borrow())
            .field("throttle", &self.throttle)
            .finish()
    }
}
