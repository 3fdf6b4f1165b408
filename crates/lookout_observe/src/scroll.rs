//! Scroll watcher
//!
//! Calls a user callback with the document's vertical scroll offset.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lookout_core::scroll_top;
use lookout_platform::{EventKind, SharedHost};
use lookout_scheduler::{FrameThrottle, ThrottleMode};

use crate::config::ObserveConfig;
use crate::guard::ListenerGuard;

/// Scroll callback bound to an attach/detach lifetime
///
/// Detaches on drop.
pub struct ScrollWatcher {
    host: SharedHost,
    throttle: Rc<FrameThrottle>,
    top: Rc<Cell<f64>>,
    listener: RefCell<Option<ListenerGuard>>,
    attached: Cell<bool>,
}

impl ScrollWatcher {
    pub fn new<F>(host: SharedHost, mode: ThrottleMode, callback: F) -> Self
    where
        F: Fn(f64) + 'static,
    {
        let top = Rc::new(Cell::new(0.0));

        let sampler = host.clone();
        let last = top.clone();
        let throttle = FrameThrottle::new(host.clone(), mode, move || {
            let value = scroll_top(&*sampler);
            last.set(value);
            callback(value);
        })
        .labeled("scroll-watcher");

        Self {
            host,
            throttle: Rc::new(throttle),
            top,
            listener: RefCell::new(None),
            attached: Cell::new(false),
        }
    }

    /// Create a watcher using the configured scroll mode
    pub fn from_config<F>(host: SharedHost, config: &ObserveConfig, callback: F) -> Self
    where
        F: Fn(f64) + 'static,
    {
        Self::new(host, config.watchers.scroll_mode, callback)
    }

    /// Start watching
    ///
    /// The callback runs once immediately with the current offset.
    pub fn attach(&self) {
        if self.attached.get() {
            tracing::warn!("ScrollWatcher: attach while attached, dropping previous observation");
            self.detach();
        }

        let weak = Rc::downgrade(&self.throttle);
        let listener = ListenerGuard::add(
            &self.host,
            EventKind::Scroll,
            Rc::new(move |_| {
                if let Some(throttle) = weak.upgrade() {
                    throttle.trigger();
                }
            }),
        );
        match listener {
            Ok(guard) => *self.listener.borrow_mut() = Some(guard),
            Err(err) => tracing::warn!("ScrollWatcher: skipping Scroll listener: {}", err),
        }
        self.attached.set(true);

        self.throttle.run_now();
        if self.throttle.mode() == ThrottleMode::Continuous {
            self.throttle.trigger();
        }
        tracing::debug!("ScrollWatcher: attached at top={}", self.top.get());
    }

    /// Stop watching and cancel any pending callback
    pub fn detach(&self) {
        let guard = self.listener.borrow_mut().take();
        drop(guard);
        self.throttle.cancel();
        if self.attached.replace(false) {
            tracing::debug!("ScrollWatcher: detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Offset passed to the most recent callback
    pub fn top(&self) -> f64 {
        self.top.get()
    }

    /// Number of callback runs so far
    pub fn run_count(&self) -> u64 {
        self.throttle.run_count()
    }
}

impl Drop for ScrollWatcher {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ScrollWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollWatcher")
            .field("attached", &self.attached.get())
            .field("top", &self.top.get())
            .field("throttle", &self.throttle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_platform::{HeadlessHost, ScrollSource};

    fn recording(
        host: &Rc<HeadlessHost>,
        mode: ThrottleMode,
    ) -> (Rc<RefCell<Vec<f64>>>, ScrollWatcher) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let watcher = ScrollWatcher::new(host.clone(), mode, move |top| log.borrow_mut().push(top));
        (seen, watcher)
    }

    #[test]
    fn test_immediate_call_with_current_top() {
        let host = Rc::new(HeadlessHost::new());
        host.scroll_to(0.0, 40.0);
        let (seen, watcher) = recording(&host, ThrottleMode::Debounced);

        watcher.attach();
        assert_eq!(*seen.borrow(), vec![40.0]);
        assert_eq!(watcher.top(), 40.0);
    }

    #[test]
    fn test_debounced_scroll_burst() {
        let host = Rc::new(HeadlessHost::new());
        let (seen, watcher) = recording(&host, ThrottleMode::Debounced);
        watcher.attach();

        host.scroll_to(0.0, 10.0);
        host.scroll_to(0.0, 20.0);
        host.scroll_to(0.0, 30.0);
        host.tick_frame();

        assert_eq!(*seen.borrow(), vec![0.0, 30.0]);
    }

    #[test]
    fn test_falls_back_to_body_offset() {
        let host = Rc::new(HeadlessHost::new());
        host.set_scroll_source(ScrollSource::Window, None);
        host.set_scroll_source(ScrollSource::DocumentElement, None);
        host.set_scroll_source(ScrollSource::Body, Some((0.0, 75.0)));
        let (seen, watcher) = recording(&host, ThrottleMode::Debounced);

        watcher.attach();
        assert_eq!(*seen.borrow(), vec![75.0]);
    }

    #[test]
    fn test_continuous_detach_stops_loop() {
        let host = Rc::new(HeadlessHost::new());
        let (seen, watcher) = recording(&host, ThrottleMode::Continuous);
        watcher.attach();

        host.tick_frame();
        host.tick_frame();
        assert_eq!(seen.borrow().len(), 3);

        watcher.detach();
        watcher.detach();
        host.tick_frame();
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(host.total_listeners(), 0);
        assert_eq!(host.pending_frames(), 0);
        assert!(!watcher.is_attached());
    }

    #[test]
    fn test_no_window_still_reports_initial_top() {
        let host = Rc::new(HeadlessHost::new());
        host.set_window_available(false);
        let (seen, watcher) = recording(&host, ThrottleMode::Debounced);

        watcher.attach();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(host.total_listeners(), 0);
    }
}
