//! Resize notification sources
//!
//! Both the layout observer and the resize watcher learn about size
//! changes the same way: a native per-element observation when the host
//! has one, otherwise window `Resize` plus orientation changes with a
//! resize follow-up.

use std::rc::Rc;

use lookout_platform::{ElementId, EventKind, Listener, SharedHost};
use smallvec::SmallVec;

use crate::guard::{ListenerGuard, ObserverGuard};
use crate::orientation::OrientationFollowUp;

/// Everything registered on the host to hear about resizes
///
/// Dropping it releases every registration.
pub(crate) struct ResizeSources {
    native: Option<ObserverGuard>,
    listeners: SmallVec<[ListenerGuard; 2]>,
    follow_up: Option<Rc<OrientationFollowUp>>,
}

impl ResizeSources {
    /// Register resize sources that call `on_resize`
    ///
    /// Registration failures are logged and the affected source skipped.
    pub(crate) fn connect(
        host: &SharedHost,
        element: Option<ElementId>,
        prefer_native: bool,
        on_resize: Rc<dyn Fn()>,
        owner: &'static str,
    ) -> Self {
        let mut sources = Self {
            native: None,
            listeners: SmallVec::new(),
            follow_up: None,
        };

        let native = prefer_native && host.supports_resize_observer();
        if let Some(element) = element.filter(|_| native) {
            let notify = on_resize.clone();
            match ObserverGuard::observe(host, element, Rc::new(move |_| notify())) {
                Ok(guard) => {
                    tracing::debug!("{}: using native resize observation", owner);
                    sources.native = Some(guard);
                    return sources;
                }
                Err(err) => {
                    tracing::warn!(
                        "{}: native resize observation failed ({}), using window listeners",
                        owner,
                        err
                    );
                }
            }
        }

        let notify = on_resize.clone();
        sources.add(host, EventKind::Resize, Rc::new(move |_| notify()), owner);

        let follow_up = Rc::new(OrientationFollowUp::new(host.clone(), move || on_resize()));
        let weak = Rc::downgrade(&follow_up);
        sources.add(
            host,
            EventKind::OrientationChange,
            Rc::new(move |_| {
                if let Some(follow_up) = weak.upgrade() {
                    follow_up.arm();
                }
            }),
            owner,
        );
        sources.follow_up = Some(follow_up);

        tracing::debug!("{}: using window resize listeners", owner);
        sources
    }

    fn add(&mut self, host: &SharedHost, kind: EventKind, listener: Listener, owner: &'static str) {
        match ListenerGuard::add(host, kind, listener) {
            Ok(guard) => self.listeners.push(guard),
            Err(err) => tracing::warn!("{}: skipping {:?} listener: {}", owner, kind, err),
        }
    }

    /// Whether the native observation is in use
    pub(crate) fn is_native(&self) -> bool {
        self.native.is_some()
    }
}

impl std::fmt::Debug for ResizeSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeSources")
            .field("native", &self.native)
            .field("listeners", &self.listeners.len())
            .field("follow_up", &self.follow_up)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_platform::{ClientRect, HeadlessHost, HostEvent};
    use std::cell::Cell;

    fn counting() -> (Rc<Cell<u32>>, Rc<dyn Fn()>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Rc::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_native_when_supported() {
        let headless = Rc::new(HeadlessHost::new());
        let element = headless.create_element(ClientRect::from_xywh(0.0, 0.0, 10.0, 10.0));
        let host: SharedHost = headless.clone();
        let (count, on_resize) = counting();

        let sources = ResizeSources::connect(&host, Some(element), true, on_resize, "test");
        assert!(sources.is_native());
        assert_eq!(headless.observer_count(), 1);
        assert_eq!(headless.total_listeners(), 0);

        headless.notify_resize(element);
        assert_eq!(count.get(), 1);

        drop(sources);
        assert_eq!(headless.observer_count(), 0);
    }

    #[test]
    fn test_window_fallback() {
        let headless = Rc::new(HeadlessHost::new());
        headless.set_resize_observer_supported(false);
        let element = headless.create_element(ClientRect::from_xywh(0.0, 0.0, 10.0, 10.0));
        let host: SharedHost = headless.clone();
        let (count, on_resize) = counting();

        let sources = ResizeSources::connect(&host, Some(element), true, on_resize, "test");
        assert!(!sources.is_native());
        assert_eq!(headless.listener_count(EventKind::Resize), 1);
        assert_eq!(headless.listener_count(EventKind::OrientationChange), 1);

        headless.dispatch(HostEvent::OrientationChange);
        assert_eq!(headless.listener_count(EventKind::Resize), 2);

        // Both the regular listener and the follow-up hear this one
        headless.dispatch(HostEvent::Resize);
        assert_eq!(count.get(), 2);
        assert_eq!(headless.listener_count(EventKind::Resize), 1);

        drop(sources);
        assert_eq!(headless.total_listeners(), 0);
    }

    #[test]
    fn test_window_only_without_element() {
        let headless = Rc::new(HeadlessHost::new());
        let host: SharedHost = headless.clone();
        let (_count, on_resize) = counting();

        let sources = ResizeSources::connect(&host, None, true, on_resize, "test");
        assert!(!sources.is_native());
        assert_eq!(headless.observer_count(), 0);
        assert_eq!(headless.total_listeners(), 2);
    }

    #[test]
    fn test_native_failure_falls_back() {
        let headless = Rc::new(HeadlessHost::new());
        let element = headless.create_element(ClientRect::from_xywh(0.0, 0.0, 10.0, 10.0));
        headless.remove_element(element);
        let host: SharedHost = headless.clone();
        let (_count, on_resize) = counting();

        let sources = ResizeSources::connect(&host, Some(element), true, on_resize, "test");
        assert!(!sources.is_native());
        assert_eq!(headless.listener_count(EventKind::Resize), 1);
    }

    #[test]
    fn test_no_window_registers_nothing() {
        let headless = Rc::new(HeadlessHost::new());
        headless.set_window_available(false);
        let host: SharedHost = headless.clone();
        let (_count, on_resize) = counting();

        let sources = ResizeSources::connect(&host, None, false, on_resize, "test");
        assert!(!sources.is_native());
        assert_eq!(headless.total_listeners(), 0);
    }
}
