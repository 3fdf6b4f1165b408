//! Orientation change follow-up
//!
//! Viewport dimensions are not final when an orientation change is
//! delivered. The follow-up waits for the next window `Resize`, reports it
//! once, then removes its own listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lookout_platform::{EventKind, Listener, SharedHost};

use crate::guard::ListenerGuard;

/// One-shot `Resize` listener armed by orientation changes
///
/// At most one follow-up listener is registered at a time; arming while
/// armed does nothing.
pub struct OrientationFollowUp {
    host: SharedHost,
    armed: Rc<RefCell<Option<ListenerGuard>>>,
    fired: Rc<Cell<u64>>,
    on_resize: Rc<dyn Fn()>,
}

impl OrientationFollowUp {
    pub fn new<F>(host: SharedHost, on_resize: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            host,
            armed: Rc::new(RefCell::new(None)),
            fired: Rc::new(Cell::new(0)),
            on_resize: Rc::new(on_resize),
        }
    }

    /// Register the follow-up listener unless one is already registered
    pub fn arm(&self) {
        if self.armed.borrow().is_some() {
            return;
        }

        let slot = Rc::downgrade(&self.armed);
        let fired = self.fired.clone();
        let on_resize = self.on_resize.clone();
        let listener: Listener = Rc::new(move |_| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            // Whoever takes the guard out of the slot owns the one firing
            let Some(guard) = slot.borrow_mut().take() else {
                return;
            };
            fired.set(fired.get() + 1);
            on_resize();
            drop(guard);
        });

        match ListenerGuard::add(&self.host, EventKind::Resize, listener) {
            Ok(guard) => {
                tracing::trace!("OrientationFollowUp: armed");
                *self.armed.borrow_mut() = Some(guard);
            }
            Err(err) => {
                tracing::warn!("OrientationFollowUp: could not arm resize follow-up: {}", err);
            }
        }
    }

    /// Remove the follow-up listener if armed
    pub fn disarm(&self) {
        let guard = self.armed.borrow_mut().take();
        drop(guard);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.borrow().is_some()
    }

    /// Number of follow-ups that have fired
    pub fn fired_count(&self) -> u64 {
        self.fired.get()
    }
}

impl Drop for OrientationFollowUp {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl std::fmt::Debug for OrientationFollowUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationFollowUp")
            .field("armed", &self.is_armed())
            .field("fired", &self.fired.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_platform::{HeadlessHost, HostEvent};

    fn setup() -> (Rc<HeadlessHost>, OrientationFollowUp, Rc<Cell<u32>>) {
        let headless = Rc::new(HeadlessHost::new());
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let follow_up = OrientationFollowUp::new(headless.clone(), move || c.set(c.get() + 1));
        (headless, follow_up, calls)
    }

    #[test]
    fn test_fires_once_then_removes_itself() {
        let (host, follow_up, calls) = setup();

        follow_up.arm();
        assert!(follow_up.is_armed());
        assert_eq!(host.listener_count(EventKind::Resize), 1);

        host.dispatch(HostEvent::Resize);
        assert_eq!(calls.get(), 1);
        assert!(!follow_up.is_armed());
        assert_eq!(host.listener_count(EventKind::Resize), 0);

        host.dispatch(HostEvent::Resize);
        assert_eq!(calls.get(), 1);
        assert_eq!(follow_up.fired_count(), 1);
    }

    #[test]
    fn test_arm_while_armed_is_noop() {
        let (host, follow_up, _calls) = setup();

        follow_up.arm();
        follow_up.arm();
        follow_up.arm();
        assert_eq!(host.listener_count(EventKind::Resize), 1);
    }

    #[test]
    fn test_rearm_after_firing() {
        let (host, follow_up, calls) = setup();

        follow_up.arm();
        host.dispatch(HostEvent::Resize);
        follow_up.arm();
        host.dispatch(HostEvent::Resize);

        assert_eq!(calls.get(), 2);
        assert_eq!(host.listener_count(EventKind::Resize), 0);
    }

    #[test]
    fn test_drop_disarms() {
        let (host, follow_up, calls) = setup();

        follow_up.arm();
        drop(follow_up);
        assert_eq!(host.total_listeners(), 0);

        host.dispatch(HostEvent::Resize);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_arm_without_window() {
        let (host, follow_up, _calls) = setup();
        host.set_window_available(false);

        follow_up.arm();
        assert!(!follow_up.is_armed());
    }
}
