//! Host registration guards
//!
//! Every registration an observer makes on the host is held by a guard
//! that releases it exactly once: explicitly through `release()`, or on
//! drop.

use lookout_platform::{
    ElementId, EventKind, Listener, ListenerId, ObserverId, ResizeCallback, Result, SharedHost,
};

/// A window-level event listener registration
pub struct ListenerGuard {
    host: SharedHost,
    kind: EventKind,
    id: Option<ListenerId>,
}

impl ListenerGuard {
    /// Register `listener` for `kind` and guard the registration
    pub fn add(host: &SharedHost, kind: EventKind, listener: Listener) -> Result<Self> {
        let id = host.add_listener(kind, listener)?;
        tracing::trace!("ListenerGuard: added {:?} listener", kind);
        Ok(Self {
            host: host.clone(),
            kind,
            id: Some(id),
        })
    }

    /// Remove the listener if it is still registered
    ///
    /// Returns true only the first time.
    pub fn release(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                self.host.remove_listener(id);
                tracing::trace!("ListenerGuard: removed {:?} listener", self.kind);
                true
            }
            None => false,
        }
    }

    /// Event kind this guard listens for
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("kind", &self.kind)
            .field("active", &self.id.is_some())
            .finish()
    }
}

/// A native per-element resize observation
pub struct ObserverGuard {
    host: SharedHost,
    element: ElementId,
    id: Option<ObserverId>,
}

impl ObserverGuard {
    /// Start observing `element` and guard the observation
    pub fn observe(
        host: &SharedHost,
        element: ElementId,
        callback: ResizeCallback,
    ) -> Result<Self> {
        let id = host.observe_resize(element, callback)?;
        tracing::trace!("ObserverGuard: observing element {}", element.to_raw());
        Ok(Self {
            host: host.clone(),
            element,
            id: Some(id),
        })
    }

    /// Disconnect the observation if it is still connected
    pub fn release(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                self.host.disconnect_observer(id);
                tracing::trace!("ObserverGuard: disconnected element {}", self.element.to_raw());
                true
            }
            None => false,
        }
    }

    /// Observed element
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ObserverGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverGuard")
            .field("element", &self.element)
            .field("active", &self.id.is_some())
            .finish()
    }
}
