//! Window-level events delivered by a host

/// The kinds of window-level events an observer can listen for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The viewport was resized
    Resize,
    /// The document was scrolled
    Scroll,
    /// The device orientation changed
    ///
    /// Hosts fire this before the viewport metrics are updated, so the
    /// new size is only readable on the following `Resize`.
    OrientationChange,
    /// The pointer moved
    PointerMove,
}

/// A window-level event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Viewport resized
    Resize,
    /// Document scrolled
    Scroll,
    /// Orientation changed
    OrientationChange,
    /// Pointer moved, coordinates in viewport space
    PointerMove {
        /// X position (client coordinates)
        x: f64,
        /// Y position (client coordinates)
        y: f64,
    },
}

impl HostEvent {
    /// The kind a listener must register for to receive this event
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Resize => EventKind::Resize,
            HostEvent::Scroll => EventKind::Scroll,
            HostEvent::OrientationChange => EventKind::OrientationChange,
            HostEvent::PointerMove { .. } => EventKind::PointerMove,
        }
    }
}
