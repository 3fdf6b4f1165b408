//! Geometry primitives and sampling
//!
//! Every value here is a plain `Copy` snapshot: it is valid for the instant
//! it was sampled and is replaced, never mutated, on the next sample.

use lookout_platform::{ClientRect, ElementId, Host, ScrollSource, ViewportSource};

/// Viewport sources in the order they are consulted
const VIEWPORT_SOURCES: [ViewportSource; 2] =
    [ViewportSource::Window, ViewportSource::DocumentElement];

/// Scroll sources in the order they are consulted
const SCROLL_SOURCES: [ScrollSource; 3] = [
    ScrollSource::Window,
    ScrollSource::DocumentElement,
    ScrollSource::Body,
];

/// An element's bounding rectangle in viewport coordinates (pixels)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl Rect {
    /// The "not yet measured" rect
    pub const ZERO: Rect = Rect {
        top: 0.0,
        left: 0.0,
        right: 0.0,
        bottom: 0.0,
        width: 0.0,
        height: 0.0,
        x: 0.0,
        y: 0.0,
    };

    /// Build a rect from its origin and size
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        ClientRect::from_xywh(x, y, width, height).into()
    }

    /// Build a rect from its edges
    pub fn from_edges(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self::from_xywh(left, top, right - left, bottom - top)
    }
}

impl From<ClientRect> for Rect {
    fn from(rect: ClientRect) -> Self {
        Self {
            top: rect.top,
            left: rect.left,
            right: rect.right,
            bottom: rect.bottom,
            width: rect.width,
            height: rect.height,
            x: rect.x,
            y: rect.y,
        }
    }
}

/// Size of the visible viewport
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
}

impl ViewportMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Document scroll offset
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

/// Last observed pointer coordinates, viewport space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sample an element's bounding rectangle
///
/// An absent element, or one the host can no longer measure, yields
/// [`Rect::ZERO`].
pub fn sample_rect<H: Host + ?Sized>(host: &H, element: Option<ElementId>) -> Rect {
    element
        .and_then(|element| host.bounding_client_rect(element))
        .map(Rect::from)
        .unwrap_or(Rect::ZERO)
}

/// Like [`sample_rect`] but distinguishes "unmeasurable" from a real
/// zero-sized rect
pub fn try_sample_rect<H: Host + ?Sized>(host: &H, element: ElementId) -> Option<Rect> {
    host.bounding_client_rect(element).map(Rect::from)
}

/// Current viewport size
///
/// Reads the window's inner size, then the document element's client
/// size, then falls back to zero.
pub fn viewport_metrics<H: Host + ?Sized>(host: &H) -> ViewportMetrics {
    match VIEWPORT_SOURCES
        .iter()
        .find_map(|&source| host.viewport_size(source))
    {
        Some((width, height)) => ViewportMetrics { width, height },
        None => {
            tracing::trace!("viewport_metrics: no viewport source, using zero");
            ViewportMetrics::default()
        }
    }
}

/// Current document scroll offset
///
/// Reads the window's page offset, then the document element, then the
/// body, then falls back to zero.
pub fn scroll_position<H: Host + ?Sized>(host: &H) -> ScrollPosition {
    SCROLL_SOURCES
        .iter()
        .find_map(|&source| host.scroll_offset(source))
        .map(|(x, y)| ScrollPosition { x, y })
        .unwrap_or_default()
}

/// Vertical document scroll offset
pub fn scroll_top<H: Host + ?Sized>(host: &H) -> f64 {
    scroll_position(host).y
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_platform::HeadlessHost;

    #[test]
    fn test_sample_absent_element() {
        let host = HeadlessHost::new();
        assert_eq!(sample_rect(&host, None), Rect::ZERO);
    }

    #[test]
    fn test_sample_removed_element() {
        let host = HeadlessHost::new();
        let element = host.create_element(ClientRect::from_xywh(1.0, 2.0, 3.0, 4.0));
        host.remove_element(element);

        assert_eq!(sample_rect(&host, Some(element)), Rect::ZERO);
        assert_eq!(try_sample_rect(&host, element), None);
    }

    #[test]
    fn test_sample_copies_all_fields() {
        let host = HeadlessHost::new();
        let element = host.create_element(ClientRect::from_xywh(10.0, 20.0, 30.0, 40.0));

        let rect = sample_rect(&host, Some(element));
        assert_eq!(rect, Rect::from_xywh(10.0, 20.0, 30.0, 40.0));
        assert_eq!(rect.bottom, 60.0);
        assert_eq!(rect.right, 40.0);
    }

    #[test]
    fn test_viewport_fallback() {
        let host = HeadlessHost::with_viewport(1024.0, 768.0);
        assert_eq!(viewport_metrics(&host), ViewportMetrics::new(1024.0, 768.0));

        host.set_viewport_source(ViewportSource::Window, None);
        host.set_viewport_source(ViewportSource::DocumentElement, Some((1000.0, 700.0)));
        assert_eq!(viewport_metrics(&host), ViewportMetrics::new(1000.0, 700.0));

        host.set_viewport_source(ViewportSource::DocumentElement, None);
        assert_eq!(viewport_metrics(&host), ViewportMetrics::default());
    }

    #[test]
    fn test_scroll_fallback_chain() {
        let host = HeadlessHost::new();
        host.set_scroll_source(ScrollSource::Window, None);
        host.set_scroll_source(ScrollSource::DocumentElement, None);
        host.set_scroll_source(ScrollSource::Body, Some((0.0, 42.0)));

        assert_eq!(scroll_top(&host), 42.0);

        host.set_scroll_source(ScrollSource::DocumentElement, Some((3.0, 7.0)));
        assert_eq!(scroll_position(&host), ScrollPosition { x: 3.0, y: 7.0 });

        host.set_scroll_source(ScrollSource::DocumentElement, None);
        host.set_scroll_source(ScrollSource::Body, None);
        assert_eq!(scroll_position(&host), ScrollPosition::default());
    }

    #[test]
    fn test_rect_from_edges() {
        let rect = Rect::from_edges(500.0, 0.0, 100.0, 700.0);
        assert_eq!(rect.height, 200.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.y, 500.0);
    }
}
