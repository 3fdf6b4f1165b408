//! Layout snapshots
//!
//! [`LayoutState`] is what a consumer sees. Observation passes produce a
//! [`LayoutPatch`] which is shallow-merged into the previous snapshot to
//! form the next one; the previous snapshot is never modified.

use lookout_platform::{ElementId, Host};

use crate::geometry::{
    scroll_position, try_sample_rect, viewport_metrics, PointerPosition, Rect, ScrollPosition,
    ViewportMetrics,
};
use crate::hover::is_hovering;
use crate::viewability::{is_in_view, ViewabilityConfig};

/// Immutable snapshot of everything known about a tracked element
///
/// The default value is the "not yet measured" state: every number is
/// zero and both flags are false.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutState {
    /// Element bounding rect
    pub rect: Rect,
    /// Viewport size
    pub screen: ViewportMetrics,
    /// Document scroll offset
    pub scroll: ScrollPosition,
    /// Last pointer position
    pub mouse: PointerPosition,
    /// Pointer is over `rect`
    pub hover: bool,
    /// `rect` is in view
    pub in_view: bool,
}

impl LayoutState {
    /// Produce the next snapshot from this one and a patch
    pub fn merge(&self, patch: &LayoutPatch) -> LayoutState {
        LayoutState {
            rect: patch.rect.unwrap_or(self.rect),
            screen: patch.screen.unwrap_or(self.screen),
            scroll: patch.scroll.unwrap_or(self.scroll),
            mouse: patch.mouse.unwrap_or(self.mouse),
            hover: patch.hover.unwrap_or(self.hover),
            in_view: patch.in_view.unwrap_or(self.in_view),
        }
    }
}

/// The fields produced by one observation pass
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutPatch {
    pub rect: Option<Rect>,
    pub screen: Option<ViewportMetrics>,
    pub scroll: Option<ScrollPosition>,
    pub mouse: Option<PointerPosition>,
    pub hover: Option<bool>,
    pub in_view: Option<bool>,
}

impl LayoutPatch {
    /// Full geometry measurement of an element
    ///
    /// Samples rect, viewport and scroll in one go and derives `in_view`
    /// and `hover` (against `pointer`) from those same samples. An element
    /// the host cannot measure yields a zero rect and false flags; without
    /// a pointer `hover` is false.
    pub fn measure<H: Host + ?Sized>(
        host: &H,
        element: ElementId,
        pointer: Option<PointerPosition>,
        config: &ViewabilityConfig,
    ) -> LayoutPatch {
        let screen = viewport_metrics(host);
        let scroll = scroll_position(host);

        let (rect, in_view, hover) = match try_sample_rect(host, element) {
            Some(rect) => (
                rect,
                is_in_view(&rect, &screen, config),
                pointer.is_some_and(|pointer| is_hovering(&pointer, &rect)),
            ),
            None => (Rect::ZERO, false, false),
        };

        LayoutPatch {
            rect: Some(rect),
            screen: Some(screen),
            scroll: Some(scroll),
            mouse: None,
            hover: Some(hover),
            in_view: Some(in_view),
        }
    }

    /// Attach a new pointer position to the patch
    pub fn with_mouse(mut self, mouse: PointerPosition) -> Self {
        self.mouse = Some(mouse);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_platform::{ClientRect, HeadlessHost};

    #[test]
    fn test_default_is_unmeasured() {
        let state = LayoutState::default();
        assert_eq!(state.rect, Rect::ZERO);
        assert_eq!(state.screen, ViewportMetrics::default());
        assert_eq!(state.scroll, ScrollPosition::default());
        assert_eq!(state.mouse, PointerPosition::default());
        assert!(!state.hover);
        assert!(!state.in_view);
    }

    #[test]
    fn test_merge_is_shallow() {
        let before = LayoutState {
            mouse: PointerPosition::new(5.0, 5.0),
            in_view: true,
            ..Default::default()
        };
        let patch = LayoutPatch {
            hover: Some(true),
            ..Default::default()
        };

        let after = before.merge(&patch);
        assert!(after.hover);
        assert!(after.in_view);
        assert_eq!(after.mouse, PointerPosition::new(5.0, 5.0));
        // Merging never touches the source snapshot
        assert!(!before.hover);
    }

    #[test]
    fn test_measure_consistent() {
        let host = HeadlessHost::new();
        let element = host.create_element(ClientRect::from_xywh(10.0, 10.0, 100.0, 50.0));

        let patch = LayoutPatch::measure(
            &host,
            element,
            Some(PointerPosition::new(50.0, 30.0)),
            &ViewabilityConfig::default(),
        );

        assert_eq!(patch.rect, Some(Rect::from_xywh(10.0, 10.0, 100.0, 50.0)));
        assert_eq!(patch.screen, Some(ViewportMetrics::new(800.0, 600.0)));
        assert_eq!(patch.hover, Some(true));
        assert_eq!(patch.in_view, Some(true));
        assert_eq!(patch.mouse, None);
    }

    #[test]
    fn test_measure_unmeasurable_element() {
        let host = HeadlessHost::new();
        let element = host.create_element(ClientRect::from_xywh(0.0, 0.0, 10.0, 10.0));
        host.remove_element(element);

        let patch = LayoutPatch::measure(
            &host,
            element,
            Some(PointerPosition::default()),
            &ViewabilityConfig::default(),
        );

        assert_eq!(patch.rect, Some(Rect::ZERO));
        assert_eq!(patch.in_view, Some(false));
        assert_eq!(patch.hover, Some(false));
    }

    #[test]
    fn test_measure_without_pointer_never_hovers() {
        let host = HeadlessHost::new();
        // The origin lies inside the element
        let element = host.create_element(ClientRect::from_xywh(0.0, 0.0, 100.0, 100.0));

        let patch = LayoutPatch::measure(&host, element, None, &ViewabilityConfig::default());

        assert_eq!(patch.hover, Some(false));
        assert_eq!(patch.in_view, Some(true));
        assert_eq!(patch.mouse, None);
    }
}
