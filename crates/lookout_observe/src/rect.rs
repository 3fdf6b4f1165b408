//! Rect watcher
//!
//! Publishes only an element's bounding rect, re-sampled whenever the
//! element (or, without native observation, the window) resizes.

use lookout_core::{sample_rect, Published, Rect, Subscription};
use lookout_platform::{ElementId, SharedHost};

use crate::config::ObserveConfig;
use crate::resize::ResizeWatcher;

/// Element rect bound to an attach/detach lifetime
pub struct RectWatcher {
    element: Option<ElementId>,
    rect: Published<Rect>,
    watcher: ResizeWatcher,
}

impl RectWatcher {
    /// Create a watcher for `element`
    ///
    /// The rect is sampled right away; an absent element starts at
    /// [`Rect::ZERO`].
    pub fn new(host: SharedHost, element: Option<ElementId>, config: &ObserveConfig) -> Self {
        let rect = Published::new(sample_rect(&*host, element));

        let sampler = host.clone();
        let published = rect.clone();
        let watcher = ResizeWatcher::from_config(host, config, move || {
            let Some(element) = element else {
                return;
            };
            let next = sample_rect(&*sampler, Some(element));
            if next != published.get() {
                published.publish(next);
            }
        });

        Self {
            element,
            rect,
            watcher,
        }
    }

    /// Start watching
    ///
    /// Returns false, and does nothing, when the element is absent.
    pub fn attach(&self) -> bool {
        self.watcher.attach_element(self.element)
    }

    pub fn detach(&self) {
        self.watcher.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.watcher.is_attached()
    }

    /// Current rect
    pub fn rect(&self) -> Rect {
        self.rect.get()
    }

    /// Subscribe to rect changes
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Rect) + 'static,
    {
        self.rect.subscribe(callback)
    }

    /// Shared handle to the published rect
    pub fn published(&self) -> Published<Rect> {
        self.rect.clone()
    }
}

impl std::fmt::Debug for RectWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RectWatcher")
            .field("element", &self.element)
            .field("rect", &self.rect.get())
            .field("watcher", &self.watcher)
            .finish()
    }
}
