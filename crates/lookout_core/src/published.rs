//! Published values
//!
//! A [`Published<T>`] holds the latest value of something an observer
//! produces and notifies subscribers whenever a new value is published.
//! Readers always get the current value synchronously with
//! [`Published::get`]; subscribers are told about every publication.
//!
//! # Example
//!
//! ```ignore
//! use lookout_core::{LayoutState, Published};
//!
//! let layout = Published::new(LayoutState::default());
//!
//! let _sub = layout.subscribe(|state| {
//!     println!("in view: {}", state.in_view);
//! });
//!
//! layout.publish(LayoutState { in_view: true, ..Default::default() });
//! assert!(layout.get().in_view);
//! ```
//!
//! Single-threaded: the cell is `!Send` and subscribers run on the
//! publishing thread.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a subscriber
    pub struct SubscriberId;
}

type SubscriberFn<T> = Rc<dyn Fn(&T)>;

struct PublishedInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    subscribers: RefCell<SlotMap<SubscriberId, SubscriberFn<T>>>,
}

/// Latest-value cell with change notification
///
/// Cloning shares the same cell.
pub struct Published<T> {
    inner: Rc<PublishedInner<T>>,
}

impl<T> Clone for Published<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + Clone + 'static> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Published<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Published")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + 'static> Published<T> {
    /// Create a cell holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(PublishedInner {
                value: RefCell::new(initial),
                version: Cell::new(0),
                subscribers: RefCell::new(SlotMap::with_key()),
            }),
        }
    }

    /// The current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Number of publications so far
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Replace the value and notify subscribers
    pub fn publish(&self, value: T) {
        self.inner.value.replace(value.clone());
        self.inner.version.set(self.inner.version.get() + 1);

        // Subscribers may read, publish or (un)subscribe while being notified
        let subscribers: SmallVec<[(SubscriberId, SubscriberFn<T>); 4]> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(id, callback)| (id, callback.clone()))
            .collect();

        for (id, callback) in subscribers {
            if self.inner.subscribers.borrow().contains_key(id) {
                callback(&value);
            }
        }
    }

    /// Compute the next value from the current one and publish it
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.inner.value.borrow());
        self.publish(next);
    }

    /// Subscribe to publications
    ///
    /// The subscription ends when the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self
            .inner
            .subscribers
            .borrow_mut()
            .insert(Rc::new(callback));

        let weak: Weak<PublishedInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().remove(id);
                }
            })),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Handle for a subscription to a [`Published`] value
///
/// Unsubscribes on drop. Outliving the cell is fine.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_get() {
        let cell = Published::new(1);
        assert_eq!(cell.get(), 1);
        assert_eq!(cell.version(), 0);

        cell.publish(2);
        assert_eq!(cell.get(), 2);
        assert_eq!(cell.version(), 1);

        cell.update(|v| v * 10);
        assert_eq!(cell.get(), 20);
    }

    #[test]
    fn test_subscribe_notifies() {
        let cell = Published::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let _sub = cell.subscribe(move |v| log.borrow_mut().push(*v));

        cell.publish(3);
        cell.publish(4);
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let cell = Published::new(0);
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        let sub = cell.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(cell.subscriber_count(), 1);

        drop(sub);
        assert_eq!(cell.subscriber_count(), 0);

        cell.publish(1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let cell = Published::new(0);
        let sub = cell.subscribe(|_| {});
        sub.unsubscribe();
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_cell() {
        let sub = {
            let cell = Published::new(0);
            cell.subscribe(|_| {})
        };
        // Releasing after the cell is gone is a no-op
        drop(sub);
    }

    #[test]
    fn test_subscriber_can_read_during_notify() {
        let cell = Published::new(0);
        let reader = cell.clone();
        let seen = Rc::new(Cell::new(0));

        let last = seen.clone();
        let _sub = cell.subscribe(move |_| last.set(reader.get()));

        cell.publish(7);
        assert_eq!(seen.get(), 7);
    }
}
