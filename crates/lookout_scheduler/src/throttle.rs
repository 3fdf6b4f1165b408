//! Frame throttle
//!
//! A [`FrameThrottle`] owns one update function and at most one pending
//! frame request on the host.
//!
//! ```text
//! Debounced:   Idle --trigger--> Pending --frame--> Idle (update runs)
//! Continuous:  Idle --trigger--> Running --frame--> Running (update runs,
//!                                                   reschedules)
//!              Running --cancel--> Idle
//! ```
//!
//! The pending marker is a plain `Cell`. That is only sound because the
//! throttle never leaves the thread that owns the host: it is built on `Rc`
//! and is therefore `!Send`. Porting it to a multi-threaded executor needs
//! the marker behind a mutex, or the throttle pinned to one executor thread.
//!
//! # Example
//!
//! ```ignore
//! use lookout_scheduler::{FrameThrottle, ThrottleMode};
//!
//! let throttle = FrameThrottle::new(host.clone(), ThrottleMode::Debounced, || {
//!     println!("measure");
//! });
//!
//! // Ten scroll events in one frame...
//! for _ in 0..10 {
//!     throttle.trigger();
//! }
//! // ...one update on the next tick
//! ```

use std::cell::Cell;
use std::rc::Rc;

use lookout_platform::{FrameHandle, SharedHost};
use serde::{Deserialize, Serialize};

/// How a throttle reacts to triggers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleMode {
    /// One update on the next frame per burst of triggers
    #[default]
    Debounced,
    /// Update every frame from the first trigger until cancelled
    Continuous,
}

/// Where a throttle is in its state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleState {
    /// Nothing scheduled
    Idle,
    /// Debounced update scheduled for the next frame
    Pending,
    /// Continuous loop active
    Running,
}

struct ThrottleInner {
    host: SharedHost,
    mode: ThrottleMode,
    update: Box<dyn Fn()>,
    /// The single outstanding frame request
    handle: Cell<Option<FrameHandle>>,
    state: Cell<ThrottleState>,
    runs: Cell<u64>,
    label: Cell<&'static str>,
}

/// Coalesces triggers into at most one update per frame tick
///
/// Dropping the throttle cancels any pending frame.
pub struct FrameThrottle {
    inner: Rc<ThrottleInner>,
}

impl FrameThrottle {
    /// Create an idle throttle around `update`
    pub fn new<F>(host: SharedHost, mode: ThrottleMode, update: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(ThrottleInner {
                host,
                mode,
                update: Box::new(update),
                handle: Cell::new(None),
                state: Cell::new(ThrottleState::Idle),
                runs: Cell::new(0),
                label: Cell::new("throttle"),
            }),
        }
    }

    /// Create a debounced throttle
    pub fn debounced<F>(host: SharedHost, update: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(host, ThrottleMode::Debounced, update)
    }

    /// Create a continuous throttle
    pub fn continuous<F>(host: SharedHost, update: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(host, ThrottleMode::Continuous, update)
    }

    /// Name used in trace output
    pub fn labeled(self, label: &'static str) -> Self {
        self.inner.label.set(label);
        self
    }

    /// Request an update
    ///
    /// Debounced: schedules the next frame unless one is already pending.
    /// Continuous: starts the loop unless it is already running.
    pub fn trigger(&self) {
        let inner = &self.inner;
        match (inner.mode, inner.state.get()) {
            (ThrottleMode::Debounced, ThrottleState::Idle) => {
                inner.state.set(ThrottleState::Pending);
                schedule(inner);
            }
            (ThrottleMode::Continuous, ThrottleState::Idle) => {
                tracing::trace!("FrameThrottle[{}]: loop started", inner.label.get());
                inner.state.set(ThrottleState::Running);
                schedule(inner);
            }
            _ => {}
        }
    }

    /// Run the update immediately, outside the frame schedule
    ///
    /// Does not touch the pending marker.
    pub fn run_now(&self) {
        run(&self.inner);
    }

    /// Cancel any pending frame and return to idle
    ///
    /// Safe to call any number of times, with or without a frame pending.
    pub fn cancel(&self) {
        let inner = &self.inner;
        if let Some(handle) = inner.handle.take() {
            inner.host.cancel_frame(handle);
            tracing::trace!("FrameThrottle[{}]: cancelled pending frame", inner.label.get());
        }
        inner.state.set(ThrottleState::Idle);
    }

    /// Current state
    pub fn state(&self) -> ThrottleState {
        self.inner.state.get()
    }

    /// Whether nothing is scheduled
    pub fn is_idle(&self) -> bool {
        self.state() == ThrottleState::Idle
    }

    /// Throttle mode
    pub fn mode(&self) -> ThrottleMode {
        self.inner.mode
    }

    /// Number of times the update has run (scheduled or immediate)
    pub fn run_count(&self) -> u64 {
        self.inner.runs.get()
    }
}

impl Drop for FrameThrottle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for FrameThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameThrottle")
            .field("label", &self.inner.label.get())
            .field("mode", &self.inner.mode)
            .field("state", &self.inner.state.get())
            .field("runs", &self.inner.runs.get())
            .finish()
    }
}

fn schedule(inner: &Rc<ThrottleInner>) {
    // The frame only holds a weak reference: a frame that fires after the
    // throttle is gone does nothing.
    let weak = Rc::downgrade(inner);
    let handle = inner.host.request_frame(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            on_frame(&inner);
        }
    }));
    inner.handle.set(Some(handle));
}

fn on_frame(inner: &Rc<ThrottleInner>) {
    inner.handle.set(None);

    match (inner.mode, inner.state.get()) {
        (ThrottleMode::Debounced, ThrottleState::Pending) => {
            // Clear the marker first so the update may trigger again
            inner.state.set(ThrottleState::Idle);
            run(inner);
        }
        (ThrottleMode::Continuous, ThrottleState::Running) => {
            run(inner);
            // The update may have cancelled or already rescheduled
            if inner.state.get() == ThrottleState::Running && inner.handle.get().is_none() {
                schedule(inner);
            }
        }
        _ => {}
    }
}

fn run(inner: &ThrottleInner) {
    inner.runs.set(inner.runs.get() + 1);
    tracing::trace!(
        "FrameThrottle[{}]: update #{}",
        inner.label.get(),
        inner.runs.get()
    );
    (inner.update)();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_platform::HeadlessHost;
    use std::cell::RefCell;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn test_debounced_coalesces() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();
        let throttle = FrameThrottle::debounced(host.clone(), update);

        for _ in 0..10 {
            throttle.trigger();
        }
        assert_eq!(throttle.state(), ThrottleState::Pending);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(count.get(), 0);

        host.tick_frame();
        assert_eq!(count.get(), 1);
        assert_eq!(throttle.state(), ThrottleState::Idle);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_debounced_rearms_after_fire() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();
        let throttle = FrameThrottle::debounced(host.clone(), update);

        throttle.trigger();
        host.tick_frame();
        throttle.trigger();
        throttle.trigger();
        host.tick_frame();

        assert_eq!(count.get(), 2);
        assert_eq!(throttle.run_count(), 2);
    }

    #[test]
    fn test_idle_tick_runs_nothing() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();
        let _throttle = FrameThrottle::debounced(host.clone(), update);

        host.tick_frame();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();
        let throttle = FrameThrottle::debounced(host.clone(), update);

        throttle.cancel();
        throttle.trigger();
        throttle.cancel();
        throttle.cancel();

        assert_eq!(host.pending_frames(), 0);
        host.tick_frame();
        assert_eq!(count.get(), 0);
        assert!(throttle.is_idle());
    }

    #[test]
    fn test_continuous_runs_every_frame() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();
        let throttle = FrameThrottle::continuous(host.clone(), update);

        throttle.trigger();
        throttle.trigger();
        assert_eq!(throttle.state(), ThrottleState::Running);

        for _ in 0..3 {
            host.tick_frame();
        }
        assert_eq!(count.get(), 3);
        assert_eq!(host.pending_frames(), 1);

        throttle.cancel();
        assert_eq!(host.pending_frames(), 0);
        host.tick_frame();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_continuous_cancel_from_update() {
        let host = Rc::new(HeadlessHost::new());
        let slot: Rc<RefCell<Option<FrameThrottle>>> = Rc::new(RefCell::new(None));
        let runs = Rc::new(Cell::new(0));

        let weak_slot = Rc::downgrade(&slot);
        let r = runs.clone();
        let throttle = FrameThrottle::continuous(host.clone(), move || {
            r.set(r.get() + 1);
            if r.get() == 2 {
                if let Some(slot) = weak_slot.upgrade() {
                    if let Some(throttle) = slot.borrow().as_ref() {
                        throttle.cancel();
                    }
                }
            }
        });
        throttle.trigger();
        *slot.borrow_mut() = Some(throttle);

        for _ in 0..5 {
            host.tick_frame();
        }
        assert_eq!(runs.get(), 2);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();

        {
            let throttle = FrameThrottle::debounced(host.clone(), update);
            throttle.trigger();
            assert_eq!(host.pending_frames(), 1);
        }

        assert_eq!(host.pending_frames(), 0);
        host.tick_frame();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_run_now_leaves_schedule_alone() {
        let host = Rc::new(HeadlessHost::new());
        let (count, update) = counter();
        let throttle = FrameThrottle::debounced(host.clone(), update);

        throttle.trigger();
        throttle.run_now();
        assert_eq!(count.get(), 1);
        assert_eq!(throttle.state(), ThrottleState::Pending);

        host.tick_frame();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_mode_from_toml() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            mode: ThrottleMode,
        }

        let parsed: Wrapper = toml::from_str(r#"mode = "continuous""#).unwrap();
        assert_eq!(parsed.mode, ThrottleMode::Continuous);
        assert_eq!(ThrottleMode::default(), ThrottleMode::Debounced);
    }
}
