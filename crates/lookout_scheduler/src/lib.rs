//! Lookout Frame Scheduling
//!
//! Coalesces an arbitrary-frequency stream of triggers into frame-aligned
//! updates.
//!
//! # Features
//!
//! - **Debounced mode**: any number of triggers within one frame tick run the
//!   update exactly once, on the next tick
//! - **Continuous mode**: the first trigger starts a loop that runs the
//!   update every tick until cancelled
//! - **Safe teardown**: cancellation is idempotent and runs on drop, and a
//!   frame that fires after teardown reaches nothing

pub mod throttle;

pub use throttle::{FrameThrottle, ThrottleMode, ThrottleState};
