//! Interrupt-safe access to a light.
//!
//! When timer expiries arrive in interrupt context while public calls run in
//! task context, both sides must go through a critical section so a
//! cancel-then-arm sequence is never interleaved with an expiry.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::light::{LightController, LightOutput};
use crate::timer::{TimerSlot, Timers};

/// A [`LightController`] guarded by a critical-section mutex.
///
/// ```ignore
/// static STATUS: StaticCell<SharedLight<Pin, HwTimers>> = StaticCell::new();
///
/// // task context
/// status.with(|light| light.blink(250, 250, 0, 100, 0));
///
/// // timer interrupt
/// status.handle_timer(TimerSlot::Blink);
/// ```
pub struct SharedLight<O: LightOutput, T: Timers> {
    inner: Mutex<RefCell<LightController<O, T>>>,
}

impl<O: LightOutput, T: Timers> SharedLight<O, T> {
    /// Wraps a light.
    pub fn new(light: LightController<O, T>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(light)),
        }
    }

    /// Runs `f` with exclusive access to the light inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut LightController<O, T>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Delivers a timer expiry. Call this from the timer interrupt.
    pub fn handle_timer(&self, slot: TimerSlot) {
        self.with(|light| light.handle_timer(slot));
    }

    /// Unwraps the light.
    pub fn into_inner(self) -> LightController<O, T> {
        self.inner.into_inner().into_inner()
    }
}
