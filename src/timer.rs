//! Timer facility abstraction and a deadline-based software implementation.
//!
//! A light needs three independent timers. The host owns the actual timing
//! mechanism (hardware ticker, RTOS timer, executor) and implements [`Timers`];
//! when a slot expires it calls
//! [`LightController::handle_timer`](crate::LightController::handle_timer).
//!
//! [`DeadlineTimers`] is a ready-made implementation on top of a
//! [`TimeSource`] for hosts that prefer to poll, paired with
//! [`LightController::service`](crate::LightController::service).

use crate::time::{TimeDuration, TimeInstant, TimeSource};

/// Identifies one of the light's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerSlot {
    /// Drives intensity ramps. Started periodically.
    Ramp,

    /// Toggles between the lit and dark halves of a blink.
    Blink,

    /// Ends a temporary window.
    Temporary,
}

impl TimerSlot {
    /// Number of slots.
    pub const COUNT: usize = 3;

    /// All slots in index order.
    pub const ALL: [TimerSlot; TimerSlot::COUNT] =
        [TimerSlot::Ramp, TimerSlot::Blink, TimerSlot::Temporary];

    /// Stable index of the slot, usable for array storage.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TimerSlot::Ramp => 0,
            TimerSlot::Blink => 1,
            TimerSlot::Temporary => 2,
        }
    }
}

/// Trait for abstracting the timer facility.
///
/// Starting a slot that is already armed replaces its pending expiry.
/// Cancelling an idle or already expired slot must be a no-op.
///
/// A zero `delay_us` asks for an expiry as soon as possible. Any non-zero
/// delay must wait at least one tick of the underlying timer, otherwise a
/// periodic slot or an alternating blink never lets time advance.
pub trait Timers {
    /// Arms `slot` to expire once after `delay_us` microseconds.
    fn start_once(&mut self, slot: TimerSlot, delay_us: u64);

    /// Arms `slot` to expire every `period_us` microseconds until cancelled.
    fn start_periodic(&mut self, slot: TimerSlot, period_us: u64);

    /// Disarms `slot`.
    fn cancel(&mut self, slot: TimerSlot);
}

/// Timing information returned by service operations.
///
/// Indicates when the light needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// A timer is armed. Service again after the specified delay.
    Delay(D),

    /// No timer is armed. The light holds its output until the next call.
    Idle,
}

#[derive(Debug, Clone, Copy)]
struct Deadline<I: TimeInstant> {
    at: I,
    period: Option<I::Duration>,
}

/// Software timers that record a deadline per slot.
///
/// Expiries are not delivered on their own; [`DeadlineTimers::pop_expired`]
/// hands them out in deadline order. While an expiry is being handled, new
/// deadlines are anchored to the expired deadline rather than to `now`, so a
/// late service call does not stretch blink or ramp timing.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - Time source implementation type
pub struct DeadlineTimers<'t, I: TimeInstant, S: TimeSource<I>> {
    time_source: &'t S,
    deadlines: [Option<Deadline<I>>; TimerSlot::COUNT],
    anchor: Option<I>,
}

impl<'t, I: TimeInstant, S: TimeSource<I>> DeadlineTimers<'t, I, S> {
    /// Creates a set of idle timers.
    pub fn new(time_source: &'t S) -> Self {
        Self {
            time_source,
            deadlines: [None; TimerSlot::COUNT],
            anchor: None,
        }
    }

    /// Returns true if `slot` has a pending deadline.
    pub fn is_armed(&self, slot: TimerSlot) -> bool {
        self.deadlines[slot.index()].is_some()
    }

    /// Returns the pending deadline of `slot`.
    pub fn deadline(&self, slot: TimerSlot) -> Option<I> {
        self.deadlines[slot.index()].map(|d| d.at)
    }

    /// Removes and returns the earliest slot whose deadline has passed.
    ///
    /// Periodic slots are re-armed one period after the expired deadline.
    /// Returns `None` once nothing is due, which also ends anchoring.
    pub fn pop_expired(&mut self) -> Option<TimerSlot> {
        let now = self.time_source.now();
        let slot = self.earliest().filter(|&(_, at)| at <= now).map(|(slot, _)| slot);

        let Some(slot) = slot else {
            self.anchor = None;
            return None;
        };

        let entry = &mut self.deadlines[slot.index()];
        if let Some(deadline) = *entry {
            self.anchor = Some(deadline.at);
            // A zero period would be due again immediately, forever.
            let period = deadline.period.filter(|&period| period != I::Duration::ZERO);
            if deadline.period.is_some() && period.is_none() {
                warn!("zero timer period, slot disarmed");
            }
            *entry = period.map(|period| Deadline {
                at: deadline.at.checked_add(period).unwrap_or(now),
                period: Some(period),
            });
        }
        Some(slot)
    }

    /// Returns how long until the next deadline.
    pub fn next_timing(&self) -> ServiceTiming<I::Duration> {
        match self.earliest() {
            None => ServiceTiming::Idle,
            Some((_, at)) => {
                let now = self.time_source.now();
                if at <= now {
                    ServiceTiming::Delay(I::Duration::ZERO)
                } else {
                    ServiceTiming::Delay(at.duration_since(now))
                }
            }
        }
    }

    fn earliest(&self) -> Option<(TimerSlot, I)> {
        let mut earliest: Option<(TimerSlot, I)> = None;
        for slot in TimerSlot::ALL {
            if let Some(deadline) = self.deadlines[slot.index()] {
                match earliest {
                    Some((_, at)) if at <= deadline.at => {}
                    _ => earliest = Some((slot, deadline.at)),
                }
            }
        }
        earliest
    }

    fn arm(&mut self, slot: TimerSlot, delay_us: u64, periodic: bool) {
        let base = self.anchor.unwrap_or_else(|| self.time_source.now());
        let delay = I::Duration::from_micros(delay_us);
        // On overflow the deadline collapses to the base instant and fires on
        // the next service call.
        let at = base.checked_add(delay).unwrap_or(base);
        self.deadlines[slot.index()] = Some(Deadline {
            at,
            period: periodic.then_some(delay),
        });
    }
}

impl<'t, I: TimeInstant, S: TimeSource<I>> Timers for DeadlineTimers<'t, I, S> {
    fn start_once(&mut self, slot: TimerSlot, delay_us: u64) {
        self.arm(slot, delay_us, false);
    }

    fn start_periodic(&mut self, slot: TimerSlot, period_us: u64) {
        self.arm(slot, period_us, true);
    }

    fn cancel(&mut self, slot: TimerSlot) {
        self.deadlines[slot.index()] = None;
    }
}
