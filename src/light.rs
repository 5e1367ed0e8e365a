//! Indicator light controller with state management and timer coordination.
//!
//! Provides [`LightController`] which drives a single light through steady
//! on/off states, ramps, blinking, temporary overrides and pulse patterns.
//! Also defines the [`LightOutput`] trait for hardware abstraction.

use crate::command::LightAction;
use crate::intensity::{RAMP_STEPS, logical_level};
use crate::pattern::{PATTERN_CAPACITY, Pulse, PulsePattern};
use crate::time::{TimeInstant, TimeSource};
use crate::timer::{DeadlineTimers, ServiceTiming, TimerSlot, Timers};
use crate::types::{ActiveLevel, LightConfig, LightError, LightKind, LightState, Phase};

/// Fraction of a ramp step within which the target counts as reached.
const RAMP_TOLERANCE: f32 = 0.01;

/// Trait for abstracting the light's output pin.
///
/// Implement this for your hardware (GPIO, PWM channel, ...). Binary lights
/// only ever receive [`write_binary`](LightOutput::write_binary); dimmable
/// lights receive [`set_period_ms`](LightOutput::set_period_ms) once at
/// construction and [`write_duty_cycle`](LightOutput::write_duty_cycle)
/// afterwards. Handle any hardware errors internally - these methods cannot
/// fail.
pub trait LightOutput {
    /// Drives the pin high (`true`) or low (`false`).
    fn write_binary(&mut self, high: bool);

    /// Sets the PWM duty cycle, 0.0-1.0.
    fn write_duty_cycle(&mut self, duty: f32);

    /// Sets the PWM period in milliseconds.
    fn set_period_ms(&mut self, period_ms: u32);
}

/// Which of the ramp/blink timers currently drives the output.
///
/// Ramps and blinking are mutually exclusive, so a single value tracks both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Steady,
    Ramping,
    Blinking,
}

/// Everything a temporary window restores when it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Restore {
    state: LightState,
    lit_level: f32,
    dark_level: f32,
    blink_on_ms: u32,
    blink_off_ms: u32,
}

/// Controls a single indicator light.
///
/// The controller owns the output and the timer facility and is purely
/// reactive: public calls and timer expiries are the only things that change
/// the output. Levels are held in logical space (1.0 = fully lit) and
/// inverted on write for active-low pins.
///
/// # Type Parameters
/// * `O` - Output implementation type
/// * `T` - Timer facility implementation type
pub struct LightController<O: LightOutput, T: Timers> {
    output: O,
    timers: T,
    kind: LightKind,
    active_level: ActiveLevel,
    state: LightState,
    phase: Phase,
    activity: Activity,
    level: f32,
    lit_level: f32,
    dark_level: f32,
    blink_on_ms: u32,
    blink_off_ms: u32,
    restore: Option<Restore>,
    pattern: PulsePattern<PATTERN_CAPACITY>,
}

impl<O: LightOutput, T: Timers> LightController<O, T> {
    /// Creates a light that is off, with the output explicitly written off.
    pub fn new(mut output: O, timers: T, config: LightConfig) -> Self {
        if config.kind == LightKind::Dimmable {
            output.set_period_ms(config.period_ms);
        }

        let mut light = Self {
            output,
            timers,
            kind: config.kind,
            active_level: config.active_level,
            state: LightState::Off,
            phase: Phase::SettledOff,
            activity: Activity::Steady,
            level: 0.0,
            lit_level: 1.0,
            dark_level: 0.0,
            blink_on_ms: 0,
            blink_off_ms: 0,
            restore: None,
            pattern: PulsePattern::new(),
        };
        light.off_default();
        light
    }

    /// Turns the light on.
    ///
    /// * `duration_ms` - When non-zero, the light reverts to its current state
    ///   after this many milliseconds.
    /// * `intensity_pct` - Target intensity, 0-100 (clamped).
    /// * `ramp_ms` - When non-zero on a dimmable light, the interval between
    ///   each of the ramp's ten steps. Ignored for binary lights.
    pub fn on(&mut self, duration_ms: u32, intensity_pct: u8, ramp_ms: u32) {
        let level = logical_level(intensity_pct, self.kind, self.active_level);
        self.enter_on(duration_ms, level, ramp_ms);
    }

    /// Turns the light on instantly at full intensity, indefinitely.
    pub fn on_default(&mut self) {
        self.on(0, 100, 0);
    }

    /// Turns the light off.
    ///
    /// Parameters mirror [`on`](Self::on); `intensity_pct` is the residual
    /// glow held while off.
    pub fn off(&mut self, duration_ms: u32, intensity_pct: u8, ramp_ms: u32) {
        let level = logical_level(intensity_pct, self.kind, self.active_level);
        self.enter_off(duration_ms, level, ramp_ms);
    }

    /// Turns the light off instantly and fully, indefinitely.
    pub fn off_default(&mut self) {
        self.off(0, 0, 0);
    }

    /// Blinks the light, starting with the lit half.
    ///
    /// Does nothing when both `on_ms` and `off_ms` are zero. Binary lights
    /// ignore the intensities and blink between fully lit and dark.
    pub fn blink(&mut self, on_ms: u32, off_ms: u32, duration_ms: u32, on_pct: u8, off_pct: u8) {
        if on_ms == 0 && off_ms == 0 {
            return;
        }

        let (lit, dark) = match self.kind {
            LightKind::Binary => (1.0, 0.0),
            LightKind::Dimmable => (
                logical_level(on_pct, self.kind, self.active_level),
                logical_level(off_pct, self.kind, self.active_level),
            ),
        };
        self.enter_blink(on_ms, off_ms, duration_ms, lit, dark);
    }

    /// Updates blink durations without touching a running timer.
    ///
    /// The new values apply from the next half of the blink. An `off_ms` of
    /// zero holds the light lit.
    pub fn update_blink_times(&mut self, on_ms: u32, off_ms: u32) {
        self.blink_on_ms = on_ms;
        self.blink_off_ms = off_ms;
    }

    /// Replaces the pulse pattern and starts playing it from the first entry.
    ///
    /// # Errors
    /// * `PatternTooLong` - More than 16 durations. The current pattern and
    ///   state are left untouched.
    pub fn set_pattern(&mut self, durations: &[u32]) -> Result<(), LightError> {
        let pattern =
            PulsePattern::from_slice(durations).map_err(|_| LightError::PatternTooLong {
                len: durations.len(),
                capacity: PATTERN_CAPACITY,
            })?;
        self.play_pattern(pattern);
        Ok(())
    }

    /// Replaces the pulse pattern with an already validated one and starts
    /// playing it from the first entry.
    pub fn play_pattern(&mut self, mut pattern: PulsePattern<PATTERN_CAPACITY>) {
        debug!("pattern loaded: {} entries", pattern.len());
        pattern.rewind();
        self.pattern = pattern;
        self.advance_pattern();
    }

    /// Stops pattern playback and turns the light off.
    pub fn cancel_pattern(&mut self) {
        self.pattern.clear();
        self.off_default();
    }

    /// Handles a light action by dispatching to the matching method.
    ///
    /// This is a convenience method for command-based control, allowing
    /// actions to arrive through a channel without matching on them manually.
    ///
    /// # Errors
    /// Returns the error of the dispatched operation, if it has one.
    pub fn handle_action(&mut self, action: LightAction) -> Result<(), LightError> {
        match action {
            LightAction::On {
                duration_ms,
                intensity_pct,
                ramp_ms,
            } => self.on(duration_ms, intensity_pct, ramp_ms),
            LightAction::Off {
                duration_ms,
                intensity_pct,
                ramp_ms,
            } => self.off(duration_ms, intensity_pct, ramp_ms),
            LightAction::Blink {
                on_ms,
                off_ms,
                duration_ms,
                on_pct,
                off_pct,
            } => self.blink(on_ms, off_ms, duration_ms, on_pct, off_pct),
            LightAction::UpdateBlinkTimes { on_ms, off_ms } => {
                self.update_blink_times(on_ms, off_ms);
            }
            LightAction::SetPattern(pattern) => self.play_pattern(pattern),
            LightAction::CancelPattern => self.cancel_pattern(),
        }
        Ok(())
    }

    /// Handles the expiry of a timer slot.
    ///
    /// Call this from the host's timer callback. Expiries for a slot the
    /// light is no longer using are ignored.
    pub fn handle_timer(&mut self, slot: TimerSlot) {
        match slot {
            TimerSlot::Ramp => self.ramp_tick(),
            TimerSlot::Blink => self.blink_tick(),
            TimerSlot::Temporary => self.temporary_expired(),
        }
    }

    /// Returns the steady state of the light.
    pub fn state(&self) -> LightState {
        self.state
    }

    /// Returns the transition sub-phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the light's kind.
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Returns the light's active level.
    pub fn active_level(&self) -> ActiveLevel {
        self.active_level
    }

    /// Returns the last value written to the output, as a physical duty cycle.
    pub fn intensity(&self) -> f32 {
        self.active_level.apply(self.level)
    }

    /// Returns the physical value written while lit.
    pub fn max_intensity(&self) -> f32 {
        self.active_level.apply(self.lit_level)
    }

    /// Returns the physical value written while dark.
    pub fn min_intensity(&self) -> f32 {
        self.active_level.apply(self.dark_level)
    }

    /// Returns the blink durations `(on_ms, off_ms)`.
    pub fn blink_times(&self) -> (u32, u32) {
        (self.blink_on_ms, self.blink_off_ms)
    }

    /// Returns true while a temporary window is pending.
    pub fn is_temporary(&self) -> bool {
        self.restore.is_some()
    }

    /// Returns the state the light reverts to when the temporary window ends.
    pub fn saved_state(&self) -> Option<LightState> {
        self.restore.map(|r| r.state)
    }

    /// Returns true while a ramp is in progress.
    pub fn is_ramping(&self) -> bool {
        self.activity == Activity::Ramping
    }

    /// Returns the configured pulse pattern.
    pub fn pattern(&self) -> &PulsePattern<PATTERN_CAPACITY> {
        &self.pattern
    }

    /// Returns a reference to the output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Returns a reference to the timer facility.
    pub fn timers(&self) -> &T {
        &self.timers
    }

    fn enter_on(&mut self, duration_ms: u32, level: f32, ramp_ms: u32) {
        self.begin(duration_ms, LightState::On);
        self.lit_level = level;
        self.settle(level, Phase::SettlingOn, Phase::SettledOn, ramp_ms);
    }

    fn enter_off(&mut self, duration_ms: u32, level: f32, ramp_ms: u32) {
        self.begin(duration_ms, LightState::Off);
        self.dark_level = level;
        self.settle(level, Phase::SettlingOff, Phase::SettledOff, ramp_ms);
    }

    fn enter_blink(&mut self, on_ms: u32, off_ms: u32, duration_ms: u32, lit: f32, dark: f32) {
        self.begin(duration_ms, LightState::Blinking);
        self.blink_on_ms = on_ms;
        self.blink_off_ms = off_ms;
        self.lit_level = lit;
        self.dark_level = dark;
        self.phase = Phase::SettledOn;
        self.activity = Activity::Blinking;
        self.write(lit);
        self.timers.start_once(TimerSlot::Blink, millis_to_micros(on_ms));
    }

    /// Cancels whatever drives the output now and opens a temporary window
    /// when `duration_ms` is non-zero.
    fn begin(&mut self, duration_ms: u32, state: LightState) {
        match self.activity {
            Activity::Steady => {}
            Activity::Ramping => self.timers.cancel(TimerSlot::Ramp),
            Activity::Blinking => self.timers.cancel(TimerSlot::Blink),
        }
        self.activity = Activity::Steady;

        if self.restore.take().is_some() {
            self.timers.cancel(TimerSlot::Temporary);
        }

        if duration_ms > 0 {
            self.restore = Some(self.snapshot());
            self.timers
                .start_once(TimerSlot::Temporary, millis_to_micros(duration_ms));
        }

        trace!("{} -> {} (temporary: {})", self.state, state, duration_ms);
        self.state = state;
    }

    fn settle(&mut self, target: f32, settling: Phase, settled: Phase, ramp_ms: u32) {
        if ramp_ms == 0 || self.kind == LightKind::Binary {
            self.phase = settled;
            self.write(target);
        } else {
            self.phase = settling;
            self.activity = Activity::Ramping;
            self.timers
                .start_periodic(TimerSlot::Ramp, millis_to_micros(ramp_ms));
        }
    }

    fn snapshot(&self) -> Restore {
        Restore {
            state: self.state,
            lit_level: self.lit_level,
            dark_level: self.dark_level,
            blink_on_ms: self.blink_on_ms,
            blink_off_ms: self.blink_off_ms,
        }
    }

    fn ramp_step(&self) -> f32 {
        let span = if self.lit_level > self.dark_level {
            self.lit_level - self.dark_level
        } else {
            self.dark_level - self.lit_level
        };
        if span > 0.0 {
            span / RAMP_STEPS
        } else {
            1.0 / RAMP_STEPS
        }
    }

    fn ramp_tick(&mut self) {
        if self.activity != Activity::Ramping {
            warn!("stale ramp expiry ignored");
            return;
        }

        let (target, settled) = match self.phase {
            Phase::SettlingOn => (self.lit_level, Phase::SettledOn),
            Phase::SettlingOff => (self.dark_level, Phase::SettledOff),
            Phase::SettledOn | Phase::SettledOff => {
                self.finish_ramp(self.phase, self.level);
                return;
            }
        };

        let step = self.ramp_step();
        let tolerance = step * RAMP_TOLERANCE;
        // None once the next step would reach or cross the target.
        let next = if target >= self.level {
            Some(self.level + step).filter(|&next| next < target - tolerance)
        } else {
            Some(self.level - step).filter(|&next| next > target + tolerance)
        };

        match next {
            Some(next) => self.write(next),
            None => self.finish_ramp(settled, target),
        }
    }

    fn finish_ramp(&mut self, settled: Phase, target: f32) {
        self.timers.cancel(TimerSlot::Ramp);
        self.activity = Activity::Steady;
        self.phase = settled;
        self.write(target);
        trace!("ramp complete at {}", self.intensity());
    }

    fn blink_tick(&mut self) {
        if self.activity != Activity::Blinking {
            warn!("stale blink expiry ignored");
            return;
        }

        if self.phase == Phase::SettledOn && self.blink_off_ms > 0 {
            self.phase = Phase::SettledOff;
            self.write(self.dark_level);
            self.timers
                .start_once(TimerSlot::Blink, millis_to_micros(self.blink_off_ms));
            return;
        }

        self.phase = Phase::SettledOn;
        self.write(self.lit_level);
        if self.blink_on_ms > 0 {
            self.timers
                .start_once(TimerSlot::Blink, millis_to_micros(self.blink_on_ms));
        } else if self.blink_off_ms > 0 {
            self.timers.start_once(TimerSlot::Blink, 0);
        } else {
            // Both halves zero: nothing left to alternate, hold lit.
            self.activity = Activity::Steady;
        }
    }

    fn temporary_expired(&mut self) {
        let Some(restore) = self.restore.take() else {
            warn!("stale temporary expiry ignored");
            return;
        };

        for slot in TimerSlot::ALL {
            self.timers.cancel(slot);
        }
        self.activity = Activity::Steady;

        self.state = restore.state;
        self.lit_level = restore.lit_level;
        self.dark_level = restore.dark_level;
        self.blink_on_ms = restore.blink_on_ms;
        self.blink_off_ms = restore.blink_off_ms;
        debug!("temporary window ended, back to {}", self.state);

        if !self.pattern.is_empty() {
            self.advance_pattern();
            return;
        }

        match restore.state {
            LightState::Off => self.enter_off(0, restore.dark_level, 0),
            LightState::On => self.enter_on(0, restore.lit_level, 0),
            LightState::Blinking => self.enter_blink(
                restore.blink_on_ms,
                restore.blink_off_ms,
                0,
                restore.lit_level,
                restore.dark_level,
            ),
        }
    }

    fn advance_pattern(&mut self) {
        match self.pattern.advance() {
            Some(Pulse::On(ms)) => self.on(ms, 100, 0),
            Some(Pulse::Off(ms)) => self.off(ms, 0, 0),
            None => {}
        }
    }

    fn write(&mut self, level: f32) {
        self.level = level;
        match self.kind {
            LightKind::Binary => {
                let high = self.active_level.apply_binary(level >= 0.5);
                self.output.write_binary(high);
            }
            LightKind::Dimmable => {
                let duty = self.active_level.apply(level);
                self.output.write_duty_cycle(duty);
            }
        }
    }
}

impl<'t, O, I, S> LightController<O, DeadlineTimers<'t, I, S>>
where
    O: LightOutput,
    I: TimeInstant,
    S: TimeSource<I>,
{
    /// Fires every expired timer in deadline order.
    ///
    /// # Returns
    /// - `ServiceTiming::Delay(duration)` - Service again after this delay
    /// - `ServiceTiming::Idle` - Nothing armed; service again after the next
    ///   public call
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        while let Some(slot) = self.timers.pop_expired() {
            self.handle_timer(slot);
        }
        self.timers.next_timing()
    }
}

impl<O: LightOutput, T: Timers> Drop for LightController<O, T> {
    fn drop(&mut self) {
        for slot in TimerSlot::ALL {
            self.timers.cancel(slot);
        }
        self.write(0.0);
    }
}

#[inline]
fn millis_to_micros(ms: u32) -> u64 {
    u64::from(ms) * 1_000
}
