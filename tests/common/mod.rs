//! Shared test infrastructure for indicator-light integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use indicator_light::{
    ActiveLevel, DeadlineTimers, LightConfig, LightController, LightOutput, TimeDuration,
    TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(TestInstant(self.0 + duration.0))
    }
}

// ============================================================================
// Mock Output
// ============================================================================

/// A single write made to the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputWrite {
    Binary(bool),
    Duty(f32),
}

/// Mock output that records every write for testing
pub struct MockOutput {
    period_ms: Option<u32>,
    history: heapless::Vec<OutputWrite, 128>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            period_ms: None,
            history: heapless::Vec::new(),
        }
    }

    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    pub fn history(&self) -> &[OutputWrite] {
        &self.history
    }

    pub fn last(&self) -> Option<OutputWrite> {
        self.history.last().copied()
    }

    /// Duty cycles written, skipping binary writes.
    pub fn duties(&self) -> heapless::Vec<f32, 128> {
        self.history
            .iter()
            .filter_map(|w| match w {
                OutputWrite::Duty(d) => Some(*d),
                OutputWrite::Binary(_) => None,
            })
            .collect()
    }
}

impl LightOutput for MockOutput {
    fn write_binary(&mut self, high: bool) {
        let _ = self.history.push(OutputWrite::Binary(high));
    }

    fn write_duty_cycle(&mut self, duty: f32) {
        let _ = self.history.push(OutputWrite::Duty(duty));
    }

    fn set_period_ms(&mut self, period_ms: u32) {
        self.period_ms = Some(period_ms);
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub type TestLight<'t> = LightController<MockOutput, DeadlineTimers<'t, TestInstant, MockTimeSource>>;

/// Creates a dimmable light with a 1 ms PWM period
pub fn dimmable(time: &MockTimeSource, level: ActiveLevel) -> TestLight<'_> {
    LightController::new(
        MockOutput::new(),
        DeadlineTimers::new(time),
        LightConfig::dimmable(level, 1),
    )
}

/// Creates a binary light
pub fn binary(time: &MockTimeSource, level: ActiveLevel) -> TestLight<'_> {
    LightController::new(
        MockOutput::new(),
        DeadlineTimers::new(time),
        LightConfig::binary(level),
    )
}

/// Advance time and service the light
pub fn step(light: &mut TestLight<'_>, time: &MockTimeSource, millis: u64) {
    time.advance(TestDuration(millis));
    light.service();
}

/// Compare two intensities with floating-point tolerance
pub fn approx_eq(a: f32, b: f32) -> bool {
    const EPSILON: f32 = 0.001;
    (a - b).abs() < EPSILON
}
