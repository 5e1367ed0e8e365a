//! Core types describing a light and its state.

use crate::pattern::PatternError;

/// How the light is physically driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightKind {
    /// Plain digital output. Intensity is always 0 or 1 and ramps are ignored.
    Binary,

    /// PWM output with a continuously variable duty cycle.
    Dimmable,
}

/// Which physical level lights the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Driving the pin high lights the LED.
    High,

    /// Driving the pin low lights the LED.
    Low,
}

impl ActiveLevel {
    /// Maps a logical level (1.0 = fully lit) to the physical duty cycle and back.
    #[inline]
    pub fn apply(self, level: f32) -> f32 {
        match self {
            ActiveLevel::High => level,
            ActiveLevel::Low => 1.0 - level,
        }
    }

    /// Maps a logical lit/dark flag to the pin level.
    #[inline]
    pub fn apply_binary(self, lit: bool) -> bool {
        match self {
            ActiveLevel::High => lit,
            ActiveLevel::Low => !lit,
        }
    }
}

/// Steady state the light is settled in or transitioning toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightState {
    Off,
    On,
    Blinking,
}

/// Sub-phase of the current transition.
///
/// Ramps move through `SettlingOn`/`SettlingOff` and end in the matching
/// settled phase. While blinking, the phase tracks which half is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    SettlingOff,
    SettlingOn,
    SettledOff,
    SettledOn,
}

/// Construction parameters for a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    /// Output kind.
    pub kind: LightKind,

    /// Active level of the pin.
    pub active_level: ActiveLevel,

    /// PWM period in milliseconds. Ignored for binary lights.
    pub period_ms: u32,
}

impl LightConfig {
    /// Configuration for a plain on/off light.
    pub const fn binary(active_level: ActiveLevel) -> Self {
        Self {
            kind: LightKind::Binary,
            active_level,
            period_ms: 0,
        }
    }

    /// Configuration for a PWM-driven light.
    pub const fn dimmable(active_level: ActiveLevel, period_ms: u32) -> Self {
        Self {
            kind: LightKind::Dimmable,
            active_level,
            period_ms,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::dimmable(ActiveLevel::High, 1)
    }
}

/// Errors returned by light operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightError {
    /// An argument was out of range.
    InvalidArgument,
    /// A pulse pattern has more durations than the controller can hold.
    PatternTooLong { len: usize, capacity: usize },
}

impl core::fmt::Display for LightError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LightError::InvalidArgument => write!(f, "invalid argument"),
            LightError::PatternTooLong { len, capacity } => {
                write!(f, "pattern of {} durations exceeds capacity of {}", len, capacity)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LightError {}

impl From<PatternError> for LightError {
    fn from(_: PatternError) -> Self {
        LightError::InvalidArgument
    }
}
