#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`LightController`**: Drives a single light through on/off, ramps, blinking and patterns
//! - **`LightConfig`**: Kind (`Binary` or `Dimmable`), active level and PWM period of a light
//! - **`LightOutput`**: Trait to implement for your pin hardware
//! - **`Timers`**: Trait to implement for your timer facility; expiries go to `handle_timer`
//! - **`DeadlineTimers`**: Software `Timers` on top of a `TimeSource`, driven by `service`
//! - **`PulsePattern`**: Cyclic list of alternating on/off durations
//! - **`LightAction`**: Commands that can be sent to control lights
//! - **`SharedLight`**: Critical-section wrapper for interrupt-driven timers
//!
//! Intensities are percentages (0-100) at the API and duty cycles (0.0-1.0)
//! at the output. Active-low pins are inverted by the controller, so
//! `LightOutput` implementations write values straight to the hardware.

// Must come first so the logging macros are visible in every module.
mod fmt;

pub mod command;
pub mod intensity;
pub mod light;
pub mod pattern;
pub mod shared;
pub mod time;
pub mod timer;
pub mod types;

pub use command::{LightAction, LightCommand};
pub use intensity::convert_intensity;
pub use light::{LightController, LightOutput};
pub use pattern::{
    FLASH_MS, FLASH_PAUSE_MS, PATTERN_CAPACITY, PatternBuilder, PatternError, Pulse, PulsePattern,
};
pub use shared::SharedLight;
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::{DeadlineTimers, ServiceTiming, TimerSlot, Timers};
pub use types::{ActiveLevel, LightConfig, LightError, LightKind, LightState, Phase};
