//! Command-based control for lights.

use crate::pattern::{PATTERN_CAPACITY, PulsePattern};

/// Actions for controlling a light.
///
/// Each variant mirrors a [`LightController`](crate::LightController) method
/// with the same parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum LightAction {
    /// Turn on.
    On {
        duration_ms: u32,
        intensity_pct: u8,
        ramp_ms: u32,
    },
    /// Turn off.
    Off {
        duration_ms: u32,
        intensity_pct: u8,
        ramp_ms: u32,
    },
    /// Blink.
    Blink {
        on_ms: u32,
        off_ms: u32,
        duration_ms: u32,
        on_pct: u8,
        off_pct: u8,
    },
    /// Change blink durations.
    UpdateBlinkTimes { on_ms: u32, off_ms: u32 },
    /// Play a pulse pattern.
    SetPattern(PulsePattern<PATTERN_CAPACITY>),
    /// Stop the pulse pattern and turn off.
    CancelPattern,
}

impl LightAction {
    /// Turn on instantly at full intensity, indefinitely.
    pub const ON: LightAction = LightAction::On {
        duration_ms: 0,
        intensity_pct: 100,
        ramp_ms: 0,
    };

    /// Turn off instantly, indefinitely.
    pub const OFF: LightAction = LightAction::Off {
        duration_ms: 0,
        intensity_pct: 0,
        ramp_ms: 0,
    };

    /// Blink between full intensity and dark, indefinitely.
    pub const fn blink(on_ms: u32, off_ms: u32) -> Self {
        LightAction::Blink {
            on_ms,
            off_ms,
            duration_ms: 0,
            on_pct: 100,
            off_pct: 0,
        }
    }
}

/// Command targeting a specific light.
#[derive(Debug, Clone)]
pub struct LightCommand<Id> {
    pub light_id: Id,
    pub action: LightAction,
}

impl<Id> LightCommand<Id> {
    /// Creates command.
    pub fn new(light_id: Id, action: LightAction) -> Self {
        Self { light_id, action }
    }
}
