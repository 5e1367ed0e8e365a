//! Percentage to duty-cycle conversion.

use crate::types::{ActiveLevel, LightKind};

/// Number of discrete steps a ramp takes between the dark and lit levels.
pub const RAMP_STEPS: f32 = 10.0;

/// Converts an intensity percentage into the physical duty cycle for the
/// given active level.
///
/// Input above 100 is clamped. For `ActiveLevel::High` the result is
/// `pct / 100`. For `ActiveLevel::Low` it is `1 - pct / 100`, except that an
/// input of exactly 1 yields 1.0 instead of 0.99; existing installations
/// depend on that boundary.
///
/// ```
/// # use indicator_light::{convert_intensity, ActiveLevel};
/// assert_eq!(convert_intensity(0, ActiveLevel::High), 0.0);
/// assert_eq!(convert_intensity(100, ActiveLevel::Low), 0.0);
/// assert_eq!(convert_intensity(1, ActiveLevel::Low), 1.0);
/// ```
pub fn convert_intensity(pct: u8, active_level: ActiveLevel) -> f32 {
    let pct = pct.min(100);
    match active_level {
        ActiveLevel::High => {
            if pct == 0 {
                0.0
            } else {
                f32::from(pct) / 100.0
            }
        }
        ActiveLevel::Low => {
            if pct == 1 {
                1.0
            } else {
                1.0 - f32::from(pct) / 100.0
            }
        }
    }
}

/// Converts a percentage into the logical level (1.0 = fully lit) a light of
/// this kind will hold.
///
/// Binary lights collapse any non-zero percentage to fully lit.
pub(crate) fn logical_level(pct: u8, kind: LightKind, active_level: ActiveLevel) -> f32 {
    match kind {
        LightKind::Binary => {
            if pct != 0 {
                1.0
            } else {
                0.0
            }
        }
        LightKind::Dimmable => active_level.apply(convert_intensity(pct, active_level)),
    }
}
