//! Time-scaled difficulty ramp
//!
//! The multiplier is applied to the *stored* speed every frame, so speeds
//! grow geometrically (and frame-rate dependently) until they hit their cap.

use super::state::{MovingPlatform, SawBlade};

/// `1 + elapsed / ramp`: 1.0 at session start, +1.0 per ramp period
#[inline]
pub fn multiplier(elapsed_ms: f64, ramp_ms: f64) -> f32 {
    (1.0 + elapsed_ms.max(0.0) / ramp_ms) as f32
}

/// One frame of compounding growth, clamped to `cap`
#[inline]
pub fn scale_speed(speed: f32, multiplier: f32, cap: f32) -> f32 {
    (speed * multiplier).min(cap)
}

/// Apply `multiplier` to every moving obstacle
pub fn apply(
    multiplier: f32,
    moving_platforms: &mut [MovingPlatform],
    platform_cap: f32,
    saws: &mut [SawBlade],
    saw_cap: f32,
) {
    for platform in moving_platforms {
        platform.speed = scale_speed(platform.speed, multiplier, platform_cap);
    }
    for saw in saws {
        saw.speed = scale_speed(saw.speed, multiplier, saw_cap);
    }
}
