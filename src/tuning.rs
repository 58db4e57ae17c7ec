//! Data-driven game balance
//!
//! Physics and difficulty knobs. Defaults reproduce the stock game exactly;
//! overrides come from the `tuning` section of the settings file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("tuning value `{field}` must be finite and > 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Session-constant physics and difficulty parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_size: f32,
    pub player_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Player y below this (towards the top of the screen) is fatal
    pub top_kill_line: f32,
    /// Milliseconds of session time per +1.0 of difficulty
    pub difficulty_ramp_ms: f64,
    pub platform_speed_cap: f32,
    pub saw_speed_cap: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            jump_impulse: JUMP_IMPULSE,
            gravity: GRAVITY,
            top_kill_line: TOP_KILL_LINE,
            difficulty_ramp_ms: DIFFICULTY_RAMP_MS,
            platform_speed_cap: PLATFORM_SPEED_CAP,
            saw_speed_cap: SAW_SPEED_CAP,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields: [(&'static str, f64); 7] = [
            ("player_size", self.player_size as f64),
            ("player_speed", self.player_speed as f64),
            ("jump_impulse", self.jump_impulse as f64),
            ("gravity", self.gravity as f64),
            ("difficulty_ramp_ms", self.difficulty_ramp_ms),
            ("platform_speed_cap", self.platform_speed_cap as f64),
            ("saw_speed_cap", self.saw_speed_cap as f64),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if !self.top_kill_line.is_finite() {
            return Err(TuningError::NotPositive {
                field: "top_kill_line",
                value: self.top_kill_line as f64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_gravity() {
        let tuning = Tuning {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_rejects_nan_cap() {
        let tuning = Tuning {
            saw_speed_cap: f32::NAN,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "gravity": 0.8 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.player_speed, PLAYER_SPEED);
        assert_eq!(tuning.saw_speed_cap, SAW_SPEED_CAP);
    }
}
