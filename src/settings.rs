//! Runtime settings
//!
//! Loaded from a JSON file (path given on the command line). Every field has
//! a default so partial files work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::FRAME_MS;
use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read/write settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is invalid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Surface ===
    pub width: f32,
    pub height: f32,

    // === Level ===
    /// Level seed; random per run when absent
    pub seed: Option<u64>,
    /// Hand-made level file, used instead of generation
    pub level_path: Option<PathBuf>,

    // === Loop ===
    /// Display refresh the headless driver simulates
    pub frame_ms: f64,
    /// Stop after this many frames
    pub max_frames: u64,
    /// Frames to wait on the death screen before retrying
    pub retry_delay_frames: u32,

    // === HUD / logging ===
    pub show_fps: bool,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,

    // === Persistence ===
    pub records_path: Option<PathBuf>,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            seed: None,
            level_path: None,
            frame_ms: FRAME_MS,
            max_frames: 60 * 60 * 3,
            retry_delay_frames: 45,
            show_fps: true,
            log_filter: "info".to_string(),
            records_path: Some(PathBuf::from("spike_gauntlet_records.json")),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given; fall back to defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(SettingsError::Invalid {
                field: "width/height",
                reason: format!("{}x{} is not a usable surface", self.width, self.height),
            });
        }
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "frame_ms",
                reason: format!("{} must be > 0", self.frame_ms),
            });
        }
        self.tuning.validate()?;
        Ok(())
    }
}
