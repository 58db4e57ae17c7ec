//! Spike Gauntlet - a 2D platformer you are not supposed to survive
//!
//! Core modules:
//! - `sim`: Simulation core (integration, collisions, difficulty ramp, lifecycle)
//! - `level`: Seeded level generation and ingestion checks
//! - `render`: Read-only projection of simulation state into triangles
//! - `records`: Best survival times
//! - `settings`/`tuning`: Data-driven configuration

pub mod level;
pub mod records;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelError};
pub use records::SurvivalRecords;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Player box size (square)
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Horizontal speed in units/frame
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Upward velocity applied on jump
    pub const JUMP_IMPULSE: f32 = 12.0;
    /// Downward acceleration in units/frame²
    pub const GRAVITY: f32 = 0.5;

    /// Spawn is centred horizontally, this far above the bottom edge
    pub const SPAWN_OFFSET_Y: f32 = 100.0;

    /// Reaching above this y kills the player (there is no way out)
    pub const TOP_KILL_LINE: f32 = 50.0;

    /// Difficulty multiplier grows by 1.0 per this many ms of session time
    pub const DIFFICULTY_RAMP_MS: f64 = 60_000.0;
    /// Moving platform speed ceiling (units/frame)
    pub const PLATFORM_SPEED_CAP: f32 = 15.0;
    /// Saw blade speed ceiling (units/frame)
    pub const SAW_SPEED_CAP: f32 = 20.0;

    /// Nominal display refresh used by the headless driver and tests
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
