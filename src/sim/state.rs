//! Simulation state and entity types
//!
//! Everything the frame step reads or writes lives in [`SimulationState`].
//! Coordinates are screen space: x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::level::{Level, LevelError};
use crate::tuning::Tuning;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
        )
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

/// Horizontal travel direction of a moving obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 or +1.0
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The player-controlled body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per frame
    pub vel: Vec2,
    /// Resting on a platform surface this frame (jump allowed)
    pub grounded: bool,
    /// In the air because of a jump
    pub jumping: bool,
    pub speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            size: Vec2::splat(tuning.player_size),
            vel: Vec2::ZERO,
            grounded: false,
            jumping: false,
            speed: tuning.player_speed,
            jump_impulse: tuning.jump_impulse,
            gravity: tuning.gravity,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Top-left corner before this frame's integration step
    #[inline]
    pub fn prev_pos(&self) -> Vec2 {
        self.pos - self.vel
    }

    /// Put the player back at `spawn` at rest. Size and constants are kept.
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.jumping = false;
    }
}

/// Solid, immovable platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

/// Platform bouncing horizontally between `min_x` and `max_x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub rect: Rect,
    /// Units per frame, grows with difficulty
    pub speed: f32,
    pub direction: Direction,
    pub min_x: f32,
    /// Compared against the right edge
    pub max_x: f32,
    /// Horizontal displacement applied on the latest frame
    #[serde(skip)]
    pub last_dx: f32,
}

impl MovingPlatform {
    /// Move one frame and bounce at the bounds. Returns the displacement applied.
    pub fn advance(&mut self) -> f32 {
        let dx = self.speed * self.direction.sign();
        self.rect.x += dx;
        if self.rect.x <= self.min_x || self.rect.right() >= self.max_x {
            self.direction = self.direction.flipped();
        }
        self.last_dx = dx;
        dx
    }

    /// Area swept over a full bounce cycle
    pub fn lane(&self) -> Rect {
        let left = self.min_x.min(self.rect.x);
        let right = self.max_x.max(self.rect.right());
        Rect::new(left, self.rect.y, right - left, self.rect.h)
    }
}

/// Triangular hazard; collides by its bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub rect: Rect,
}

/// Horizontal patrol range for a saw blade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SawPatrol {
    pub start_x: f32,
    pub end_x: f32,
    pub direction: Direction,
}

/// Spinning circular blade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SawBlade {
    pub center: Vec2,
    pub radius: f32,
    /// Units (and degrees of spin) per frame, grows with difficulty
    pub speed: f32,
    /// Degrees, visual only
    #[serde(default)]
    pub angle: f32,
    #[serde(default)]
    pub patrol: Option<SawPatrol>,
}

impl SawBlade {
    /// Spin, and patrol if this blade has a range
    pub fn advance(&mut self) {
        if let Some(patrol) = self.patrol.as_mut() {
            self.center.x += self.speed * patrol.direction.sign();
            let past_end = patrol.direction == Direction::Right && self.center.x > patrol.end_x;
            let past_start = patrol.direction == Direction::Left && self.center.x < patrol.start_x;
            if past_end || past_start {
                patrol.direction = patrol.direction.flipped();
            }
        }
        self.angle += self.speed;
    }

    /// Area the blade can reach
    pub fn reach(&self) -> Rect {
        let (left, right) = match self.patrol {
            Some(p) => (
                p.start_x.min(p.end_x).min(self.center.x),
                p.start_x.max(p.end_x).max(self.center.x),
            ),
            None => (self.center.x, self.center.x),
        };
        Rect::new(
            left - self.radius,
            self.center.y - self.radius,
            right - left + 2.0 * self.radius,
            2.0 * self.radius,
        )
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Level loaded, waiting for `start`
    Ready,
    Running,
    Paused,
    /// Player died, waiting for `restart`
    Dead,
    Quit,
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    MovingPlatform,
    Spike,
    SawBlade,
    FellOut,
    /// Climbed above the top kill line
    ReachedTop,
}

/// Things that happened during the latest step, for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Jumped,
    Landed,
    Died { cause: DeathCause },
}

/// Complete simulation state for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub tuning: Tuning,
    /// Render surface size the level was built for
    pub viewport: Vec2,
    pub spawn: Vec2,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub moving_platforms: Vec<MovingPlatform>,
    pub spikes: Vec<Spike>,
    pub saws: Vec<SawBlade>,
    pub phase: SimPhase,
    pub death_count: u32,
    /// Session time (ms), excludes time spent paused
    pub elapsed_ms: f64,
    /// Multiplier applied on the latest frame
    pub difficulty: f32,
    /// Frames stepped this session
    pub frame: u64,
    /// Events from the latest step
    #[serde(skip)]
    pub events: Vec<SimEvent>,
    /// Host timestamp of the previous real-time frame
    #[serde(skip)]
    pub(crate) last_frame_ms: Option<f64>,
}

impl SimulationState {
    /// Build a state around a generated level. The level and the tuning are
    /// checked first so malformed numbers never reach the collision math.
    pub fn new(level: Level, tuning: Tuning) -> Result<Self, LevelError> {
        level.validate(&tuning)?;
        let player = Player::new(level.spawn, &tuning);
        Ok(Self {
            viewport: Vec2::new(level.width, level.height),
            spawn: level.spawn,
            player,
            platforms: level.platforms,
            moving_platforms: level.moving_platforms,
            spikes: level.spikes,
            saws: level.saws,
            tuning,
            phase: SimPhase::Ready,
            death_count: 0,
            elapsed_ms: 0.0,
            difficulty: 1.0,
            frame: 0,
            events: Vec::new(),
            last_frame_ms: None,
        })
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == SimPhase::Paused
    }

    /// Read-only view for renderers and HUDs
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: &self.player,
            platforms: &self.platforms,
            moving_platforms: &self.moving_platforms,
            spikes: &self.spikes,
            saws: &self.saws,
            viewport: self.viewport,
            phase: self.phase,
            death_count: self.death_count,
            elapsed_ms: self.elapsed_ms,
            difficulty: self.difficulty,
            running: self.is_running(),
            paused: self.is_paused(),
        }
    }
}

/// Borrowed view of everything needed to draw a frame and show stats
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub player: &'a Player,
    pub platforms: &'a [Platform],
    pub moving_platforms: &'a [MovingPlatform],
    pub spikes: &'a [Spike],
    pub saws: &'a [SawBlade],
    pub viewport: Vec2,
    pub phase: SimPhase,
    pub death_count: u32,
    pub elapsed_ms: f64,
    pub difficulty: f32,
    pub running: bool,
    pub paused: bool,
}
