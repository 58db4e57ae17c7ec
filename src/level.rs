//! Level generation and ingestion checks
//!
//! A level is four obstacle lists plus a spawn point, sized for one render
//! surface. Generation is seeded so a layout can be replayed.

use std::path::{Path, PathBuf};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{PLAYER_SIZE, SPAWN_OFFSET_Y};
use crate::sim::collision::aabb_overlap;
use crate::sim::state::{Direction, MovingPlatform, Platform, Rect, SawBlade, SawPatrol, Spike};
use crate::tuning::{Tuning, TuningError};

/// Smallest surface the generator lays out
pub const MIN_WIDTH: f32 = 200.0;
pub const MIN_HEIGHT: f32 = 300.0;

/// Hazards are kept at least this far from the spawn box
pub const SPAWN_SAFE_MARGIN: f32 = 40.0;

const SCATTER_ROUNDS: u32 = 100;
const PATH_STEPS: u32 = 40;
const PATH_WIDTH: f32 = 20.0;
const PATH_HEIGHT: f32 = 10.0;
const SPIKED_PASSAGES: u32 = 10;
const SAW_CORRIDORS: u32 = 5;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("surface {width}x{height} is too small for a level")]
    SurfaceTooSmall { width: f32, height: f32 },
    #[error("{kind} #{index} has a non-finite value")]
    NonFinite { kind: &'static str, index: usize },
    #[error("{kind} #{index} has a non-positive size")]
    BadSize { kind: &'static str, index: usize },
    #[error("{kind} #{index} at ({x}, {y}) lies outside the surface")]
    OutOfBounds {
        kind: &'static str,
        index: usize,
        x: f32,
        y: f32,
    },
    #[error("{kind} #{index} speed {speed} outside [0, {cap}]")]
    BadSpeed {
        kind: &'static str,
        index: usize,
        speed: f32,
        cap: f32,
    },
    #[error("spawn point ({x}, {y}) is not a safe place to start")]
    UnsafeSpawn { x: f32, y: f32 },
    #[error("spawn overlaps {kind} #{index}")]
    LethalSpawn { kind: &'static str, index: usize },
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Everything level generation hands to the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    /// Player top-left at spawn
    pub spawn: Vec2,
    pub platforms: Vec<Platform>,
    pub moving_platforms: Vec<MovingPlatform>,
    pub spikes: Vec<Spike>,
    pub saws: Vec<SawBlade>,
}

impl Level {
    /// Read a hand-made level from a JSON file
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| LevelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject anything that would feed garbage into the collision math, or
    /// kill the player on the first frame. The tuning is checked too, since
    /// caps and player size take part in the checks below.
    pub fn validate(&self, tuning: &Tuning) -> Result<(), LevelError> {
        tuning.validate()?;
        let (w, h) = (self.width, self.height);
        if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
            return Err(LevelError::SurfaceTooSmall {
                width: w,
                height: h,
            });
        }

        for (index, p) in self.platforms.iter().enumerate() {
            check_rect("platform", index, &p.rect, w, h)?;
        }
        for (index, p) in self.moving_platforms.iter().enumerate() {
            let kind = "moving platform";
            check_rect(kind, index, &p.rect, w, h)?;
            if !p.min_x.is_finite() || !p.max_x.is_finite() {
                return Err(LevelError::NonFinite { kind, index });
            }
            check_speed(kind, index, p.speed, tuning.platform_speed_cap)?;
        }
        for (index, s) in self.spikes.iter().enumerate() {
            check_rect("spike", index, &s.rect, w, h)?;
        }
        for (index, s) in self.saws.iter().enumerate() {
            let kind = "saw blade";
            let patrol_finite = s
                .patrol
                .is_none_or(|p| p.start_x.is_finite() && p.end_x.is_finite());
            if !s.center.is_finite() || !s.radius.is_finite() || !s.angle.is_finite() || !patrol_finite {
                return Err(LevelError::NonFinite { kind, index });
            }
            if s.radius <= 0.0 {
                return Err(LevelError::BadSize { kind, index });
            }
            check_point(kind, index, s.center, w, h)?;
            check_speed(kind, index, s.speed, tuning.saw_speed_cap)?;
        }

        self.check_spawn(tuning)
    }

    fn check_spawn(&self, tuning: &Tuning) -> Result<(), LevelError> {
        let spawn = self.spawn;
        let unsafe_spawn = LevelError::UnsafeSpawn {
            x: spawn.x,
            y: spawn.y,
        };
        if !spawn.is_finite() || spawn.y < tuning.top_kill_line || spawn.y > self.height {
            return Err(unsafe_spawn);
        }

        let size = tuning.player_size;
        let body = Rect::new(spawn.x, spawn.y, size, size);
        if let Some(index) = self.moving_platforms.iter().position(|p| aabb_overlap(&body, &p.rect)) {
            return Err(LevelError::LethalSpawn {
                kind: "moving platform",
                index,
            });
        }
        if let Some(index) = self.spikes.iter().position(|s| aabb_overlap(&body, &s.rect)) {
            return Err(LevelError::LethalSpawn { kind: "spike", index });
        }
        let center = body.center();
        if let Some(index) = self.saws.iter().position(|s| center.distance(s.center) < s.radius) {
            return Err(LevelError::LethalSpawn {
                kind: "saw blade",
                index,
            });
        }
        Ok(())
    }
}

fn check_point(kind: &'static str, index: usize, p: Vec2, w: f32, h: f32) -> Result<(), LevelError> {
    if p.x < 0.0 || p.x > w || p.y < 0.0 || p.y > h {
        return Err(LevelError::OutOfBounds {
            kind,
            index,
            x: p.x,
            y: p.y,
        });
    }
    Ok(())
}

fn check_rect(kind: &'static str, index: usize, r: &Rect, w: f32, h: f32) -> Result<(), LevelError> {
    if !r.is_finite() {
        return Err(LevelError::NonFinite { kind, index });
    }
    if r.w <= 0.0 || r.h <= 0.0 {
        return Err(LevelError::BadSize { kind, index });
    }
    check_point(kind, index, Vec2::new(r.x, r.y), w, h)
}

fn check_speed(kind: &'static str, index: usize, speed: f32, cap: f32) -> Result<(), LevelError> {
    if !speed.is_finite() || speed < 0.0 || speed > cap {
        return Err(LevelError::BadSpeed {
            kind,
            index,
            speed,
            cap,
        });
    }
    Ok(())
}

/// Generate the stock layout for a surface, with the stock player size
pub fn generate(seed: u64, width: f32, height: f32) -> Result<Level, LevelError> {
    generate_with(seed, width, height, PLAYER_SIZE)
}

/// Generate a layout: a floor, a random scatter of everything, a barely
/// climbable path up the middle, spiked passages and patrolling saw
/// corridors. Hazards near the spawn are removed afterwards.
pub fn generate_with(seed: u64, width: f32, height: f32, player_size: f32) -> Result<Level, LevelError> {
    if !(width >= MIN_WIDTH && height >= MIN_HEIGHT) {
        return Err(LevelError::SurfaceTooSmall { width, height });
    }

    let mut b = Builder {
        rng: Pcg32::seed_from_u64(seed),
        width,
        height,
        level: Level {
            width,
            height,
            spawn: Vec2::new(width / 2.0 - player_size / 2.0, height - SPAWN_OFFSET_Y),
            platforms: Vec::new(),
            moving_platforms: Vec::new(),
            spikes: Vec::new(),
            saws: Vec::new(),
        },
    };

    b.platform(0.0, height - 50.0, width, 50.0);
    b.scatter();
    b.impossible_path();
    b.spiked_passages();
    b.saw_corridors();

    let removed = b.clear_spawn(player_size);
    let level = b.level;
    log::info!(
        "Generated level (seed {}): {} platforms, {} moving, {} spikes, {} saws ({} hazards cleared from spawn)",
        seed,
        level.platforms.len(),
        level.moving_platforms.len(),
        level.spikes.len(),
        level.saws.len(),
        removed
    );
    Ok(level)
}

struct Builder {
    rng: Pcg32,
    width: f32,
    height: f32,
    level: Level,
}

impl Builder {
    /// Uniform in [0, 1)
    fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn direction(&mut self) -> Direction {
        if self.roll() > 0.5 {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    fn cx(&self, x: f32) -> f32 {
        x.clamp(0.0, self.width)
    }

    fn cy(&self, y: f32) -> f32 {
        y.clamp(0.0, self.height)
    }

    fn platform(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = Rect::new(self.cx(x), self.cy(y), w, h);
        self.level.platforms.push(Platform { rect });
    }

    fn spike(&mut self, x: f32, y: f32, size: f32) {
        let rect = Rect::new(self.cx(x), self.cy(y), size, size);
        self.level.spikes.push(Spike { rect });
    }

    #[allow(clippy::too_many_arguments)]
    fn moving(&mut self, x: f32, y: f32, w: f32, h: f32, speed: f32, min_x: f32, max_x: f32) {
        let direction = self.direction();
        let rect = Rect::new(self.cx(x), self.cy(y), w, h);
        self.level.moving_platforms.push(MovingPlatform {
            rect,
            speed,
            direction,
            min_x,
            max_x,
            last_dx: 0.0,
        });
    }

    fn saw(&mut self, x: f32, y: f32, radius: f32, speed: f32, patrol: Option<SawPatrol>) {
        let center = Vec2::new(self.cx(x), self.cy(y));
        self.level.saws.push(SawBlade {
            center,
            radius,
            speed,
            angle: 0.0,
            patrol,
        });
    }

    fn scatter(&mut self) {
        let (w, h) = (self.width, self.height);
        for _ in 0..SCATTER_ROUNDS {
            if self.roll() > 0.1 {
                let (x, y) = (self.roll() * (w - 80.0), self.roll() * (h - 200.0));
                let (pw, ph) = (20.0 + self.roll() * 50.0, 5.0 + self.roll() * 10.0);
                self.platform(x, y, pw, ph);
            }

            if self.roll() > 0.2 {
                let (x, y) = (self.roll() * (w - 20.0), self.roll() * (h - 80.0));
                self.spike(x, y, 20.0);
            }

            if self.roll() > 0.3 {
                let (x, y) = (self.roll() * (w - 80.0), self.roll() * (h - 200.0));
                let (pw, ph) = (20.0 + self.roll() * 50.0, 5.0 + self.roll() * 10.0);
                let speed = 3.0 + self.roll() * 7.0;
                let min_x = self.roll() * (w / 4.0);
                let max_x = w / 4.0 + self.roll() * (w / 2.0);
                self.moving(x, y, pw, ph, speed, min_x, max_x);
            }

            if self.roll() > 0.4 {
                let (x, y) = (self.roll() * (w - 40.0), self.roll() * (h - 40.0));
                let radius = 10.0 + self.roll() * 30.0;
                let speed = 3.0 + self.roll() * 10.0;
                self.saw(x, y, radius, speed, None);
            }
        }
    }

    /// Tiny steps up the screen with huge random sideways gaps, each one
    /// guarded by spikes and a saw. It leads to the top, which is fatal.
    fn impossible_path(&mut self) {
        let (w, h) = (self.width, self.height);
        let step_height = (h - 150.0) / PATH_STEPS as f32;
        let mut x = w / 2.0 - PATH_WIDTH / 2.0;

        for i in 0..PATH_STEPS {
            let y = h - 100.0 - i as f32 * step_height;
            self.platform(x, y, PATH_WIDTH, PATH_HEIGHT);

            x += self.roll() * 400.0 - 200.0;
            x = x.clamp(0.0, w - PATH_WIDTH);

            self.spike(x - 30.0, y - 30.0, 30.0);
            self.spike(x + PATH_WIDTH, y - 30.0, 30.0);
            self.saw(x + PATH_WIDTH / 2.0, y - 50.0, 25.0, 6.0, None);

            if i % 2 == 0 {
                self.moving(x - 60.0, y - 70.0, 30.0, 8.0, 5.0, x - 150.0, x + 150.0);
            }
        }
    }

    /// Tall thin walls with a column of spikes on each side
    fn spiked_passages(&mut self) {
        let (w, h) = (self.width, self.height);
        for _ in 0..SPIKED_PASSAGES {
            let x = self.roll() * (w - 100.0);
            let y = self.roll() * (h - 200.0);
            self.platform(x, y, 20.0, 100.0);
            for j in 0..5 {
                let sy = y + j as f32 * 20.0;
                self.spike(x - 30.0, sy, 20.0);
                self.spike(x + 30.0, sy, 20.0);
            }
        }
    }

    /// Rows of three saws sweeping across a shared range, lined up from its
    /// left end
    fn saw_corridors(&mut self) {
        let (w, h) = (self.width, self.height);
        for _ in 0..SAW_CORRIDORS {
            let a = self.roll() * w;
            let b = self.roll() * w;
            let y = self.roll() * (h - 200.0);
            let patrol = SawPatrol {
                start_x: a.min(b),
                end_x: a.max(b),
                direction: Direction::Right,
            };
            for j in 0..3 {
                self.saw(patrol.start_x + j as f32 * 50.0, y, 20.0, 4.0, Some(patrol));
            }
        }
    }

    /// Drop every hazard that can reach the area around the spawn. Returns
    /// how many were removed.
    fn clear_spawn(&mut self, player_size: f32) -> usize {
        let spawn = self.level.spawn;
        let zone = Rect::new(spawn.x, spawn.y, player_size, player_size).inflate(SPAWN_SAFE_MARGIN);
        let level = &mut self.level;
        let before = level.spikes.len() + level.moving_platforms.len() + level.saws.len();

        level.spikes.retain(|s| !aabb_overlap(&s.rect, &zone));
        level.moving_platforms.retain(|p| !aabb_overlap(&p.lane(), &zone));
        level.saws.retain(|s| !aabb_overlap(&s.reach(), &zone));

        before - (level.spikes.len() + level.moving_platforms.len() + level.saws.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_level() {
        let a = generate(42, 1280.0, 720.0).unwrap();
        let b = generate(42, 1280.0, 720.0).unwrap();
        assert_eq!(a, b);
        let c = generate(43, 1280.0, 720.0).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_levels_validate() {
        let tuning = Tuning::default();
        for seed in 0..25 {
            let level = generate(seed, 1024.0, 768.0).unwrap();
            level.validate(&tuning).unwrap();
        }
    }

    #[test]
    fn test_floor_and_spawn() {
        let level = generate(1, 800.0, 600.0).unwrap();
        assert_eq!(level.platforms[0].rect, Rect::new(0.0, 550.0, 800.0, 50.0));
        assert_eq!(level.spawn, Vec2::new(385.0, 500.0));
        assert!(!level.spikes.is_empty());
        assert!(!level.saws.is_empty());
    }

    #[test]
    fn test_spawn_zone_is_clear() {
        for seed in 0..25 {
            let level = generate(seed, 1024.0, 768.0).unwrap();
            let zone = Rect::new(level.spawn.x, level.spawn.y, PLAYER_SIZE, PLAYER_SIZE)
                .inflate(SPAWN_SAFE_MARGIN);
            assert!(level.spikes.iter().all(|s| !aabb_overlap(&s.rect, &zone)));
            assert!(level.moving_platforms.iter().all(|p| !aabb_overlap(&p.lane(), &zone)));
            assert!(level.saws.iter().all(|s| !aabb_overlap(&s.reach(), &zone)));
        }
    }

    #[test]
    fn test_corridor_saws_start_at_left_end_of_patrol() {
        for seed in 0..25 {
            let level = generate(seed, 1024.0, 768.0).unwrap();
            for saw in &level.saws {
                let Some(patrol) = saw.patrol else { continue };
                assert!(patrol.start_x <= patrol.end_x);
                let offset = saw.center.x - patrol.start_x;
                let lined_up = [0.0, 50.0, 100.0].iter().any(|o| (offset - o).abs() < 1e-3);
                assert!(lined_up || saw.center.x == level.width, "seed {seed}: offset {offset}");
            }
        }
    }

    #[test]
    fn test_rejects_tiny_surface() {
        assert!(matches!(
            generate(1, 100.0, 600.0),
            Err(LevelError::SurfaceTooSmall { .. })
        ));
        assert!(generate(1, 800.0, f32::NAN).is_err());
    }

    #[test]
    fn test_validate_rejects_nan_coordinates() {
        let mut level = generate(3, 800.0, 600.0).unwrap();
        level.spikes[0].rect.x = f32::NAN;
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::NonFinite { kind: "spike", index: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_speed_over_cap() {
        let mut level = generate(3, 800.0, 600.0).unwrap();
        level.saws[0].speed = 25.0;
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::BadSpeed { kind: "saw blade", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_lethal_spawn() {
        let mut level = generate(3, 800.0, 600.0).unwrap();
        level.spikes.push(Spike {
            rect: Rect::new(level.spawn.x + 5.0, level.spawn.y + 5.0, 20.0, 20.0),
        });
        assert!(matches!(
            level.validate(&Tuning::default()),
            Err(LevelError::LethalSpawn { kind: "spike", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_tuning() {
        let level = generate(3, 800.0, 600.0).unwrap();
        let tuning = Tuning {
            difficulty_ramp_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            level.validate(&tuning),
            Err(LevelError::Tuning(TuningError::NotPositive {
                field: "difficulty_ramp_ms",
                ..
            }))
        ));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let level = generate(9, 800.0, 600.0).unwrap();
        let path = std::env::temp_dir().join(format!("spike-gauntlet-level-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&level).unwrap()).unwrap();
        let loaded = Level::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, level);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Level::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
