//! Spike Gauntlet entry point
//!
//! Headless native driver: generates (or loads) a level and runs the
//! display-driven loop against a simulated refresh clock with a scripted
//! player, retrying after every death like the death screen does.
//!
//! Usage: `spike-gauntlet [settings.json]`

use std::path::PathBuf;

use spike_gauntlet::consts::FRAME_MS;
use spike_gauntlet::records::{SurvivalEntry, format_survival};
use spike_gauntlet::render::{as_bytes, build_frame};
use spike_gauntlet::sim::{SimEvent, SimPhase, SimulationState, TickInput, tick};
use spike_gauntlet::{Level, LevelError, Settings, SurvivalRecords, level};

/// Keyboard stand-in: runs back and forth and jumps whenever it can
struct ScriptedInput {
    horizontal: i8,
    frame: u64,
}

impl ScriptedInput {
    fn new() -> Self {
        Self {
            horizontal: 1,
            frame: 0,
        }
    }

    fn next(&mut self, state: &SimulationState) -> TickInput {
        self.frame += 1;
        let player = &state.player;
        if player.pos.x < player.size.x {
            self.horizontal = 1;
        } else if player.pos.x + 2.0 * player.size.x > state.viewport.x {
            self.horizontal = -1;
        }
        TickInput {
            horizontal: self.horizontal,
            jump: player.grounded && self.frame % 20 == 0,
        }
    }
}

/// Game instance holding all state
struct Game {
    state: SimulationState,
    seed: u64,
    input: ScriptedInput,
    records: SurvivalRecords,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
    /// Frames left on the death screen
    retry_countdown: Option<u32>,
}

impl Game {
    fn new(state: SimulationState, seed: u64, records: SurvivalRecords) -> Self {
        Self {
            state,
            seed,
            input: ScriptedInput::new(),
            records,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            retry_countdown: None,
        }
    }

    /// One display refresh: step if running, then render
    fn frame(&mut self, time: f64, settings: &Settings) -> usize {
        let input = self.input.next(&self.state);
        tick(&mut self.state, &input, time);

        for event in self.state.events.drain(..) {
            if let SimEvent::Died { cause } = event {
                log::info!(
                    "Death #{} ({:?}) after {}",
                    self.state.death_count,
                    cause,
                    format_survival(self.state.elapsed_ms)
                );
                let entry = SurvivalEntry {
                    survival_ms: self.state.elapsed_ms,
                    death_number: self.state.death_count,
                    cause,
                    seed: self.seed,
                };
                if let Some(rank) = self.records.add(entry) {
                    log::info!("New survival record, rank {}", rank);
                }
                self.retry_countdown = Some(settings.retry_delay_frames);
            }
        }

        // Death screen, then retry
        if self.state.phase == SimPhase::Dead {
            match self.retry_countdown {
                Some(0) | None => {
                    self.retry_countdown = None;
                    self.state.restart();
                }
                Some(n) => self.retry_countdown = Some(n - 1),
            }
        }

        self.track_fps(time);

        // Pure projection; a real host would upload these bytes
        let vertices = build_frame(&self.state.snapshot());
        as_bytes(&vertices).len()
    }

    fn track_fps(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % 60;

        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }
}

fn build_level(settings: &Settings, seed: u64) -> Result<Level, LevelError> {
    match &settings.level_path {
        Some(path) => Level::load(path),
        None => level::generate_with(seed, settings.width, settings.height, settings.tuning.player_size),
    }
}

fn main() {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);

    // Logger first so settings problems are reported
    let filter = settings_path
        .as_deref()
        .and_then(|p| Settings::load(p).ok())
        .map(|s| s.log_filter)
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    log::info!("Spike Gauntlet (headless) starting...");

    let settings = Settings::load_or_default(settings_path.as_deref());
    let seed = settings.seed.unwrap_or_else(rand::random);

    let level = match build_level(&settings, seed) {
        Ok(level) => level,
        Err(e) => {
            log::error!("Could not build level: {e}");
            std::process::exit(1);
        }
    };
    let state = match SimulationState::new(level, settings.tuning.clone()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Level rejected: {e}");
            std::process::exit(1);
        }
    };

    let records = settings
        .records_path
        .as_deref()
        .map(SurvivalRecords::load_or_default)
        .unwrap_or_default();

    let mut game = Game::new(state, seed, records);
    game.state.start();

    let frame_ms = if settings.frame_ms > 0.0 { settings.frame_ms } else { FRAME_MS };
    let mut bytes = 0;
    for i in 0..settings.max_frames {
        let time = (i + 1) as f64 * frame_ms;
        bytes = game.frame(time, &settings);
        if settings.show_fps && i > 0 && i % 600 == 0 {
            log::info!(
                "frame {} | fps {} | deaths {} | time {} | difficulty x{:.2}",
                i,
                game.fps,
                game.state.death_count,
                format_survival(game.state.elapsed_ms),
                game.state.difficulty
            );
        }
    }
    game.state.quit();
    log::debug!("Last frame: {} vertex bytes", bytes);

    if let Some(path) = settings.records_path.as_deref() {
        if let Err(e) = game.records.save(path) {
            log::warn!("{e}");
        }
    }

    let best = game.records.best().map(format_survival).unwrap_or_else(|| "-".to_string());
    println!(
        "seed {} | deaths {} | best survival {}",
        seed, game.state.death_count, best
    );
}
