//! Session lifecycle: start, pause/resume, death, restart, quit
//!
//! These are the only entry points that change [`SimPhase`]. None of them
//! touch obstacle positions or speeds except `regenerate`.

use super::state::{DeathCause, SimEvent, SimPhase, SimulationState};
use crate::level::{Level, LevelError};

impl SimulationState {
    /// Begin the first session
    pub fn start(&mut self) {
        if self.phase != SimPhase::Ready {
            return;
        }
        self.begin_session();
        log::info!("Session started");
    }

    pub fn pause(&mut self) {
        if self.phase == SimPhase::Running {
            self.phase = SimPhase::Paused;
            log::info!("Paused at {:.0} ms", self.elapsed_ms);
        }
    }

    /// Continue from exactly the pre-pause state. Paused wall time is not
    /// counted towards the difficulty ramp.
    pub fn resume(&mut self) {
        if self.phase == SimPhase::Paused {
            self.phase = SimPhase::Running;
            self.last_frame_ms = None;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            SimPhase::Running => self.pause(),
            SimPhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Put the player back at spawn and begin a new session on the same layout
    pub fn restart(&mut self) {
        if self.phase == SimPhase::Quit {
            return;
        }
        self.begin_session();
        log::info!("Restarted (deaths so far: {})", self.death_count);
    }

    /// Swap in a freshly generated layout, then restart
    pub fn regenerate(&mut self, level: Level) -> Result<(), LevelError> {
        if self.phase == SimPhase::Quit {
            return Ok(());
        }
        level.validate(&self.tuning)?;
        self.viewport = glam::Vec2::new(level.width, level.height);
        self.spawn = level.spawn;
        self.platforms = level.platforms;
        self.moving_platforms = level.moving_platforms;
        self.spikes = level.spikes;
        self.saws = level.saws;
        self.begin_session();
        log::info!("Level regenerated");
        Ok(())
    }

    /// Stop for good; no further stepping
    pub fn quit(&mut self) {
        if self.phase != SimPhase::Quit {
            self.phase = SimPhase::Quit;
            log::info!("Quit after {} deaths", self.death_count);
        }
    }

    /// Session time of the current (or just ended) session, in seconds
    pub fn survival_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }

    pub(crate) fn die(&mut self, cause: DeathCause) {
        self.death_count += 1;
        self.phase = SimPhase::Dead;
        self.events.push(SimEvent::Died { cause });
        log::debug!(
            "Died ({:?}) at {:?} after {:.0} ms, death #{}",
            cause,
            self.player.pos,
            self.elapsed_ms,
            self.death_count
        );
    }

    fn begin_session(&mut self) {
        self.player.reset(self.spawn);
        self.elapsed_ms = 0.0;
        self.difficulty = 1.0;
        self.frame = 0;
        self.events.clear();
        self.last_frame_ms = None;
        self.phase = SimPhase::Running;
    }
}
