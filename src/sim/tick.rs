//! Per-frame simulation step
//!
//! One call advances exactly one rendered frame. Movement is per frame, not
//! per second; only the session clock (and so the difficulty ramp) looks at
//! elapsed time.

use super::collision::{Boundary, Obstacle, Outcome, boundary_check};
use super::difficulty;
use super::state::{DeathCause, Player, SimEvent, SimulationState};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// -1 left, 0 idle, +1 right (other values are reduced to their sign)
    pub horizontal: i8,
    /// Jump pressed since the last frame
    pub jump: bool,
}

/// Real-time entry point, driven by the host's display refresh.
///
/// `now_ms` is the host timestamp. The first frame after start, resume or
/// restart contributes no elapsed time.
pub fn tick(state: &mut SimulationState, input: &TickInput, now_ms: f64) {
    if !state.is_running() {
        return;
    }
    let dt_ms = match state.last_frame_ms {
        Some(last) => (now_ms - last).max(0.0),
        None => 0.0,
    };
    state.last_frame_ms = Some(now_ms);
    step(state, input, dt_ms);
}

/// Fixed-timestep entry point: advance one frame and `dt_ms` of session time
pub fn step(state: &mut SimulationState, input: &TickInput, dt_ms: f64) {
    if !state.is_running() {
        return;
    }
    state.events.clear();
    state.frame += 1;
    state.elapsed_ms += dt_ms.max(0.0);

    if apply_input(&mut state.player, input) {
        state.events.push(SimEvent::Jumped);
    }
    integrate(&mut state.player);

    if let Some(cause) = resolve_collisions(state) {
        state.die(cause);
        return;
    }

    let multiplier = difficulty::multiplier(state.elapsed_ms, state.tuning.difficulty_ramp_ms);
    difficulty::apply(
        multiplier,
        &mut state.moving_platforms,
        state.tuning.platform_speed_cap,
        &mut state.saws,
        state.tuning.saw_speed_cap,
    );
    state.difficulty = multiplier;
}

/// Set horizontal velocity from intent, jump if grounded. Returns true on jump.
pub fn apply_input(player: &mut Player, input: &TickInput) -> bool {
    player.vel.x = input.horizontal.signum() as f32 * player.speed;
    if input.jump && player.grounded {
        player.vel.y = -player.jump_impulse;
        player.jumping = true;
        player.grounded = false;
        return true;
    }
    false
}

/// Explicit Euler, one step per frame
#[inline]
pub fn integrate(player: &mut Player) {
    player.vel.y += player.gravity;
    player.pos += player.vel;
}

/// Resolve against every obstacle kind in order. Obstacles keep moving for
/// the whole frame; the first lethal contact wins.
fn resolve_collisions(state: &mut SimulationState) -> Option<DeathCause> {
    let player = &mut state.player;
    let was_grounded = player.grounded;
    player.grounded = false;
    let mut landed = false;
    let mut death = None;

    for platform in &state.platforms {
        landed |= platform.resolve(player).is_landing();
    }

    for platform in &mut state.moving_platforms {
        platform.advance();
        if death.is_some() {
            continue;
        }
        match platform.resolve(player) {
            Outcome::Kill => death = Some(DeathCause::MovingPlatform),
            outcome => landed |= outcome.is_landing(),
        }
    }

    for saw in &mut state.saws {
        saw.advance();
    }

    if death.is_none() && state.spikes.iter().any(|s| s.resolve(player).is_kill()) {
        death = Some(DeathCause::Spike);
    }
    if death.is_none() && state.saws.iter().any(|s| s.resolve(player).is_kill()) {
        death = Some(DeathCause::SawBlade);
    }
    if death.is_none() {
        death = match boundary_check(player, state.viewport.y, state.tuning.top_kill_line) {
            Some(Boundary::Below) => Some(DeathCause::FellOut),
            Some(Boundary::Above) => Some(DeathCause::ReachedTop),
            None => None,
        };
    }

    if landed && !was_grounded && death.is_none() {
        state.events.push(SimEvent::Landed);
    }
    death
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::level::Level;
    use crate::sim::state::{Direction, MovingPlatform, Platform, Rect, SawBlade, SimPhase, Spike};
    use crate::tuning::Tuning;
    use glam::Vec2;

    /// 800x600 room with a floor under the spawn and nothing else
    fn empty_level() -> Level {
        Level {
            width: 800.0,
            height: 600.0,
            spawn: Vec2::new(385.0, 500.0),
            platforms: vec![Platform {
                rect: Rect::new(0.0, 550.0, 800.0, 50.0),
            }],
            moving_platforms: Vec::new(),
            spikes: Vec::new(),
            saws: Vec::new(),
        }
    }

    fn running(level: Level) -> SimulationState {
        let mut state = SimulationState::new(level, Tuning::default()).unwrap();
        state.start();
        state
    }

    #[test]
    fn test_gravity_and_velocity_integration() {
        let mut player = crate::sim::Player::new(Vec2::new(10.0, 10.0), &Tuning::default());
        player.vel = Vec2::new(2.0, 1.0);
        integrate(&mut player);
        assert_eq!(player.vel, Vec2::new(2.0, 1.5));
        assert_eq!(player.pos, Vec2::new(12.0, 11.5));
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut state = running(empty_level());
        for _ in 0..120 {
            step(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state.phase, SimPhase::Running);
        assert!(state.player.grounded);
        assert_eq!(state.player.pos.y + state.player.size.y, 550.0);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut state = running(empty_level());
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        // Airborne at spawn: request ignored
        step(&mut state, &jump, FRAME_MS);
        assert!(!state.events.contains(&SimEvent::Jumped));

        for _ in 0..120 {
            step(&mut state, &TickInput::default(), FRAME_MS);
        }
        step(&mut state, &jump, FRAME_MS);
        assert!(state.events.contains(&SimEvent::Jumped));
        assert!(state.player.jumping);
        assert!(!state.player.grounded);
        // -12 impulse then +0.5 gravity
        assert_eq!(state.player.vel.y, -11.5);
    }

    #[test]
    fn test_horizontal_intent_sets_velocity() {
        let mut state = running(empty_level());
        let right = TickInput {
            horizontal: 1,
            jump: false,
        };
        let x0 = state.player.pos.x;
        step(&mut state, &right, FRAME_MS);
        assert_eq!(state.player.pos.x, x0 + 5.0);

        let left = TickInput {
            horizontal: -100,
            jump: false,
        };
        step(&mut state, &left, FRAME_MS);
        assert_eq!(state.player.pos.x, x0);
    }

    #[test]
    fn test_spike_overlap_kills_once() {
        let mut level = empty_level();
        // Just under the spawn box; the first half-unit of fall reaches both
        level.spikes.push(Spike {
            rect: Rect::new(390.0, 530.25, 20.0, 20.0),
        });
        level.spikes.push(Spike {
            rect: Rect::new(380.0, 530.25, 20.0, 20.0),
        });
        let mut state = running(level);
        step(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, SimPhase::Dead);
        assert_eq!(state.death_count, 1);
        assert_eq!(
            state.events,
            vec![SimEvent::Died {
                cause: DeathCause::Spike
            }]
        );

        // Dead state does not step
        let frame = state.frame;
        step(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.frame, frame);
        assert_eq!(state.death_count, 1);
    }

    #[test]
    fn test_reaching_the_top_kills() {
        let mut state = running(empty_level());
        state.player.pos.y = 0.0;
        step(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, SimPhase::Dead);
        assert_eq!(
            state.events.last(),
            Some(&SimEvent::Died {
                cause: DeathCause::ReachedTop
            })
        );
    }

    #[test]
    fn test_falling_out_kills() {
        let mut level = empty_level();
        level.platforms.clear();
        let mut state = running(level);
        let mut frames = 0;
        while state.is_running() && frames < 1000 {
            step(&mut state, &TickInput::default(), FRAME_MS);
            frames += 1;
        }
        assert_eq!(state.phase, SimPhase::Dead);
        assert!(state.player.pos.y > 600.0);
        assert_eq!(
            state.events.last(),
            Some(&SimEvent::Died {
                cause: DeathCause::FellOut
            })
        );
    }

    #[test]
    fn test_saw_kills_when_centre_inside() {
        let mut level = empty_level();
        // Player centre goes from (400, 515) to (400, 515.5)
        level.saws.push(SawBlade {
            center: Vec2::new(400.0, 525.25),
            radius: 10.0,
            speed: 2.0,
            angle: 0.0,
            patrol: None,
        });
        let mut state = running(level);
        step(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(
            state.events.last(),
            Some(&SimEvent::Died {
                cause: DeathCause::SawBlade
            })
        );
    }

    #[test]
    fn test_riding_a_moving_platform() {
        let mut level = empty_level();
        level.moving_platforms.push(MovingPlatform {
            rect: Rect::new(360.0, 531.0, 80.0, 10.0),
            speed: 2.0,
            direction: Direction::Right,
            min_x: 0.0,
            max_x: 800.0,
            last_dx: 0.0,
        });
        let mut state = SimulationState::new(level, Tuning::default()).unwrap();
        state.player.pos.y = 500.0;
        state.start();

        for _ in 0..40 {
            step(&mut state, &TickInput::default(), 0.0);
        }
        assert_eq!(state.phase, SimPhase::Running);
        assert!(state.player.grounded);
        let platform_x = state.moving_platforms[0].rect.x;
        let offset = state.player.pos.x - platform_x;
        step(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.player.pos.x - state.moving_platforms[0].rect.x, offset);
    }

    #[test]
    fn test_difficulty_scales_moving_speeds() {
        let mut level = empty_level();
        level.saws.push(SawBlade {
            center: Vec2::new(50.0, 100.0),
            radius: 10.0,
            speed: 4.0,
            angle: 0.0,
            patrol: None,
        });
        let mut state = running(level);
        step(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.difficulty, 1.0);
        assert_eq!(state.saws[0].speed, 4.0);

        // Jump a full ramp period in one frame
        step(&mut state, &TickInput::default(), 60_000.0);
        assert_eq!(state.difficulty, 2.0);
        assert_eq!(state.saws[0].speed, 8.0);
        step(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.saws[0].speed, 16.0);
        step(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.saws[0].speed, 20.0);
    }

    #[test]
    fn test_death_frame_skips_difficulty_update() {
        let mut level = empty_level();
        level.saws.push(SawBlade {
            center: Vec2::new(50.0, 100.0),
            radius: 10.0,
            speed: 4.0,
            angle: 0.0,
            patrol: None,
        });
        let mut state = running(level);
        state.player.pos.y = 0.0;
        step(&mut state, &TickInput::default(), 60_000.0);
        assert_eq!(state.phase, SimPhase::Dead);
        // Obstacles still moved this frame, but speeds did not compound
        assert_eq!(state.saws[0].angle, 4.0);
        assert_eq!(state.saws[0].speed, 4.0);
        assert_eq!(state.difficulty, 1.0);

        state.restart();
        step(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.saws[0].speed, 4.0);
    }

    #[test]
    fn test_realtime_tick_measures_host_clock() {
        let mut state = running(empty_level());
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.elapsed_ms, 0.0);
        tick(&mut state, &TickInput::default(), 1016.0);
        tick(&mut state, &TickInput::default(), 1050.0);
        assert_eq!(state.elapsed_ms, 50.0);
        assert_eq!(state.frame, 3);
    }
}
