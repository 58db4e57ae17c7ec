//! Simulation core
//!
//! All gameplay logic lives here. No rendering, input-device or platform
//! dependencies; the host feeds [`TickInput`] and timestamps and reads back a
//! [`Snapshot`].
//!
//! Per frame: input, integration, collisions (platforms, moving platforms,
//! spikes, saw blades, bounds), difficulty.

pub mod collision;
pub mod difficulty;
pub mod lifecycle;
pub mod state;
pub mod tick;

pub use collision::{Obstacle, Outcome, aabb_overlap, approach_side, saw_hits};
pub use state::{
    DeathCause, Direction, MovingPlatform, Platform, Player, Rect, SawBlade, SawPatrol, SimEvent,
    SimPhase, SimulationState, Snapshot, Spike,
};
pub use tick::{TickInput, step, tick};
