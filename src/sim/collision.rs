//! Collision detection and response
//!
//! Rectangles use a plain AABB overlap test. The side a rectangle was hit from
//! is inferred from where the player was before this frame's integration step
//! (`pos - vel`), which is cheap but can tunnel through thin platforms at high
//! speed. Saw blades treat the player as a point at its centre.

use super::state::{MovingPlatform, Platform, Player, Rect, SawBlade, Spike};

/// True iff the two boxes intersect. Touching edges do not count.
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Which face of an obstacle the player came through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Classify the approach direction from the pre-step position.
///
/// Checked in priority order top, bottom, left, right; vertical wins when
/// both axes match.
pub fn approach_side(player: &Player, rect: &Rect) -> Option<Side> {
    let prev = player.prev_pos();
    let vel = player.vel;

    if vel.y > 0.0 && prev.y + player.size.y <= rect.y {
        Some(Side::Top)
    } else if vel.y < 0.0 && prev.y >= rect.bottom() {
        Some(Side::Bottom)
    } else if vel.x > 0.0 && prev.x + player.size.x <= rect.x {
        Some(Side::Left)
    } else if vel.x < 0.0 && prev.x >= rect.right() {
        Some(Side::Right)
    } else {
        None
    }
}

/// Effect of one obstacle on the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// No contact
    Clear,
    /// Overlap with no resolvable side; nothing changed
    Touch,
    /// Pushed out sideways or from below
    Block,
    /// Landed on top
    Land,
    /// Landed on top and moved along by `dx`
    Carry { dx: f32 },
    Kill,
}

impl Outcome {
    #[inline]
    pub fn is_kill(self) -> bool {
        self == Outcome::Kill
    }

    #[inline]
    pub fn is_landing(self) -> bool {
        matches!(self, Outcome::Land | Outcome::Carry { .. })
    }
}

/// Shared resolution capability for every obstacle kind
pub trait Obstacle {
    /// Detect contact with the player and apply the response in place
    fn resolve(&self, player: &mut Player) -> Outcome;
}

fn land_on(player: &mut Player, top: f32) {
    player.pos.y = top - player.size.y;
    player.vel.y = 0.0;
    player.jumping = false;
    player.grounded = true;
}

impl Obstacle for Platform {
    fn resolve(&self, player: &mut Player) -> Outcome {
        let rect = &self.rect;
        if !aabb_overlap(&player.rect(), rect) {
            return Outcome::Clear;
        }
        match approach_side(player, rect) {
            Some(Side::Top) => {
                land_on(player, rect.y);
                Outcome::Land
            }
            Some(Side::Bottom) => {
                player.pos.y = rect.bottom();
                player.vel.y = 0.0;
                Outcome::Block
            }
            Some(Side::Left) => {
                player.pos.x = rect.x - player.size.x;
                player.vel.x = 0.0;
                Outcome::Block
            }
            Some(Side::Right) => {
                player.pos.x = rect.right();
                player.vel.x = 0.0;
                Outcome::Block
            }
            None => Outcome::Touch,
        }
    }
}

/// Only the top of a moving platform is safe. Must run after
/// [`MovingPlatform::advance`] so `last_dx` is this frame's displacement.
impl Obstacle for MovingPlatform {
    fn resolve(&self, player: &mut Player) -> Outcome {
        let rect = &self.rect;
        if !aabb_overlap(&player.rect(), rect) {
            return Outcome::Clear;
        }
        if approach_side(player, rect) == Some(Side::Top) {
            land_on(player, rect.y);
            player.pos.x += self.last_dx;
            Outcome::Carry { dx: self.last_dx }
        } else {
            Outcome::Kill
        }
    }
}

impl Obstacle for Spike {
    fn resolve(&self, player: &mut Player) -> Outcome {
        if aabb_overlap(&player.rect(), &self.rect) {
            Outcome::Kill
        } else {
            Outcome::Clear
        }
    }
}

impl Obstacle for SawBlade {
    fn resolve(&self, player: &mut Player) -> Outcome {
        if saw_hits(self, player) {
            Outcome::Kill
        } else {
            Outcome::Clear
        }
    }
}

/// Player centre strictly inside the blade's circle
#[inline]
pub fn saw_hits(saw: &SawBlade, player: &Player) -> bool {
    player.center().distance(saw.center) < saw.radius
}

/// Where the player left the playable area, if it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Below,
    Above,
}

/// Below the bottom edge, or above the top kill line
pub fn boundary_check(player: &Player, height: f32, top_kill_line: f32) -> Option<Boundary> {
    if player.pos.y > height {
        Some(Boundary::Below)
    } else if player.pos.y < top_kill_line {
        Some(Boundary::Above)
    } else {
        None
    }
}
