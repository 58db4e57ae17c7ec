//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::sim::{Rect, SawBlade, SimPhase, Snapshot};

/// Segments used for saw discs
const SAW_SEGMENTS: u32 = 24;
const SAW_TEETH: u32 = 8;
/// How far teeth stick out past the disc
const TOOTH_LENGTH: f32 = 10.0;
/// Half-angle of a tooth's base (radians)
const TOOTH_HALF_WIDTH: f32 = 0.12;

/// Two triangles covering `rect`
pub fn rect(r: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Upward spike filling the bottom of its bounding box
pub fn spike(r: &Rect, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(r.x, r.bottom(), color),
        Vertex::new(r.x + r.w / 2.0, r.y, color),
        Vertex::new(r.right(), r.bottom(), color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Disc plus teeth, rotated by the blade's spin angle (degrees)
pub fn saw(blade: &SawBlade) -> Vec<Vertex> {
    let mut vertices = circle(blade.center, blade.radius, colors::SAW, SAW_SEGMENTS);
    vertices.reserve((SAW_TEETH * 3) as usize);

    let spin = blade.angle.to_radians();
    let at = |theta: f32, r: f32| blade.center + Vec2::new(theta.cos(), theta.sin()) * r;
    for i in 0..SAW_TEETH {
        let theta = spin + (i as f32 / SAW_TEETH as f32) * TAU;
        let left = at(theta - TOOTH_HALF_WIDTH, blade.radius);
        let tip = at(theta, blade.radius + TOOTH_LENGTH);
        let right = at(theta + TOOTH_HALF_WIDTH, blade.radius);
        vertices.push(Vertex::new(left.x, left.y, colors::SAW_TEETH));
        vertices.push(Vertex::new(tip.x, tip.y, colors::SAW_TEETH));
        vertices.push(Vertex::new(right.x, right.y, colors::SAW_TEETH));
    }

    vertices
}

/// Triangle list for a whole frame, back to front
pub fn build_frame(snapshot: &Snapshot<'_>) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(
        6 * (2 + snapshot.platforms.len() + snapshot.moving_platforms.len())
            + 3 * snapshot.spikes.len()
            + ((SAW_SEGMENTS + SAW_TEETH) * 3) as usize * snapshot.saws.len(),
    );

    let viewport = Rect::new(0.0, 0.0, snapshot.viewport.x, snapshot.viewport.y);
    out.extend(rect(&viewport, colors::BACKGROUND));

    for p in snapshot.platforms {
        out.extend(rect(&p.rect, colors::PLATFORM));
    }
    for p in snapshot.moving_platforms {
        out.extend(rect(&p.rect, colors::MOVING_PLATFORM));
    }
    for s in snapshot.spikes {
        out.extend(spike(&s.rect, colors::SPIKE));
    }
    for s in snapshot.saws {
        out.extend(saw(s));
    }

    let player_color = if snapshot.phase == SimPhase::Dead {
        colors::PLAYER_DEAD
    } else {
        colors::PLAYER
    };
    out.extend(rect(&snapshot.player.rect(), player_color));

    out
}
