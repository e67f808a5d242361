/// Ballistic wall debris.
///
/// Chunks are launched from the breached wall with a velocity solved so the
/// parabola passes through a target point after a chosen flight time. Each
/// chunk ends exactly once: deflected by a saber or landing on the floor.

use super::actor::Actor;
use super::geom::{Vec2, FLOOR_Y, LOGIC_WIDTH};

/// Downward acceleration, world units / s².
pub const GRAVITY: f32 = 10.0;

/// Glyphs a chunk may be drawn with.
pub const DEBRIS_GLYPHS: [char; 7] = ['▞', '▟', '▙', '▀', '▄', '■', '●'];

// Deflection box relative to the defender's anchor.
const HIT_MIN_DX: f32 = -1.0;
const HIT_MAX_DX: f32 = 7.0;
const HIT_MAX_DY: f32 = 6.0;

/// World units past an edge before a chunk counts as gone.
const OFF_SCREEN_MARGIN: f32 = 10.0;

#[derive(Clone, Debug)]
pub struct Debris {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    pub glyph: char,
}

/// What happened to a chunk during one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DebrisOutcome {
    Flying,
    Deflected,
    Landed,
}

impl Debris {
    /// Launch from `from` so that the chunk reaches `target` after `flight_time` seconds.
    pub fn aimed(from: Vec2, target: Vec2, flight_time: f32, glyph: char) -> Self {
        Debris {
            pos: from,
            vel: solve_launch(from, target, flight_time),
            active: true,
            glyph,
        }
    }

    /// Integrate one step and resolve collisions. Inactive chunks never move.
    pub fn step(&mut self, dt: f32, defender: &Actor) -> DebrisOutcome {
        if !self.active {
            return DebrisOutcome::Flying;
        }

        self.pos.x += self.vel.x * dt;
        self.pos.y += self.vel.y * dt;
        self.vel.y += GRAVITY * dt;

        if defender.pose.is_attack() && in_hitbox(self.pos, defender) {
            self.active = false;
            return DebrisOutcome::Deflected;
        }

        if self.pos.y > FLOOR_Y {
            self.active = false;
            self.pos.y = FLOOR_Y + 1.0;
            return DebrisOutcome::Landed;
        }

        DebrisOutcome::Flying
    }

    /// Far enough past either screen edge to forget.
    ///
    /// Inactive chunks never move, so a chunk that landed on stage stays
    /// on stage for good. At the head of the queue it stops pruning there,
    /// which is expected and bounded by the number of chunks launched.
    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -OFF_SCREEN_MARGIN || self.pos.x > LOGIC_WIDTH + OFF_SCREEN_MARGIN
    }
}

/// Initial velocity for a ballistic arc from `from` through `target` in `t` seconds.
/// `vy` accounts for gravity pulling the chunk down (+y) over the flight.
pub fn solve_launch(from: Vec2, target: Vec2, t: f32) -> Vec2 {
    let t = t.max(f32::EPSILON);
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    Vec2::new(dx / t, (dy - 0.5 * GRAVITY * t * t) / t)
}

fn in_hitbox(pos: Vec2, defender: &Actor) -> bool {
    let dx = pos.x - defender.pos.x;
    let dy = pos.y - defender.pos.y;
    dx > HIT_MIN_DX && dx < HIT_MAX_DX && dy.abs() < HIT_MAX_DY
}
