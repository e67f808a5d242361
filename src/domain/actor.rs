/// Actors: the two duelists.
///
/// Position and pose are written by the choreography; the renderer only
/// reads them. The one piece of per-actor physics the core owns is the cape
/// tail, a damped follower integrated every step.

use super::geom::Vec2;
use super::pose::{Faction, PoseId};

/// Longest blade, in pose blade-direction units.
pub const MAX_BLADE: u8 = 3;

/// Cape tail follow rate, 1/s.
const CAPE_DAMPING: f32 = 8.0;
/// How strongly velocity drags the cape behind the body.
const CAPE_DRAG: f32 = 0.15;

#[derive(Clone, Debug)]
pub struct Actor {
    pub faction: Faction,
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub pose: PoseId,
    pub prev_pose: PoseId,
    pub facing_right: bool,
    pub saber_active: bool,
    /// Ignition progress 0..=MAX_BLADE.
    pub saber_length: u8,
    pub cape_tail: Vec2,
}

impl Actor {
    pub fn new(faction: Faction, pos: Vec2, facing_right: bool) -> Self {
        let behind = if facing_right { -2.0 } else { 2.0 };
        Actor {
            faction,
            pos,
            prev_pos: pos,
            pose: PoseId::Idle,
            prev_pose: PoseId::Idle,
            facing_right,
            saber_active: false,
            saber_length: 0,
            cape_tail: Vec2::new(pos.x + behind, pos.y),
        }
    }

    /// +1 when facing right, -1 when facing left.
    pub fn dir(&self) -> i32 {
        if self.facing_right { 1 } else { -1 }
    }

    /// Snapshot position and pose. Must run once per step, before any
    /// choreography mutation, so trails compare against the true prior frame.
    pub fn save_state(&mut self) {
        self.prev_pos = self.pos;
        self.prev_pose = self.pose;
    }

    pub fn set_saber(&mut self, active: bool, length: u8) {
        self.saber_active = active;
        self.saber_length = length.min(MAX_BLADE);
    }

    /// Velocity over the last step, world units per second.
    pub fn velocity(&self, dt: f32) -> Vec2 {
        if dt <= 0.0 {
            return Vec2::default();
        }
        Vec2::new((self.pos.x - self.prev_pos.x) / dt, (self.pos.y - self.prev_pos.y) / dt)
    }

    /// Where the cape wants to hang this step.
    pub fn cape_target(&self, dt: f32) -> Vec2 {
        let dir = self.dir() as f32;
        let vel = self.velocity(dt);

        // Shoulder anchor: one unit behind, three up.
        let anchor = Vec2::new(self.pos.x - dir, self.pos.y - 3.0);

        // At rest it hangs further behind and below the shoulder.
        let mut target = Vec2::new(anchor.x - 1.5 * dir, anchor.y + 4.0);

        target.x -= vel.x * CAPE_DRAG;
        target.y -= vel.y * CAPE_DRAG;

        if self.pose == PoseId::Cast {
            // Blown back by the actor's own power.
            target.x -= 4.0 * dir;
            target.y -= 2.0;
        } else if vel.y < -5.0 {
            target.y += 1.0;
        }
        target
    }

    /// Exponentially approach the cape target.
    pub fn update_cape(&mut self, dt: f32) {
        let target = self.cape_target(dt);
        let k = (CAPE_DAMPING * dt).min(1.0);
        self.cape_tail.x += (target.x - self.cape_tail.x) * k;
        self.cape_tail.y += (target.y - self.cape_tail.y) * k;
    }
}
