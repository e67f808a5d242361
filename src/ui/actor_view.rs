/// Actor rendering: pose projection, blade, cape, trails and shadows.
///
/// One pipeline handles every variant. `RenderMode` picks the source
/// state (current or previous frame) and whether the figure is mirrored
/// about the floor; the camera decides foreshortening and whether the
/// overhead silhouette replaces full articulation.

use crate::domain::actor::Actor;
use crate::domain::geom::Vec2;
use crate::domain::pose::{lookup, BodyPart, Faction, Pose, PoseId};

use super::camera::CameraTransform;
use super::frame::FrameBuffer;
use super::palette::Tone;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Normal,
    /// Mirrored below the floor line, dimmed.
    Reflection,
    /// Previous frame's position and pose, dimmed.
    MotionBlur,
}

pub fn faction_tone(faction: Faction) -> Tone {
    match faction {
        Faction::Light => Tone::Blue,
        Faction::Dark => Tone::Red,
    }
}

/// Swap direction-sensitive glyphs for an upside-down copy.
pub fn mirror_glyph(c: char) -> char {
    match c {
        '╱' => '╲',
        '╲' => '╱',
        '▄' => '▀',
        '▀' => '▄',
        other => other,
    }
}

/// Overhead replacement for a limb or torso glyph.
fn top_down_glyph(c: char) -> char {
    match c {
        '▓' | '▒' | '█' | '▄' | '▀' => '|',
        '╱' | '╲' => '-',
        other => other,
    }
}

/// Line glyph for a blade spanning (dx, dy) cells.
pub fn blade_glyph(dx: i32, dy: i32) -> char {
    if dx == 0 {
        return '|';
    }
    let slope = dy as f32 / dx as f32;
    if slope.abs() > 2.0 {
        '|'
    } else if slope.abs() < 0.5 {
        '-'
    } else if slope > 0.0 {
        '╲'
    } else {
        '╱'
    }
}

// ── Projection ──

/// Places pose parts relative to a projected anchor.
#[derive(Clone, Copy, Debug)]
pub struct Projector<'a> {
    cam: &'a CameraTransform,
    pub anchor: (i32, i32),
    dir: i32,
    reflect: bool,
}

impl<'a> Projector<'a> {
    pub fn new(cam: &'a CameraTransform, anchor: (i32, i32), dir: i32, reflect: bool) -> Self {
        Projector { cam, anchor, dir, reflect }
    }

    /// Screen cell of `part` at depth -1 (back), 0 (center) or +1 (front).
    pub fn place(&self, part: &BodyPart, depth: i32) -> (i32, i32) {
        let dy = (part.dy as f32 * self.cam.height_scale()) as i32;
        let z = (depth as f32 * self.cam.z_factor()) as i32;
        let dx = self.cam.scale_offset(part.dx);
        let (x, y) = self.anchor;
        let y = if self.reflect { y - (dy + z) } else { y + dy + z };
        (x + dx * self.dir, y)
    }

    /// Hand and tip cells of a blade of `length` units.
    pub fn blade(&self, pose: &Pose, length: u8) -> ((i32, i32), (i32, i32)) {
        let len = length as i32;
        let (hx, hy) = self.place(&pose.hand, 1);
        let bdy = if self.reflect { -pose.blade.dy } else { pose.blade.dy };
        let bdy = (bdy as f32 * self.cam.height_scale()) as i32;
        let tip_x = hx + self.cam.scale_offset(pose.blade.dx * len) * self.dir;

        if self.cam.is_top_down() {
            // Overhead, screen y is forward/back: the blade leaves from in
            // front of the body and extends along its blade direction sign.
            let forward = if pose.blade.dy < 0 { -1 } else { 1 };
            let reach = (length as f32 * self.cam.scale_y * 0.3) as i32;
            let (x, y) = self.anchor;
            return ((x + 2 * self.dir, y), (tip_x, y + forward * reach));
        }

        ((hx, hy), (tip_x, hy + bdy * len))
    }
}

// ── Actor ──

/// Draw `actor` and return its blade tip when the saber is lit.
pub fn draw_actor(
    fb: &mut FrameBuffer,
    actor: &Actor,
    cam: &CameraTransform,
    mode: RenderMode,
) -> Option<(i32, i32)> {
    let (pos, pose_id) = match mode {
        RenderMode::MotionBlur => (actor.prev_pos, actor.prev_pose),
        _ => (actor.pos, actor.pose),
    };
    let reflect = mode == RenderMode::Reflection;
    let top_down = cam.is_top_down();

    let (x, mut y) = cam.to_screen(pos);
    if reflect {
        let floor = cam.floor_row();
        y = floor + (floor - y);
        if y >= fb.height() as i32 {
            return None;
        }
    }

    let dir = actor.dir();
    let (body_tone, saber_tone) = match mode {
        RenderMode::Normal => (Tone::White, faction_tone(actor.faction)),
        _ => (Tone::Dim, Tone::Dim),
    };
    let pose = lookup(pose_id, actor.faction);
    let proj = Projector::new(cam, (x, y), dir, reflect);

    if actor.faction == Faction::Dark && pose_id != PoseId::Kneel && mode != RenderMode::MotionBlur {
        if top_down {
            draw_cape_top_down(fb, cam, (x, y), dir);
        } else {
            draw_cape(fb, actor, cam, (x, y), dir, reflect);
        }
    }

    if top_down {
        fb.draw(x, y, '●', body_tone);
        fb.draw(x - 1, y, '(', body_tone);
        fb.draw(x + 1, y, ')', body_tone);
        fb.draw(x + dir, y, if dir == 1 { '›' } else { '‹' }, body_tone);
    }

    let part = |fb: &mut FrameBuffer, p: &BodyPart, depth: i32, is_head: bool| {
        if p.is_hidden() {
            return;
        }
        let (px, py) = proj.place(p, depth);
        let mut c = p.glyph;
        if top_down {
            c = if is_head { '●' } else { top_down_glyph(c) };
        }
        if reflect {
            c = mirror_glyph(c);
        }
        fb.draw(px, py, c, body_tone);
    };

    // Back to front. The lock pose hides the front arm behind the crossed blades.
    let front_arm = pose_id != PoseId::Lock;
    if top_down {
        part(fb, &pose.arm_l, -1, false);
        part(fb, &pose.torso_top, 0, false);
        if front_arm {
            part(fb, &pose.arm_r, 1, false);
        }
    } else {
        part(fb, &pose.leg_l, -1, false);
        part(fb, &pose.leg_r, 1, false);
        part(fb, &pose.torso_bottom, 0, false);
        part(fb, &pose.torso_top, 0, false);
        part(fb, &pose.arm_l, -1, false);
        if front_arm {
            part(fb, &pose.arm_r, 1, false);
        }
    }
    part(fb, &pose.head, 0, true);

    if !actor.saber_active {
        return None;
    }
    let ((hx, hy), (tx, ty)) = proj.blade(pose, actor.saber_length);
    fb.draw_line(hx, hy, tx, ty, blade_glyph(tx - hx, ty - hy), saber_tone);
    Some((tx, ty))
}

/// Faint arc between last frame's blade and this frame's.
pub fn draw_saber_trail(fb: &mut FrameBuffer, actor: &Actor, cam: &CameraTransform) {
    if !actor.saber_active {
        return;
    }
    let dir = actor.dir();
    let blade_at = |pos: Vec2, pose_id: PoseId| {
        let proj = Projector::new(cam, cam.to_screen(pos), dir, false);
        proj.blade(lookup(pose_id, actor.faction), actor.saber_length)
    };
    let (prev_hand, prev_tip) = blade_at(actor.prev_pos, actor.prev_pose);
    let (hand, tip) = blade_at(actor.pos, actor.pose);

    let dx = tip.0 - prev_tip.0;
    let dy = tip.1 - prev_tip.1;
    if dx * dx + dy * dy <= 4 {
        return;
    }
    let tone = faction_tone(actor.faction);
    fb.draw_line(prev_tip.0, prev_tip.1, tip.0, tip.1, '░', tone);
    fb.draw_line(
        (prev_hand.0 + prev_tip.0) / 2,
        (prev_hand.1 + prev_tip.1) / 2,
        (hand.0 + tip.0) / 2,
        (hand.1 + tip.1) / 2,
        '▒',
        tone,
    );
}

// ── Cape ──

const CAPE_SAMPLES: i32 = 10;

fn draw_cape(
    fb: &mut FrameBuffer,
    actor: &Actor,
    cam: &CameraTransform,
    anchor: (i32, i32),
    dir: i32,
    reflect: bool,
) {
    let h = cam.height_scale();
    let flip = |d: i32| if reflect { -d } else { d };
    let (ax, ay) = anchor;

    let shoulder_dy = (-3.0 * h) as i32;
    let start = (ax - dir, ay + flip(shoulder_dy));

    let tail_dx = ((actor.cape_tail.x - actor.pos.x) * cam.scale_x) as i32;
    let tail_dy = ((actor.cape_tail.y - actor.pos.y) * cam.scale_y * h) as i32;
    let tail = (ax + tail_dx, ay + flip(tail_dy));

    let sag = (cam.scale_y * h) as i32;
    let mid = ((start.0 + tail.0) / 2, (start.1 + tail.1) / 2 + flip(sag));

    let tone = if reflect { Tone::Dim } else { Tone::Red };
    let (sx, sy) = (start.0 as f32, start.1 as f32);

    for i in 0..=CAPE_SAMPLES {
        let t = i as f32 / CAPE_SAMPLES as f32;
        let inv = 1.0 - t;
        let lx = inv * inv * sx + 2.0 * inv * t * mid.0 as f32 + t * t * tail.0 as f32;
        let ly = inv * inv * sy + 2.0 * inv * t * mid.1 as f32 + t * t * tail.1 as f32;
        let (cx, cy) = (lx as i32, ly as i32);
        if reflect && cy >= fb.height() as i32 {
            continue;
        }

        let mut c = if t < 0.3 {
            '}'
        } else if t < 0.6 {
            ')'
        } else {
            '›'
        };
        let slope = (ly - sy) / (lx - sx + 0.001);
        if slope.abs() > 1.5 {
            c = '│';
        } else if slope > 0.5 {
            c = '╲';
        } else if slope < -0.5 {
            c = '╱';
        }

        fb.draw(cx, cy, c, tone);
        fb.draw(cx, cy + 1, ':', tone);
    }
}

fn draw_cape_top_down(fb: &mut FrameBuffer, cam: &CameraTransform, anchor: (i32, i32), dir: i32) {
    let back = cam.scale_offset(2).abs().max(1);
    let (x, y) = anchor;
    let bx = x - dir * back;
    fb.draw(bx, y, '=', Tone::Red);
    fb.draw(bx + dir, y, '-', Tone::Red);
    fb.draw(bx, y - 1, if dir == 1 { '╱' } else { '╲' }, Tone::Red);
    fb.draw(bx, y + 1, if dir == 1 { '╲' } else { '╱' }, Tone::Red);
}

// ── Shadows ──

/// Ground shadow under `actor`, visible only at mid pitch.
pub fn draw_shadow(fb: &mut FrameBuffer, actor: &Actor, cam: &CameraTransform) {
    if cam.pitch <= 0.3 || cam.pitch > 1.1 {
        return;
    }
    let (x, _) = cam.to_screen(actor.pos);
    let fy = cam.floor_row();
    fb.draw(x - 1, fy, '(', Tone::Shadow);
    fb.draw(x, fy, '●', Tone::Shadow);
    fb.draw(x + 1, fy, ')', Tone::Shadow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn side_cam() -> CameraTransform {
        CameraTransform::new(80, 25, Vec2::new(40.0, 12.5), 1.0, 0.0, (0, 0))
    }

    fn overhead_cam() -> CameraTransform {
        CameraTransform::new(80, 25, Vec2::new(40.0, 12.0), 1.0, FRAC_PI_2, (0, 0))
    }

    fn glyph(fb: &FrameBuffer, x: i32, y: i32) -> char {
        fb.get(x, y).map(|c| c.glyph).unwrap_or('?')
    }

    fn count(fb: &FrameBuffer, c: char) -> usize {
        let mut n = 0;
        for y in 0..fb.height() as i32 {
            for x in 0..fb.width() as i32 {
                if glyph(fb, x, y) == c {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn blade_glyph_by_slope() {
        assert_eq!(blade_glyph(0, 5), '|');
        assert_eq!(blade_glyph(1, 4), '|');
        assert_eq!(blade_glyph(4, 1), '-');
        assert_eq!(blade_glyph(3, -3), '╱');
        assert_eq!(blade_glyph(3, 3), '╲');
        assert_eq!(blade_glyph(-3, 3), '╱');
    }

    #[test]
    fn side_view_saber_tip() {
        let mut fb = FrameBuffer::new(80, 25);
        let mut jedi = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), true);
        jedi.set_saber(true, 3);
        let tip = draw_actor(&mut fb, &jedi, &side_cam(), RenderMode::Normal);
        assert_eq!(tip, Some((44, 9)));
        assert_eq!(glyph(&fb, 44, 9), '╱');
        assert_eq!(fb.get(44, 9).map(|c| c.tone), Some(Tone::Blue));
        // Head stays on top of the body column.
        assert_eq!(glyph(&fb, 40, 11), '●');
    }

    #[test]
    fn pitch_separates_back_and_front_limbs() {
        let cam = CameraTransform::new(80, 25, Vec2::new(40.0, 12.5), 1.0, 0.8, (0, 0));
        let pose = lookup(PoseId::Idle, Faction::Light);
        let proj = Projector::new(&cam, (40, 14), 1, false);
        assert_eq!(proj.place(&pose.arm_l, -1), (39, 9));
        assert_eq!(proj.place(&pose.arm_r, 1), (41, 15));

        // Side-on, both arms share a row.
        let flat = side_cam();
        let proj = Projector::new(&flat, (40, 14), 1, false);
        assert_eq!(proj.place(&pose.arm_l, -1).1, proj.place(&pose.arm_r, 1).1);
    }

    #[test]
    fn lock_hides_the_front_arm() {
        let mut fb = FrameBuffer::new(80, 25);
        let mut a = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), true);
        a.pose = PoseId::Lock;
        draw_actor(&mut fb, &a, &side_cam(), RenderMode::Normal);
        assert_eq!(glyph(&fb, 41, 12), '█');
        assert_eq!(count(&fb, '─'), 0);
        assert_eq!(glyph(&fb, 39, 12), '╱');
    }

    #[test]
    fn facing_left_mirrors_parts_and_blade() {
        let mut fb = FrameBuffer::new(80, 25);
        let mut jedi = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), false);
        jedi.set_saber(true, 3);
        let tip = draw_actor(&mut fb, &jedi, &side_cam(), RenderMode::Normal);
        assert_eq!(tip, Some((36, 9)));
        // Front leg lands on the left of the anchor.
        assert_eq!(glyph(&fb, 39, 14), '╲');
        assert_eq!(glyph(&fb, 41, 14), '╱');
        assert_eq!(glyph(&fb, 40, 11), '●');
    }

    #[test]
    fn unlit_saber_has_no_tip() {
        let mut fb = FrameBuffer::new(80, 25);
        let jedi = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), true);
        assert_eq!(draw_actor(&mut fb, &jedi, &side_cam(), RenderMode::Normal), None);
    }

    #[test]
    fn overhead_suppresses_legs_and_shows_disc_head() {
        let cam = overhead_cam();
        for faction in [Faction::Light, Faction::Dark] {
            for pose in PoseId::ALL {
                let mut fb = FrameBuffer::new(80, 25);
                let mut a = Actor::new(faction, Vec2::new(40.0, 15.0), true);
                a.pose = pose;
                draw_actor(&mut fb, &a, &cam, RenderMode::Normal);

                let p = lookup(pose, faction);
                let anchor = cam.to_screen(a.pos);
                let (hx, hy) = Projector::new(&cam, anchor, 1, false).place(&p.head, 0);
                assert_eq!(glyph(&fb, hx, hy), '●', "{pose:?} {faction:?}");
                // Crouch legs are '_'; they must never show overhead.
                assert_eq!(count(&fb, '_'), 0, "{pose:?} {faction:?}");
                assert_eq!(count(&fb, '⍙'), 0);
            }
        }
    }

    #[test]
    fn side_view_draws_legs() {
        let mut fb = FrameBuffer::new(80, 25);
        let mut a = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), true);
        a.pose = PoseId::Crouch;
        draw_actor(&mut fb, &a, &side_cam(), RenderMode::Normal);
        assert_eq!(count(&fb, '_'), 2);
    }

    #[test]
    fn reflection_mirrors_below_floor() {
        let cam = side_cam();
        let mut fb = FrameBuffer::new(80, 25);
        let a = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), true);
        draw_actor(&mut fb, &a, &cam, RenderMode::Reflection);
        // Left leg '╱' one row above the feet becomes '╲' one row below.
        assert_eq!(glyph(&fb, 39, 16), '╲');
        assert_eq!(fb.get(39, 16).map(|c| c.tone), Some(Tone::Dim));
        assert_eq!(glyph(&fb, 40, 19), '●');
        assert_eq!(glyph(&fb, 40, 11), ' ');
    }

    #[test]
    fn reflection_below_grid_is_skipped() {
        let mut fb = FrameBuffer::new(80, 25);
        let mut a = Actor::new(Faction::Light, Vec2::new(40.0, 2.0), true);
        a.set_saber(true, 3);
        assert_eq!(draw_actor(&mut fb, &a, &side_cam(), RenderMode::Reflection), None);
    }

    #[test]
    fn blur_uses_previous_frame() {
        let mut fb = FrameBuffer::new(80, 25);
        let mut a = Actor::new(Faction::Light, Vec2::new(30.0, 15.0), true);
        a.save_state();
        a.pos.x = 40.0;
        a.pose = PoseId::Dash;
        draw_actor(&mut fb, &a, &side_cam(), RenderMode::MotionBlur);
        assert_eq!(glyph(&fb, 30, 11), '●');
        assert_eq!(fb.get(30, 11).map(|c| c.tone), Some(Tone::Dim));
        assert_eq!(count(&fb, '='), 0);
    }

    #[test]
    fn trail_only_for_fast_swings() {
        let cam = side_cam();
        let mut a = Actor::new(Faction::Light, Vec2::new(40.0, 15.0), true);
        a.set_saber(true, 3);
        a.pose = PoseId::Guard;
        a.save_state();

        let mut fb = FrameBuffer::new(80, 25);
        draw_saber_trail(&mut fb, &a, &cam);
        assert_eq!(count(&fb, '░'), 0);

        a.pose = PoseId::Attack;
        draw_saber_trail(&mut fb, &a, &cam);
        // Guard tip (37, 9) to attack tip (45, 8).
        assert_eq!(glyph(&fb, 37, 9), '░');
        assert_eq!(glyph(&fb, 45, 8), '░');
        assert!(count(&fb, '▒') > 0);
    }

    #[test]
    fn dark_side_wears_a_cape() {
        let mut fb = FrameBuffer::new(80, 25);
        let sith = Actor::new(Faction::Dark, Vec2::new(60.0, 15.0), false);
        draw_actor(&mut fb, &sith, &side_cam(), RenderMode::Normal);
        assert!(count(&fb, ':') > 0);

        let mut kneeling = FrameBuffer::new(80, 25);
        let mut sith = sith;
        sith.pose = PoseId::Kneel;
        draw_actor(&mut kneeling, &sith, &side_cam(), RenderMode::Normal);
        assert_eq!(count(&kneeling, ':'), 0);
    }

    #[test]
    fn shadows_only_at_mid_pitch() {
        let a = Actor::new(Faction::Light, Vec2::new(20.0, 15.0), true);
        let mut fb = FrameBuffer::new(80, 25);
        draw_shadow(&mut fb, &a, &side_cam());
        assert_eq!(count(&fb, '●'), 0);

        let mut cam = side_cam();
        cam.pitch = 0.7;
        draw_shadow(&mut fb, &a, &cam);
        assert_eq!(count(&fb, '●'), 1);
        assert_eq!(fb.get(cam.to_screen(a.pos).0, cam.floor_row()).map(|c| c.tone), Some(Tone::Shadow));
    }

    proptest! {
        #[test]
        fn mirroring_is_an_involution(c in any::<char>()) {
            prop_assert_eq!(mirror_glyph(mirror_glyph(c)), c);
        }
    }

    #[test]
    fn mirror_pairs() {
        for (a, b) in [('╱', '╲'), ('▄', '▀')] {
            assert_eq!(mirror_glyph(a), b);
            assert_eq!(mirror_glyph(b), a);
        }
    }
}
