/// Drawing for particle populations and the light sources they emit.

use crate::domain::actor::Actor;
use crate::domain::debris::Debris;
use crate::domain::lightning::LightningBolt;
use crate::domain::particles::{Particle, ParticleManager, ScorchMark};

use super::camera::CameraTransform;
use super::frame::{FrameBuffer, Light};
use super::palette::Tone;

/// Visual age band of a scorch mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScorchStage {
    Molten,
    Cooling,
    Ash,
}

impl ScorchStage {
    pub fn of(mark: &ScorchMark) -> Self {
        if mark.age < 0.3 {
            ScorchStage::Molten
        } else if mark.age < 1.5 {
            ScorchStage::Cooling
        } else {
            ScorchStage::Ash
        }
    }

    /// Glyph, tone and (glow radius, glow tone) for this stage.
    fn look(self) -> (char, Tone, Option<(i32, Tone)>) {
        match self {
            ScorchStage::Molten => ('▓', Tone::White, Some((4, Tone::Yellow))),
            ScorchStage::Cooling => ('▒', Tone::Red, Some((2, Tone::Red))),
            ScorchStage::Ash => ('░', Tone::Dim, None),
        }
    }
}

pub fn draw_scorch_marks(fb: &mut FrameBuffer, marks: &[ScorchMark], cam: &CameraTransform) {
    for mark in marks {
        let (x, y) = cam.to_screen(mark.pos);
        let (glyph, tone, glow) = ScorchStage::of(mark).look();
        if let Some((radius, glow_tone)) = glow {
            fb.apply_glow(x, y, radius, glow_tone);
        }
        fb.draw(x, y, glyph, tone);
    }
}

pub fn draw_debris<'a>(fb: &mut FrameBuffer, debris: impl Iterator<Item = &'a Debris>, cam: &CameraTransform) {
    for chunk in debris.filter(|d| d.active) {
        let (x, y) = cam.to_screen(chunk.pos);
        fb.draw(x, y, chunk.glyph, Tone::White);
    }
}

pub fn draw_lightning(fb: &mut FrameBuffer, bolts: &[LightningBolt], cam: &CameraTransform) {
    for bolt in bolts {
        for seg in bolt.points.windows(2) {
            let (x0, y0) = cam.to_screen(seg[0]);
            let (x1, y1) = cam.to_screen(seg[1]);
            fb.draw_line(x0, y0, x1, y1, '+', Tone::White);
            fb.apply_glow(x0, y0, 6, Tone::Cyan);
        }
    }
}

pub fn draw_sparks(fb: &mut FrameBuffer, sparks: &[Particle], cam: &CameraTransform) {
    for s in sparks {
        let (x, y) = cam.to_screen(s.pos);
        fb.draw(x, y, '*', Tone::Yellow);
    }
}

pub fn draw_smoke(fb: &mut FrameBuffer, smoke: &[Particle], cam: &CameraTransform) {
    for s in smoke {
        let (x, y) = cam.to_screen(s.pos);
        let glyph = if s.life > 1.0 { '▒' } else { '░' };
        fb.draw(x, y, glyph, Tone::Dim);
    }
}

/// Everything that stays visible under the darkness mask this frame.
/// `duelists` pairs each actor with the blade tip returned by its draw.
pub fn collect_lights(
    duelists: &[(&Actor, Option<(i32, i32)>)],
    particles: &ParticleManager,
    cam: &CameraTransform,
) -> Vec<Light> {
    let mut lights = Vec::new();

    for (actor, tip) in duelists {
        if let (true, Some((tx, ty))) = (actor.saber_active, tip) {
            lights.push(Light::new(*tx, *ty, 10));
            let (ax, ay) = cam.to_screen(actor.pos);
            lights.push(Light::new(ax, ay, 5));
        }
    }

    for s in &particles.sparks {
        let (x, y) = cam.to_screen(s.pos);
        lights.push(Light::new(x, y, 4));
    }

    for bolt in &particles.bolts {
        if let Some(mid) = bolt.midpoint() {
            let (x, y) = cam.to_screen(mid);
            lights.push(Light::new(x, y, 8));
        }
    }

    lights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geom::Vec2;
    use crate::domain::pose::Faction;

    fn cam() -> CameraTransform {
        CameraTransform::new(80, 25, Vec2::new(40.0, 12.5), 1.0, 0.0, (0, 0))
    }

    #[test]
    fn scorch_cools_through_three_stages() {
        let mut mark = ScorchMark { pos: Vec2::new(30.0, 16.0), age: 0.0 };
        assert_eq!(ScorchStage::of(&mark), ScorchStage::Molten);
        mark.age = 0.3;
        assert_eq!(ScorchStage::of(&mark), ScorchStage::Cooling);
        mark.age = 1.5;
        assert_eq!(ScorchStage::of(&mark), ScorchStage::Ash);
    }

    #[test]
    fn molten_scorch_lights_the_floor() {
        let mut fb = FrameBuffer::new(80, 25);
        fb.fill('━', Tone::Dim);
        let marks = [ScorchMark { pos: Vec2::new(30.0, 16.0), age: 0.1 }];
        draw_scorch_marks(&mut fb, &marks, &cam());
        assert_eq!(fb.get(30, 16).map(|c| (c.glyph, c.tone)), Some(('▓', Tone::White)));
        assert_eq!(fb.get(33, 16).map(|c| c.tone), Some(Tone::Yellow));
        assert_eq!(fb.get(35, 16).map(|c| c.tone), Some(Tone::Dim));
    }

    #[test]
    fn inactive_debris_is_invisible() {
        let mut fb = FrameBuffer::new(80, 25);
        let chunks = [
            Debris { pos: Vec2::new(50.0, 8.0), vel: Vec2::default(), active: true, glyph: '■' },
            Debris { pos: Vec2::new(52.0, 8.0), vel: Vec2::default(), active: false, glyph: '●' },
        ];
        draw_debris(&mut fb, chunks.iter(), &cam());
        assert_eq!(fb.get(50, 8).map(|c| c.glyph), Some('■'));
        assert_eq!(fb.get(52, 8).map(|c| c.glyph), Some(' '));
    }

    #[test]
    fn smoke_thins_with_age() {
        let mut fb = FrameBuffer::new(80, 25);
        let smoke = [
            Particle { pos: Vec2::new(10.0, 10.0), vel: Vec2::default(), life: 2.0 },
            Particle { pos: Vec2::new(12.0, 10.0), vel: Vec2::default(), life: 0.5 },
        ];
        draw_smoke(&mut fb, &smoke, &cam());
        assert_eq!(fb.get(10, 10).map(|c| c.glyph), Some('▒'));
        assert_eq!(fb.get(12, 10).map(|c| c.glyph), Some('░'));
    }

    #[test]
    fn lights_come_from_lit_sabers_sparks_and_bolts() {
        let c = cam();
        let mut pm = ParticleManager::new(1);
        pm.spawn_sparks(Vec2::new(40.0, 10.0), 3);
        pm.spawn_lightning(Vec2::new(60.0, 12.0), Vec2::new(20.0, 12.0));

        let mut jedi = Actor::new(Faction::Light, Vec2::new(20.0, 15.0), true);
        jedi.set_saber(true, 3);
        let sith = Actor::new(Faction::Dark, Vec2::new(60.0, 15.0), false);

        let lights = collect_lights(&[(&jedi, Some((24, 9))), (&sith, None)], &pm, &c);
        // tip + anchor, three sparks, one bolt midpoint
        assert_eq!(lights.len(), 6);
        assert!(lights.contains(&Light::new(24, 9, 10)));
        assert!(lights.contains(&Light::new(20, 15, 5)));
        assert_eq!(lights.iter().filter(|l| l.radius == 8).count(), 1);
    }
}
