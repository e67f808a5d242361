/// Presentation layer: composes one frame per tick from the duel snapshot
/// and writes it to the terminal.
///
/// How it works:
///   1. Build a camera for this frame (focus, zoom, pitch, shake jitter)
///   2. Draw every layer back to front into the frame buffer
///   3. Punch the darkness mask if the lights are out
///   4. Overlay the subtitle
///   5. Present the grid with batched `queue!` commands, flushed once
///
/// Composition lives in `Scene`, which never touches the terminal.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{self, Clear, ClearType},
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::sim::world::{DuelState, Phase};

use super::actor_view::{draw_actor, draw_saber_trail, draw_shadow, faction_tone, RenderMode};
use super::camera::{shake_offset, CameraTransform};
use super::effects_view::{
    collect_lights, draw_debris, draw_lightning, draw_scorch_marks, draw_smoke, draw_sparks,
};
use super::environment::{draw_floor_disk, draw_opening_crawl, draw_wall_damage, Backdrop};
use super::frame::FrameBuffer;
use super::palette::Tone;

/// Reflections fade out as the camera climbs.
const REFLECTION_MAX_PITCH: f32 = 0.5;
/// Minimum horizontal travel per step that leaves a ghost.
const BLUR_MIN_DX: f32 = 0.5;
const SABER_GLOW_RADIUS: i32 = 12;
/// Rows above the bottom edge for the subtitle line.
const SUBTITLE_LIFT: i32 = 3;

// ── Scene: frame composition ──

pub struct Scene {
    fb: FrameBuffer,
    backdrop: Backdrop,
    shake_rng: StdRng,
}

impl Scene {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Scene {
            fb: FrameBuffer::new(width, height),
            backdrop: Backdrop::new(width, height),
            shake_rng: StdRng::seed_from_u64(seed.wrapping_add(3)),
        }
    }

    pub fn compose(&mut self, s: &DuelState) -> &FrameBuffer {
        self.fb.clear();

        if s.flash {
            self.fb.fill('█', Tone::White);
            return &self.fb;
        }

        let shake = shake_offset(s.shake, &mut self.shake_rng);
        let cam = CameraTransform::new(
            self.fb.width(),
            self.fb.height(),
            s.camera.focus,
            s.camera.zoom,
            s.camera.pitch,
            shake,
        );

        if s.phase == Phase::OpeningCrawl {
            draw_opening_crawl(&mut self.fb, &s.stars, s.phase_time, &cam);
            return &self.fb;
        }

        self.compose_stage(s, &cam);
        if !s.subtitle.is_empty() {
            draw_subtitle(&mut self.fb, &s.subtitle);
        }
        &self.fb
    }

    fn compose_stage(&mut self, s: &DuelState, cam: &CameraTransform) {
        let fb = &mut self.fb;
        let fx = &s.particles;
        let actors = [&s.protagonist, &s.antagonist];

        // Scenery
        self.backdrop.draw(fb, cam);
        if s.wall_damaged {
            draw_wall_damage(fb, cam);
        }
        draw_floor_disk(fb, cam);
        draw_scorch_marks(fb, &fx.scorch_marks, cam);
        draw_debris(fb, fx.debris.iter(), cam);

        // Ground effects
        for a in actors {
            draw_shadow(fb, a, cam);
        }
        if cam.pitch < REFLECTION_MAX_PITCH {
            for a in actors {
                draw_actor(fb, a, cam, RenderMode::Reflection);
            }
        }
        for a in actors {
            if (a.pos.x - a.prev_pos.x).abs() > BLUR_MIN_DX {
                draw_actor(fb, a, cam, RenderMode::MotionBlur);
            }
        }

        // Duelists: the second pass keeps bodies crisp over their own glow.
        for a in actors {
            if let Some((tx, ty)) = draw_actor(fb, a, cam, RenderMode::Normal) {
                fb.apply_glow(tx, ty, SABER_GLOW_RADIUS, faction_tone(a.faction));
            }
        }
        let tips = actors.map(|a| draw_actor(fb, a, cam, RenderMode::Normal));
        for a in actors {
            draw_saber_trail(fb, a, cam);
        }

        // Airborne effects
        draw_lightning(fb, &fx.bolts, cam);
        draw_sparks(fb, &fx.sparks, cam);
        draw_smoke(fb, &fx.smoke, cam);

        if s.darkness {
            let lights = collect_lights(
                &[(&s.protagonist, tips[0]), (&s.antagonist, tips[1])],
                fx,
                cam,
            );
            fb.apply_darkness(&lights);
        }
    }
}

/// Centered line on a blank bar, three rows above the bottom.
fn draw_subtitle(fb: &mut FrameBuffer, text: &str) {
    let len = text.chars().count() as i32;
    let y = fb.height() as i32 - SUBTITLE_LIFT;
    let x = (fb.width() as i32 - len) / 2;
    for bx in (x - 2)..(x + len + 2) {
        fb.draw(bx, y, ' ', Tone::Black);
    }
    fb.draw_str(x, y, text, Tone::White);
}

// ── Renderer: the terminal session ──

pub struct Renderer {
    writer: BufWriter<Stdout>,
    scene: Scene,
}

impl Renderer {
    /// The grid size is read from the terminal once, here, and kept for the
    /// whole run. `fallback` is used when the size can't be read.
    pub fn new(fallback: (u16, u16), seed: u64) -> Self {
        let (w, h) = grid_size(fallback);
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            scene: Scene::new(w, h, seed),
        }
    }

    pub fn grid(&self) -> (usize, usize) {
        (self.scene.fb.width(), self.scene.fb.height())
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, state: &DuelState) -> io::Result<()> {
        let frame = self.scene.compose(state);
        frame.present(&mut self.writer)?;
        self.writer.flush()
    }
}

fn grid_size(fallback: (u16, u16)) -> (usize, usize) {
    let (w, h) = match terminal::size() {
        Ok((w, h)) if w > 0 && h > 0 => (w, h),
        _ => fallback,
    };
    (w as usize, h as usize)
}
