/// Static scenery: hall backdrop, breached wall, floor emblem, and the
/// starfield crawl that opens the show.

use crate::domain::geom::{Vec2, FLOOR_Y};

use super::camera::CameraTransform;
use super::frame::FrameBuffer;
use super::palette::Tone;

// ── Backdrop ──

/// Pitch at which the walls leave the frame.
const BACKDROP_MAX_PITCH: f32 = 0.8;
const WALL_DAMAGE_MAX_PITCH: f32 = 0.5;

/// The hall's walls, floor and ceiling, precomputed once for the grid size.
pub struct Backdrop {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
}

impl Backdrop {
    pub fn new(width: usize, height: usize) -> Self {
        let floor = (FLOOR_Y * height as f32 / 25.0) as usize;
        let mut glyphs = vec![' '; width * height];

        for y in 0..height {
            for x in 0..width {
                let px = x as f32 / width as f32;
                let c = if y == floor {
                    '━'
                } else if y == floor + 1 {
                    '▍'
                } else if y > floor + 1 {
                    ' '
                } else if y == 0 {
                    '━'
                } else if y == 1 {
                    '▖'
                } else if !(0.1..=0.9).contains(&px) {
                    // Pillars at either end.
                    if x % 4 == 0 {
                        '▐'
                    } else if y % 5 == 0 {
                        '≡'
                    } else {
                        ' '
                    }
                } else if px < 0.12 {
                    '╱'
                } else if px > 0.88 {
                    '╲'
                } else {
                    ' '
                };
                glyphs[y * width + x] = c;
            }
        }

        Backdrop { width, height, glyphs }
    }

    pub fn draw(&self, fb: &mut FrameBuffer, cam: &CameraTransform) {
        if cam.pitch >= BACKDROP_MAX_PITCH {
            return;
        }
        let (ox, oy) = cam.shake;
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.glyphs[y * self.width + x];
                if c != ' ' {
                    fb.draw(x as i32 + ox, y as i32 + oy, c, Tone::Dim);
                }
            }
        }
    }
}

/// Ragged hole in the right wall, logic x 74..80, y 4..=14.
pub fn draw_wall_damage(fb: &mut FrameBuffer, cam: &CameraTransform) {
    if cam.pitch >= WALL_DAMAGE_MAX_PITCH {
        return;
    }
    for y in 4..=14 {
        for x in 74..80 {
            let (sx, sy) = cam.flat(Vec2::new(x as f32, y as f32));
            let interior = x > 75 && y > 5 && y < 13;
            if interior {
                let c = if (x + y) % 3 == 0 { '░' } else { ' ' };
                fb.draw(sx, sy, c, Tone::Dim);
            } else {
                let c = if y == 4 || y == 14 {
                    '▄'
                } else if (x + y) % 2 == 0 {
                    '▙'
                } else {
                    '▟'
                };
                fb.draw(sx, sy, c, Tone::Dim);
            }
        }
    }
}

// ── Floor emblem ──

/// Screen-space ellipse radii, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiskRadii {
    pub outer: (i32, i32),
    /// Unpainted hole; (0, 0) for none.
    pub inner: (i32, i32),
}

/// Emblem radii for the current camera. The vertical radius follows
/// |sin(pitch)|: a line from the side, a full disk from overhead.
pub fn disk_radii(cam: &CameraTransform) -> DiskRadii {
    let aspect = cam.pitch.sin().abs();
    let rx = (28.0 * cam.scale_x * cam.zoom) as i32;
    let fixed_ry = (11.0 * cam.scale_y * cam.zoom) as i32;
    let mut ry = (fixed_ry as f32 * aspect).round() as i32;
    if cam.pitch > 0.05 && ry == 0 {
        ry = 1;
    }
    DiskRadii {
        outer: (rx, ry),
        inner: (
            (11.0 * cam.scale_x * cam.zoom) as i32,
            (5.0 * cam.scale_y * cam.zoom * aspect).round() as i32,
        ),
    }
}

pub fn draw_floor_disk(fb: &mut FrameBuffer, cam: &CameraTransform) {
    let center = cam.to_screen(Vec2::new(40.0, FLOOR_Y));
    draw_yin_yang(fb, center, disk_radii(cam));
}

/// Rasterize the two-tone swirl by horizontal scanlines.
pub fn draw_yin_yang(fb: &mut FrameBuffer, center: (i32, i32), radii: DiskRadii) {
    let (radius_x, radius_y) = radii.outer;
    if radius_x <= 0 || radius_y <= 0 {
        return;
    }
    let (rx, ry) = (radius_x as f32, radius_y as f32);
    let (irx, iry) = (radii.inner.0 as f32, radii.inner.1 as f32);
    let has_hole = irx > 0.0 && iry > 0.0;
    let (cx, cy) = center;

    for y in -radius_y..=radius_y {
        let v = y as f32 / ry;
        let x_limit = (rx * (1.0 - v * v).max(0.0).sqrt()) as i32;
        let screen_y = cy + y;
        if screen_y < 0 || screen_y >= fb.height() as i32 {
            continue;
        }

        for x in -x_limit..=x_limit {
            if has_hole {
                let (nx, ny) = (x as f32 / irx, y as f32 / iry);
                if nx * nx + ny * ny < 1.0 {
                    continue;
                }
            }

            let u = x as f32 / rx;
            let top = u * u + (v + 0.5) * (v + 0.5);
            let bottom = u * u + (v - 0.5) * (v - 0.5);

            // Halves split at the centerline, swapped inside each lobe,
            // swapped back inside each lobe's eye.
            let mut red = x >= 0;
            if top < 0.25 {
                red = true;
            }
            if bottom < 0.25 {
                red = false;
            }
            let in_eye = top < 0.02 || bottom < 0.02;
            if top < 0.02 {
                red = false;
            }
            if bottom < 0.02 {
                red = true;
            }

            let glyph = if !in_eye && u * u + v * v > 0.85 { '▓' } else { '█' };
            let tone = if red { Tone::Red } else { Tone::Blue };
            fb.draw(cx + x, screen_y, glyph, tone);
        }
    }
}

// ── Opening crawl ──

pub const CRAWL_TEXT: &str = "EPISODE VII
THE CLI AWAKENS

It is a time of coding challenges.
A lone JEDI KNIGHT defends the
terminal from the dark side.

A SITH LORD, master of bugs,
seeks to crash the system.

As pixels clash and cursors
flash, the fate of the
console hangs in the balance...";

/// Rows per second the crawl rises.
pub const CRAWL_SPEED: f32 = 2.5;

/// Starfield plus centered text rising from the bottom edge.
pub fn draw_opening_crawl(fb: &mut FrameBuffer, stars: &[Vec2], elapsed: f32, cam: &CameraTransform) {
    for star in stars {
        let (x, y) = cam.flat(*star);
        fb.draw(x, y, '.', Tone::Dim);
    }

    let height = fb.height() as f32;
    let scroll = elapsed * CRAWL_SPEED;
    let center_x = fb.width() as i32 / 2;
    for (i, line) in CRAWL_TEXT.lines().enumerate() {
        let line = line.trim();
        let row = height + (i * 2) as f32 - scroll;
        if row > height || row < 0.0 {
            continue;
        }
        let len = line.chars().count() as i32;
        let x = (center_x - len / 2).max(0);
        fb.draw_str(x, row as i32, line, Tone::Yellow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn cam(pitch: f32) -> CameraTransform {
        CameraTransform::new(80, 25, Vec2::new(40.0, 12.0), 1.0, pitch, (0, 0))
    }

    fn count_tone(fb: &FrameBuffer, tone: Tone) -> usize {
        let mut n = 0;
        for y in 0..fb.height() as i32 {
            for x in 0..fb.width() as i32 {
                if fb.get(x, y).is_some_and(|c| c.tone == tone && c.glyph != ' ') {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn backdrop_floor_and_ceiling() {
        let b = Backdrop::new(80, 25);
        let mut fb = FrameBuffer::new(80, 25);
        b.draw(&mut fb, &cam(0.0));
        assert_eq!(fb.get(40, 15).map(|c| c.glyph), Some('━'));
        assert_eq!(fb.get(40, 16).map(|c| c.glyph), Some('▍'));
        assert_eq!(fb.get(40, 0).map(|c| c.glyph), Some('━'));
        assert_eq!(fb.get(0, 3).map(|c| c.glyph), Some('▐'));
        assert_eq!(fb.get(8, 3).map(|c| c.glyph), Some('╱'));
        assert_eq!(fb.get(40, 20).map(|c| c.glyph), Some(' '));
    }

    #[test]
    fn backdrop_hidden_from_above() {
        let b = Backdrop::new(80, 25);
        let mut fb = FrameBuffer::new(80, 25);
        b.draw(&mut fb, &cam(0.8));
        assert_eq!(count_tone(&fb, Tone::Dim), 0);
    }

    #[test]
    fn wall_hole_has_rubble_edges() {
        let mut fb = FrameBuffer::new(80, 25);
        draw_wall_damage(&mut fb, &cam(0.0));
        assert_eq!(fb.get(74, 4).map(|c| c.glyph), Some('▄'));
        assert_eq!(fb.get(74, 5).map(|c| c.glyph), Some('▟'));
        assert_eq!(fb.get(76, 9).map(|c| c.glyph), Some(' '));
        assert_eq!(fb.get(77, 7).map(|c| c.glyph), Some('░'));
    }

    #[test]
    fn disk_is_edge_on_from_the_side() {
        let r = disk_radii(&cam(0.0));
        assert_eq!(r.outer, (28, 0));
        let mut fb = FrameBuffer::new(80, 25);
        draw_floor_disk(&mut fb, &cam(0.0));
        assert_eq!(count_tone(&fb, Tone::Red) + count_tone(&fb, Tone::Blue), 0);

        // Just past the threshold it becomes a one-row line.
        assert_eq!(disk_radii(&cam(0.06)).outer.1, 1);
    }

    #[test]
    fn disk_is_round_from_above() {
        let r = disk_radii(&cam(FRAC_PI_2));
        assert_eq!(r.outer, (28, 11));
        assert_eq!(r.inner, (11, 5));

        let mut fb = FrameBuffer::new(80, 25);
        draw_yin_yang(&mut fb, (40, 12), r);
        // Hole in the middle.
        assert_eq!(fb.get(40, 12).map(|c| c.glyph), Some(' '));
        // Outside the hole, left is blue and right is red at the center row.
        assert_eq!(fb.get(14, 12).map(|c| c.tone), Some(Tone::Blue));
        assert_eq!(fb.get(66, 12).map(|c| c.tone), Some(Tone::Red));
        assert!(count_tone(&fb, Tone::Red) > 100);
        assert!(count_tone(&fb, Tone::Blue) > 100);
    }

    #[test]
    fn degenerate_disk_draws_nothing() {
        let mut fb = FrameBuffer::new(20, 10);
        let none = DiskRadii { outer: (0, 4), inner: (0, 0) };
        draw_yin_yang(&mut fb, (10, 5), none);
        let flat = DiskRadii { outer: (6, -1), inner: (0, 0) };
        draw_yin_yang(&mut fb, (10, 5), flat);
        assert_eq!(count_tone(&fb, Tone::Red) + count_tone(&fb, Tone::Blue), 0);
    }

    #[test]
    fn crawl_starts_at_the_bottom_and_rises() {
        let c = cam(0.0);
        let mut fb = FrameBuffer::new(80, 25);
        draw_opening_crawl(&mut fb, &[], 0.0, &c);
        // First line sits exactly on the bottom edge, which is off grid.
        assert_eq!(count_tone(&fb, Tone::Yellow), 0);

        let mut fb = FrameBuffer::new(80, 25);
        draw_opening_crawl(&mut fb, &[Vec2::new(5.0, 5.0)], 2.0, &c);
        // 5 rows scrolled: "EPISODE VII" is on row 20.
        assert_eq!(fb.get(35, 20).map(|c| c.glyph), Some('E'));
        assert_eq!(fb.get(5, 5).map(|c| c.glyph), Some('.'));
    }
}
