/// Frame buffer: a fixed grid of (glyph, tone) cells.
///
/// Everything in a frame is drawn here first, then written to the terminal
/// in one pass. Drawing outside the grid is silently ignored since actors
/// and particles routinely project off screen.
///
/// The whole grid is re-sent every frame; there is no diff against the
/// previous frame. Color escapes are only emitted when the tone changes
/// from one cell to the next.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetForegroundColor},
};

use super::palette::Tone;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub tone: Tone,
}

impl Cell {
    pub const BLANK: Cell = Cell { glyph: ' ', tone: Tone::Black };
}

/// A circular light used by the darkness mask, in screen cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Light {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

impl Light {
    pub fn new(x: i32, y: i32, radius: i32) -> Self {
        Light { x, y, radius }
    }

    fn covers(&self, x: i32, y: i32) -> bool {
        if self.radius <= 0 {
            return false;
        }
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn clear(&mut self) {
        self.fill(' ', Tone::Black);
    }

    pub fn fill(&mut self, glyph: char, tone: Tone) {
        self.cells.fill(Cell { glyph, tone });
    }

    pub fn draw(&mut self, x: i32, y: i32, glyph: char, tone: Tone) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, tone };
        }
    }

    /// One cell per char, clipped at the grid edges.
    pub fn draw_str(&mut self, x: i32, y: i32, text: &str, tone: Tone) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            self.draw(x + i as i32, y, ch, tone);
        }
    }

    /// Bresenham line including both endpoints.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, glyph: char, tone: Tone) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.draw(x, y, glyph, tone);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Repaint ambient-toned cells within `radius` of (cx, cy) with `tone`.
    pub fn apply_glow(&mut self, cx: i32, cy: i32, radius: i32, tone: Tone) {
        if radius <= 0 {
            return;
        }
        let light = Light::new(cx, cy, radius);
        let y_range = (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1);
        for y in y_range {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                if !light.covers(x, y) {
                    continue;
                }
                if let Some(i) = self.index(x, y) {
                    if self.cells[i].tone.is_ambient() {
                        self.cells[i].tone = tone;
                    }
                }
            }
        }
    }

    /// Blank every cell that no light reaches.
    pub fn apply_darkness(&mut self, lights: &[Light]) {
        for y in 0..self.height {
            for x in 0..self.width {
                let (xi, yi) = (x as i32, y as i32);
                if !lights.iter().any(|l| l.covers(xi, yi)) {
                    self.cells[y * self.width + x].glyph = ' ';
                }
            }
        }
    }

    /// Write the whole grid to `out`. Rows are addressed with an explicit
    /// cursor move since the terminal is in raw mode.
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut last_tone: Option<Tone> = None;
        let mut run = String::with_capacity(self.width * 3);

        for y in 0..self.height {
            queue!(out, MoveTo(0, y as u16))?;
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            for cell in row {
                if last_tone != Some(cell.tone) {
                    if !run.is_empty() {
                        queue!(out, Print(&run))?;
                        run.clear();
                    }
                    queue!(out, SetForegroundColor(cell.tone.color()))?;
                    last_tone = Some(cell.tone);
                }
                run.push(cell.glyph);
            }
            if !run.is_empty() {
                queue!(out, Print(&run))?;
                run.clear();
            }
        }

        queue!(out, ResetColor)?;
        out.flush()
    }
}
