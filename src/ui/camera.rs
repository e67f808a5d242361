/// Camera projection from the 80 × 25 world onto terminal cells.
///
/// Pitch tilts the view from side-on (0) toward overhead (π/2): the depth
/// axis is squashed by cos(pitch), horizontal offsets more gently, and
/// front/back limbs separate vertically by a sin(pitch) depth shift.
/// All float → cell conversions truncate toward zero (`as i32`).

use rand::Rng;

use crate::domain::geom::{Vec2, FLOOR_Y, LOGIC_HEIGHT, LOGIC_WIDTH};

/// Maximum depth shift in cells at overhead pitch.
const Z_SHIFT: f32 = 4.5;
/// Narrowest horizontal compression.
const MIN_WIDTH_SCALE: f32 = 0.4;
/// Below this height scale actors switch to the overhead silhouette.
const TOP_DOWN_BELOW: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    pub focus: Vec2,
    pub zoom: f32,
    pub pitch: f32,
    pub shake: (i32, i32),
    pub scale_x: f32,
    pub scale_y: f32,
}

impl CameraTransform {
    /// Camera for a `cols` × `rows` grid.
    pub fn new(cols: usize, rows: usize, focus: Vec2, zoom: f32, pitch: f32, shake: (i32, i32)) -> Self {
        CameraTransform {
            focus,
            zoom,
            pitch,
            shake,
            scale_x: cols as f32 / LOGIC_WIDTH,
            scale_y: rows as f32 / LOGIC_HEIGHT,
        }
    }

    pub fn to_screen(&self, world: Vec2) -> (i32, i32) {
        let rel_x = (world.x - self.focus.x) * self.zoom;
        let rel_y = (world.y - self.focus.y) * self.pitch.cos() * self.zoom;
        let sx = ((rel_x + LOGIC_WIDTH / 2.0) * self.scale_x) as i32 + self.shake.0;
        let sy = ((rel_y + LOGIC_HEIGHT / 2.0) * self.scale_y) as i32 + self.shake.1;
        (sx, sy)
    }

    /// World point to cell without focus, zoom or pitch. Static scenery uses this.
    pub fn flat(&self, world: Vec2) -> (i32, i32) {
        (
            (world.x * self.scale_x) as i32 + self.shake.0,
            (world.y * self.scale_y) as i32 + self.shake.1,
        )
    }

    /// Row of the floor line under the current focus, zoom and pitch.
    /// Reflections mirror about it and shadows sit on it.
    pub fn floor_row(&self) -> i32 {
        self.to_screen(Vec2::new(self.focus.x, FLOOR_Y)).1
    }

    pub fn height_scale(&self) -> f32 {
        self.pitch.cos()
    }

    pub fn width_scale(&self) -> f32 {
        (MIN_WIDTH_SCALE + self.height_scale() * 0.6).clamp(MIN_WIDTH_SCALE, 1.0)
    }

    pub fn z_factor(&self) -> f32 {
        let h = self.height_scale();
        Z_SHIFT * (1.0 - (h * h).clamp(0.0, 1.0)).sqrt()
    }

    pub fn is_top_down(&self) -> bool {
        self.height_scale() < TOP_DOWN_BELOW
    }

    /// Scale a horizontal part offset. A non-zero offset never collapses to 0.
    pub fn scale_offset(&self, offset: i32) -> i32 {
        scale_offset(offset, self.width_scale())
    }
}

pub fn scale_offset(offset: i32, scale: f32) -> i32 {
    if offset == 0 {
        return 0;
    }
    match (offset as f32 * scale).round() as i32 {
        0 => offset.signum(),
        scaled => scaled,
    }
}

/// Per-frame jitter in {-1, 0, 1}² while shaking.
pub fn shake_offset<R: Rng>(enabled: bool, rng: &mut R) -> (i32, i32) {
    if !enabled {
        return (0, 0);
    }
    (rng.gen_range(-1..=1), rng.gen_range(-1..=1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    fn neutral(cols: usize, rows: usize) -> CameraTransform {
        // Focus at the stage center cancels the re-centering term.
        CameraTransform::new(cols, rows, Vec2::new(40.0, 12.5), 1.0, 0.0, (0, 0))
    }

    #[test]
    fn neutral_camera_is_flat_scaling() {
        for (cols, rows) in [(80, 25), (120, 40), (200, 50)] {
            let cam = neutral(cols, rows);
            for (x, y) in [(0.0, 0.0), (20.0, 15.0), (60.0, 15.0), (79.0, 24.0), (33.3, 7.7)] {
                let p = Vec2::new(x, y);
                let expected = (
                    (x * cols as f32 / 80.0) as i32,
                    (y * rows as f32 / 25.0) as i32,
                );
                assert_eq!(cam.to_screen(p), expected, "({x}, {y}) on {cols}x{rows}");
                assert_eq!(cam.flat(p), expected);
            }
        }
    }

    #[test]
    fn overhead_pitch_flattens_depth() {
        let cam = CameraTransform::new(80, 25, Vec2::new(40.0, 12.0), 1.0, FRAC_PI_2, (0, 0));
        let (_, y1) = cam.to_screen(Vec2::new(40.0, 2.0));
        let (_, y2) = cam.to_screen(Vec2::new(40.0, 22.0));
        assert_eq!(y1, y2);
        assert!(cam.is_top_down());
        assert!((cam.z_factor() - 4.5).abs() < 1e-3);
        assert!((cam.width_scale() - 0.4).abs() < 1e-3);
    }

    #[test]
    fn side_view_has_no_depth_shift() {
        let cam = neutral(80, 25);
        assert_eq!(cam.z_factor(), 0.0);
        assert_eq!(cam.width_scale(), 1.0);
        assert!(!cam.is_top_down());
    }

    #[test]
    fn offsets_never_collapse() {
        assert_eq!(scale_offset(0, 0.4), 0);
        assert_eq!(scale_offset(1, 0.4), 1);
        assert_eq!(scale_offset(-1, 0.4), -1);
        assert_eq!(scale_offset(3, 0.4), 1);
        assert_eq!(scale_offset(-3, 0.5), -2);
        assert_eq!(scale_offset(2, 1.0), 2);
    }

    #[test]
    fn shake_is_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(shake_offset(false, &mut rng), (0, 0));
        for _ in 0..100 {
            let (x, y) = shake_offset(true, &mut rng);
            assert!((-1..=1).contains(&x) && (-1..=1).contains(&y));
        }
    }

    #[test]
    fn shake_moves_everything_together() {
        let mut cam = neutral(80, 25);
        let before = cam.to_screen(Vec2::new(20.0, 15.0));
        let floor = cam.floor_row();
        cam.shake = (1, -1);
        assert_eq!(cam.to_screen(Vec2::new(20.0, 15.0)), (before.0 + 1, before.1 - 1));
        assert_eq!(cam.floor_row(), floor - 1);
    }

    #[test]
    fn floor_row_follows_zoom() {
        let cam = CameraTransform::new(80, 25, Vec2::new(40.0, 10.0), 1.3, 0.0, (0, 0));
        assert_eq!(cam.floor_row(), 19);
        assert_eq!(cam.to_screen(Vec2::new(20.0, FLOOR_Y)).1, cam.floor_row());
        // Flat scaling would have left the floor on row 15.
        assert_ne!(cam.flat(Vec2::new(20.0, FLOOR_Y)).1, cam.floor_row());
    }
}
