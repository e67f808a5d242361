/// World-space primitives shared by the simulation and the renderer.
///
/// World ("logic") space is a fixed 80 × 25 unit stage independent of the
/// terminal size. The floor line sits at y = 15; +y points down.

/// Logical stage width in world units.
pub const LOGIC_WIDTH: f32 = 80.0;
/// Logical stage height in world units.
pub const LOGIC_HEIGHT: f32 = 25.0;
/// World y of the floor line.
pub const FLOOR_Y: f32 = 15.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Linear interpolation; `t` is not clamped.
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Scalar lerp with `t` clamped to [0, 1]. Used by the choreography.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Is `x` strictly inside the visible horizontal extent of the stage?
pub fn on_stage_x(x: f32) -> bool {
    x > 0.0 && x < LOGIC_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_lerp_endpoints() {
        let a = Vec2::new(60.0, 12.0);
        let b = Vec2::new(20.0, 12.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec2::new(40.0, 12.0));
        assert_eq!((b - a).length(), 40.0);
    }

    #[test]
    fn scalar_lerp_clamps() {
        assert_eq!(lerp(20.0, 32.0, -1.0), 20.0);
        assert_eq!(lerp(20.0, 32.0, 2.0), 32.0);
        assert_eq!(lerp(20.0, 32.0, 0.5), 26.0);
    }

    #[test]
    fn stage_bounds_are_exclusive() {
        assert!(!on_stage_x(0.0));
        assert!(on_stage_x(0.1));
        assert!(!on_stage_x(LOGIC_WIDTH));
    }
}
