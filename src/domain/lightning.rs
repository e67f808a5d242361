/// Lightning bolts.
///
/// A bolt is generated once from its endpoints and then only ages. The path
/// is the straight segment cut into 2-unit steps with every interior point
/// nudged sideways by a uniform jitter, which reads as a jagged but clearly
/// directed arc.

use rand::Rng;

use super::geom::Vec2;

/// World units between consecutive bolt points.
const SEGMENT_LEN: f32 = 2.0;
/// Max sideways displacement of an interior point.
const JITTER: f32 = 1.0;

#[derive(Clone, Debug)]
pub struct LightningBolt {
    pub points: Vec<Vec2>,
    pub life: f32,
}

impl LightningBolt {
    pub fn generate<R: Rng>(start: Vec2, end: Vec2, life: f32, rng: &mut R) -> Self {
        let delta = end - start;
        let segments = (delta.length() / SEGMENT_LEN) as usize;
        // Jitter across the bolt's direction of travel.
        let jitter_y = delta.x.abs() >= delta.y.abs();

        let mut points = Vec::with_capacity(segments.max(1) + 1);
        points.push(start);
        for i in 1..segments {
            let t = i as f32 / segments as f32;
            let mut p = start.lerp(end, t);
            let j = rng.gen_range(-JITTER..JITTER);
            if jitter_y {
                p.y += j;
            } else {
                p.x += j;
            }
            points.push(p);
        }
        points.push(end);

        LightningBolt { points, life }
    }

    /// Point used as the bolt's light source.
    pub fn midpoint(&self) -> Option<Vec2> {
        self.points.get(self.points.len() / 2).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn horizontal_bolt_has_21_points_within_jitter() {
        let mut rng = StdRng::seed_from_u64(123);
        let start = Vec2::new(60.0, 12.0);
        let end = Vec2::new(20.0, 12.0);
        let bolt = LightningBolt::generate(start, end, 0.1, &mut rng);

        assert_eq!(bolt.points.len(), 21);
        assert_eq!(bolt.points[0], start);
        assert_eq!(bolt.points[20], end);
        for (i, p) in bolt.points.iter().enumerate().skip(1).take(19) {
            let straight = start.lerp(end, i as f32 / 20.0);
            assert!((p.x - straight.x).abs() < 1e-4);
            assert!((p.y - straight.y).abs() <= 1.0);
        }
    }

    #[test]
    fn vertical_bolt_jitters_horizontally() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = Vec2::new(40.0, 0.0);
        let end = Vec2::new(40.0, 10.0);
        let bolt = LightningBolt::generate(start, end, 0.1, &mut rng);
        assert_eq!(bolt.points.len(), 6);
        for p in &bolt.points[1..5] {
            assert!((p.x - 40.0).abs() <= 1.0);
        }
    }

    #[test]
    fn short_bolt_is_just_endpoints() {
        let mut rng = StdRng::seed_from_u64(1);
        let bolt = LightningBolt::generate(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 0.1, &mut rng);
        assert_eq!(bolt.points.len(), 2);
        assert_eq!(bolt.midpoint(), Some(Vec2::new(1.0, 0.0)));
    }
}
