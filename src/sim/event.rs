/// Events emitted during a simulation step.
/// The main loop consumes these for logging.

use crate::domain::geom::Vec2;

use super::world::Phase;

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    PhaseChanged { from: Phase, to: Phase },
    DebrisLaunched { from: Vec2, flight_time: f32 },
    DebrisDeflected { at: Vec2 },
    DebrisLanded { at: Vec2 },
    LightningStruck { from: Vec2, to: Vec2 },
    /// Blades met; `sparks` were thrown at `at`.
    Impact { at: Vec2, sparks: usize },
}
