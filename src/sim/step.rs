/// The step function: advances the show by one fixed tick.
///
/// Processing order:
///   1. Time scaling (slow motion)
///   2. Actor snapshots (prev position / pose, for blur and trails)
///   3. Choreography (poses, positions, camera, spawns)
///   4. Cape follow
///   5. Debris flight, deflection and landing
///   6. Sparks, smoke, bolts and scorch marks

use super::choreography::Choreographer;
use super::event::SceneEvent;
use super::world::DuelState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(state: &mut DuelState, director: &mut Choreographer, dt: f32) -> Vec<SceneEvent> {
    if state.is_finished() {
        return vec![];
    }

    let mut events: Vec<SceneEvent> = Vec::new();

    let dt = dt * state.time_scale;
    state.elapsed += dt;
    state.phase_time += dt;

    state.protagonist.save_state();
    state.antagonist.save_state();

    director.direct(state, &mut events);

    state.antagonist.update_cape(dt);
    resolve_debris(state, dt, &mut events);
    state.particles.update(dt);

    events
}

// ══════════════════════════════════════════════════════════════
// Debris
// ══════════════════════════════════════════════════════════════

fn resolve_debris(state: &mut DuelState, dt: f32, events: &mut Vec<SceneEvent>) {
    let report = state.particles.update_debris(dt, &state.protagonist);
    if report.is_empty() {
        return;
    }

    if !report.deflected.is_empty() {
        // Each parry jolts the camera for a frame.
        state.shake = true;
    }
    events.extend(report.deflected.into_iter().map(|at| SceneEvent::DebrisDeflected { at }));
    events.extend(report.landed.into_iter().map(|at| SceneEvent::DebrisLanded { at }));
}
