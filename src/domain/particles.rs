/// Particle and effects populations.
///
/// `ParticleManager` owns every transient effect in the scene and the
/// generator that randomizes them. The choreography only calls the spawn
/// methods; stepping and pruning happen here.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::actor::Actor;
use super::debris::{Debris, DebrisOutcome, DEBRIS_GLYPHS};
use super::geom::{on_stage_x, Vec2, LOGIC_WIDTH};
use super::lightning::LightningBolt;

// ── Tuning ──

const SPARK_SPEED_MIN: f32 = 0.5;
const SPARK_SPEED_MAX: f32 = 2.0;
const SPARK_LIFT: f32 = 1.0;
const SPARK_LIFE_MIN: f32 = 0.1;
const SPARK_LIFE_MAX: f32 = 0.4;
const SPARK_GRAVITY: f32 = 20.0;
// Sparks travel further horizontally than vertically per unit velocity.
const SPARK_X_SCALE: f32 = 20.0;
const SPARK_Y_SCALE: f32 = 10.0;

const SMOKE_LIFE_MIN: f32 = 1.0;
const SMOKE_LIFE_MAX: f32 = 3.0;

const LIGHTNING_LIFE: f32 = 0.1;

const AMBIENT_SMOKE_CHANCE: f32 = 0.1;
const SMOLDER_CHANCE: f32 = 0.05;

const DEFLECT_SPARKS: usize = 8;
const LANDING_SPARKS: usize = 2;
const LANDING_SMOKE: usize = 3;

const FLIGHT_TIME_MIN: f32 = 1.0;
const FLIGHT_TIME_MAX: f32 = 1.5;

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
}

/// Permanent floor scar. Age drives its look.
#[derive(Clone, Copy, Debug)]
pub struct ScorchMark {
    pub pos: Vec2,
    pub age: f32,
}

/// Debris resolved during one `update_debris` call.
#[derive(Debug, Default)]
pub struct DebrisReport {
    pub deflected: Vec<Vec2>,
    pub landed: Vec<Vec2>,
}

impl DebrisReport {
    pub fn is_empty(&self) -> bool {
        self.deflected.is_empty() && self.landed.is_empty()
    }
}

pub struct ParticleManager {
    pub sparks: Vec<Particle>,
    pub smoke: Vec<Particle>,
    pub bolts: Vec<LightningBolt>,
    pub scorch_marks: Vec<ScorchMark>,
    pub debris: VecDeque<Debris>,
    rng: StdRng,
}

impl ParticleManager {
    pub fn new(seed: u64) -> Self {
        ParticleManager {
            sparks: Vec::new(),
            smoke: Vec::new(),
            bolts: Vec::new(),
            scorch_marks: Vec::new(),
            debris: VecDeque::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // ── Spawning ──

    pub fn spawn_sparks(&mut self, at: Vec2, count: usize) {
        self.sparks.reserve(count);
        for _ in 0..count {
            let angle = self.rng.gen::<f32>() * std::f32::consts::TAU;
            let speed = self.rng.gen_range(SPARK_SPEED_MIN..SPARK_SPEED_MAX);
            let life = self.rng.gen_range(SPARK_LIFE_MIN..SPARK_LIFE_MAX);
            self.sparks.push(Particle {
                pos: at,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - SPARK_LIFT),
                life,
            });
        }
    }

    /// Off-stage requests are dropped.
    pub fn spawn_smoke(&mut self, at: Vec2, count: usize) {
        if at.x < 0.0 || at.x > LOGIC_WIDTH {
            return;
        }
        for _ in 0..count {
            let pos = Vec2::new(at.x + self.rng.gen_range(-1.0..1.0), at.y);
            let vel = Vec2::new(self.rng.gen_range(-0.5..0.5), self.rng.gen_range(1.0..3.0));
            let life = self.rng.gen_range(SMOKE_LIFE_MIN..SMOKE_LIFE_MAX);
            self.smoke.push(Particle { pos, vel, life });
        }
    }

    /// Returns false (and adds nothing) when `at` is off stage.
    pub fn add_scorch_mark(&mut self, at: Vec2) -> bool {
        if !on_stage_x(at.x) {
            return false;
        }
        self.scorch_marks.push(ScorchMark { pos: at, age: 0.0 });
        true
    }

    pub fn spawn_lightning(&mut self, start: Vec2, end: Vec2) {
        let bolt = LightningBolt::generate(start, end, LIGHTNING_LIFE, &mut self.rng);
        self.bolts.push(bolt);
    }

    /// Throw a chunk from `from` that arrives at `target` after a random
    /// flight time. Returns the flight time.
    pub fn launch_debris(&mut self, from: Vec2, target: Vec2) -> f32 {
        let flight_time = self.rng.gen_range(FLIGHT_TIME_MIN..FLIGHT_TIME_MAX);
        let glyph = DEBRIS_GLYPHS[self.rng.gen_range(0..DEBRIS_GLYPHS.len())];
        self.debris.push_back(Debris::aimed(from, target, flight_time, glyph));
        flight_time
    }

    // ── Stepping ──

    /// Advance sparks, smoke, bolts and scorch marks by `dt`.
    pub fn update(&mut self, dt: f32) {
        self.sparks.retain_mut(|p| {
            p.pos.x += p.vel.x * dt * SPARK_X_SCALE;
            p.pos.y += p.vel.y * dt * SPARK_Y_SCALE;
            p.vel.y += SPARK_GRAVITY * dt;
            p.life -= dt;
            p.life > 0.0
        });

        self.smoke.retain_mut(|p| {
            p.pos.y -= p.vel.y * dt;
            p.pos.x += p.vel.x * dt;
            p.life -= dt;
            p.life > 0.0 && p.pos.x >= 0.0 && p.pos.x <= LOGIC_WIDTH
        });

        // Still-smoldering floor.
        if self.rng.gen::<f32>() < AMBIENT_SMOKE_CHANCE {
            let mut puffs = Vec::new();
            for mark in &self.scorch_marks {
                if self.rng.gen::<f32>() < SMOLDER_CHANCE {
                    puffs.push(mark.pos);
                }
            }
            for at in puffs {
                self.spawn_smoke(at, 1);
            }
        }

        self.bolts.retain_mut(|b| {
            b.life -= dt;
            b.life > 0.0
        });

        for mark in &mut self.scorch_marks {
            mark.age += dt;
        }
    }

    /// Advance debris against `defender`'s saber and the floor.
    pub fn update_debris(&mut self, dt: f32, defender: &Actor) -> DebrisReport {
        let mut report = DebrisReport::default();
        for chunk in self.debris.iter_mut() {
            match chunk.step(dt, defender) {
                DebrisOutcome::Flying => {}
                DebrisOutcome::Deflected => report.deflected.push(chunk.pos),
                DebrisOutcome::Landed => report.landed.push(chunk.pos),
            }
        }

        for &at in &report.deflected {
            self.spawn_sparks(at, DEFLECT_SPARKS);
        }
        for &at in &report.landed {
            if self.add_scorch_mark(at) {
                self.spawn_sparks(at, LANDING_SPARKS);
                self.spawn_smoke(at, LANDING_SMOKE);
            }
        }

        while self
            .debris
            .front()
            .is_some_and(|d| !d.active && d.is_off_screen())
        {
            self.debris.pop_front();
        }

        report
    }

    pub fn active_debris(&self) -> impl Iterator<Item = &Debris> {
        self.debris.iter().filter(|d| d.active)
    }
}
