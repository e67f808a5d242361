/// DuelState: the complete snapshot of the running show.
///
/// The choreography writes it, the step function advances its physics, and
/// the renderer reads it once per frame. Nothing in here knows about the
/// terminal; camera values are in world units and radians.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::actor::Actor;
use crate::domain::geom::{Vec2, LOGIC_HEIGHT, LOGIC_WIDTH};
use crate::domain::particles::ParticleManager;
use crate::domain::pose::Faction;

const STAR_COUNT: usize = 60;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Phase {
    OpeningCrawl,
    Establishment,
    FirstExchange,
    Escalation,
    WallDestruction,
    ForceSequence,
    Blackout,
    SpeedBlitz,
    RestoreLights,
    SaberAction,
    Climax,
    Resolution,
    FadeOut,
    Exit,
}

impl Phase {
    /// The phase that follows; `Exit` is terminal.
    pub fn next(self) -> Phase {
        match self {
            Phase::OpeningCrawl => Phase::Establishment,
            Phase::Establishment => Phase::FirstExchange,
            Phase::FirstExchange => Phase::Escalation,
            Phase::Escalation => Phase::WallDestruction,
            Phase::WallDestruction => Phase::ForceSequence,
            Phase::ForceSequence => Phase::Blackout,
            Phase::Blackout => Phase::SpeedBlitz,
            Phase::SpeedBlitz => Phase::RestoreLights,
            Phase::RestoreLights => Phase::SaberAction,
            Phase::SaberAction => Phase::Climax,
            Phase::Climax => Phase::Resolution,
            Phase::Resolution => Phase::FadeOut,
            Phase::FadeOut | Phase::Exit => Phase::Exit,
        }
    }
}

/// Where the camera looks, in world terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub focus: Vec2,
    pub zoom: f32,
    /// 0 = side-on, π/2 = overhead.
    pub pitch: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        CameraRig { focus: Vec2::new(40.0, 12.0), zoom: 1.0, pitch: 0.0 }
    }
}

pub struct DuelState {
    pub protagonist: Actor,
    pub antagonist: Actor,
    pub particles: ParticleManager,
    pub stars: Vec<Vec2>,
    pub camera: CameraRig,

    pub shake: bool,
    pub darkness: bool,
    pub flash: bool,
    pub wall_damaged: bool,
    pub subtitle: String,

    pub phase: Phase,
    /// Seconds since the current phase began (scaled time).
    pub phase_time: f32,
    /// Seconds since the show began (scaled time).
    pub elapsed: f32,
    /// Simulation speed multiplier; below 1 is slow motion.
    pub time_scale: f32,
}

impl DuelState {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Vec2::new(rng.gen::<f32>() * LOGIC_WIDTH, rng.gen::<f32>() * LOGIC_HEIGHT))
            .collect();

        DuelState {
            protagonist: Actor::new(Faction::Light, Vec2::new(20.0, 15.0), true),
            antagonist: Actor::new(Faction::Dark, Vec2::new(60.0, 15.0), false),
            // Offset so particle noise doesn't replay the star sequence.
            particles: ParticleManager::new(seed.wrapping_add(1)),
            stars,
            camera: CameraRig::default(),
            shake: false,
            darkness: false,
            flash: false,
            wall_damaged: false,
            subtitle: String::new(),
            phase: Phase::OpeningCrawl,
            phase_time: 0.0,
            elapsed: 0.0,
            time_scale: 1.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Exit
    }

    /// Keep the camera centered between the duelists.
    pub fn track_duelists(&mut self) {
        let mid = (self.protagonist.pos.x + self.antagonist.pos.x) / 2.0;
        self.camera.focus = Vec2::new(mid, 12.0);
    }
}
