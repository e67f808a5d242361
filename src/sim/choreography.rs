/// The choreography driver: a scripted phase machine that poses, moves and
/// lights the two duelists.
///
/// Each phase is a function of its own elapsed time (`DuelState::phase_time`).
/// Handlers overwrite whatever they own every step, so a phase can be
/// entered at any moment (skip) and still look right one step later.
/// Random beats (debris, lightning, blitz positions) draw from the driver's
/// own seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::actor::{Actor, MAX_BLADE};
use crate::domain::geom::{lerp, Vec2};
use crate::domain::pose::PoseId;

use super::event::SceneEvent;
use super::world::{DuelState, Phase};

const CRAWL_DURATION: f32 = 22.0;
const BLITZ_INTERVAL: f32 = 0.35;
const BLITZ_CLASHES: u32 = 12;
/// Rows per second of blade growth while igniting.
const IGNITE_RATE: f32 = 12.0;

pub struct Choreographer {
    rng: StdRng,
    blitz_count: u32,
}

impl Choreographer {
    pub fn new(seed: u64) -> Self {
        Choreographer { rng: StdRng::seed_from_u64(seed.wrapping_add(2)), blitz_count: 0 }
    }

    /// Run the current phase's script for this step.
    pub fn direct(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        match s.phase {
            Phase::OpeningCrawl => self.opening_crawl(s, events),
            Phase::Establishment => self.establishment(s, events),
            Phase::FirstExchange => self.first_exchange(s, events),
            Phase::Escalation => self.escalation(s, events),
            Phase::WallDestruction => self.wall_destruction(s, events),
            Phase::ForceSequence => self.force_sequence(s, events),
            Phase::Blackout => self.blackout(s, events),
            Phase::SpeedBlitz => self.speed_blitz(s, events),
            Phase::RestoreLights => self.restore_lights(s, events),
            Phase::SaberAction => self.saber_action(s, events),
            Phase::Climax => self.climax(s, events),
            Phase::Resolution => self.resolution(s, events),
            Phase::FadeOut => self.fade_out(s, events),
            Phase::Exit => {}
        }
    }

    /// Jump straight to the next phase.
    pub fn skip(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        if s.phase == Phase::Exit {
            return;
        }
        s.subtitle.clear();
        s.shake = false;
        s.flash = false;
        let next = s.phase.next();
        self.enter(s, next, events);
    }

    fn enter(&mut self, s: &mut DuelState, to: Phase, events: &mut Vec<SceneEvent>) {
        let from = s.phase;
        if from == to {
            return;
        }
        s.phase = to;
        s.phase_time = 0.0;
        events.push(SceneEvent::PhaseChanged { from, to });

        if to > Phase::Establishment && to < Phase::Resolution {
            // Arriving by skip can bypass the ignition beats.
            ensure_lit(&mut s.protagonist);
            ensure_lit(&mut s.antagonist);
        }
        match to {
            Phase::SpeedBlitz => self.blitz_count = 0,
            Phase::Resolution => {
                s.camera.pitch = 0.0;
                s.camera.zoom = 1.0;
                s.time_scale = 1.0;
                s.darkness = false;
            }
            _ => {}
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Intro
    // ═══════════════════════════════════════════════════════════

    fn opening_crawl(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        if s.phase_time > CRAWL_DURATION {
            self.enter(s, Phase::Establishment, events);
        }
    }

    fn establishment(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if t < 0.5 {
            set_poses(s, PoseId::Idle, PoseId::Idle);
            s.subtitle.clear();
        } else if t < 1.0 {
            s.protagonist.pose = PoseId::ReachHilt;
        } else if t < 1.5 {
            ignite(&mut s.protagonist, t - 1.0);
            s.protagonist.pose = PoseId::Idle;
        } else if t < 3.0 {
            say(s, "JEDI: Surrender! The system is secure.");
        }

        if t > 1.2 && t < 1.7 {
            s.antagonist.pose = PoseId::ReachHilt;
        } else if t > 1.7 && t < 2.0 {
            ignite(&mut s.antagonist, t - 1.7);
            s.antagonist.pose = PoseId::Idle;
        }

        if t > 3.0 && t < 4.5 {
            say(s, "SITH: Peace is a lie... there is only Bugs.");
        }
        if t > 4.5 {
            s.subtitle.clear();
            self.enter(s, Phase::FirstExchange, events);
        }
    }

    fn first_exchange(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if t < 1.0 {
            place(s, lerp(20.0, 32.0, t), lerp(60.0, 48.0, t));
            let walk = PoseId::walk_frame(t, 6.0);
            set_poses(s, walk, walk);
        } else if t < 1.3 {
            place(s, 32.0, 48.0);
            set_poses(s, PoseId::Idle, PoseId::Idle);
        } else if t < 1.5 {
            place(s, 38.0, 42.0);
            set_poses(s, PoseId::Anticipation, PoseId::Guard);
            s.camera.zoom = 1.2;
        } else if t < 1.7 {
            set_poses(s, PoseId::Attack, PoseId::Attack);
            if t < 1.55 {
                clash(s, Vec2::new(40.0, 12.0), 3, events);
                s.shake = true;
            }
            s.camera.zoom = 1.4;
        } else {
            place(s, 32.0, 48.0);
            set_poses(s, PoseId::Idle, PoseId::Idle);
            s.shake = false;
            s.camera.zoom = 1.0;
        }

        s.track_duelists();
        if t > 3.0 {
            self.enter(s, Phase::Escalation, events);
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Escalation: eight scripted beats
    // ═══════════════════════════════════════════════════════════

    fn escalation(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if (0.2..1.0).contains(&t) {
            // Beat 1: mutual strike.
            if t < 0.5 {
                set_poses(s, PoseId::Anticipation, PoseId::Anticipation);
            } else if t < 0.7 {
                place(s, 35.0, 45.0);
                set_poses(s, PoseId::Attack, PoseId::Attack);
            } else {
                clash(s, Vec2::new(40.0, 13.0), 1, events);
            }
        } else if (1.2..1.7).contains(&t) {
            // Beat 2: the dark side presses.
            if t < 1.5 {
                set_poses(s, PoseId::Guard, PoseId::Anticipation);
            } else {
                place(s, 33.0, 47.0);
                set_poses(s, PoseId::Guard, PoseId::Attack);
            }
        } else if (2.2..3.2).contains(&t) {
            // Beat 3: heavy clash into a lock.
            if t < 2.5 {
                set_poses(s, PoseId::Anticipation, PoseId::Anticipation);
                s.camera.zoom = 1.3;
            } else if t < 2.7 {
                place(s, 38.0, 42.0);
                set_poses(s, PoseId::Attack, PoseId::Attack);
                clash(s, Vec2::new(40.0, 10.0), 5, events);
                s.shake = true;
                s.camera.zoom = 1.5;
                if t < 2.55 {
                    s.particles.add_scorch_mark(Vec2::new(40.0, 16.0));
                }
            } else {
                set_poses(s, PoseId::Lock, PoseId::Lock);
                place(s, 36.0, 44.0);
                s.shake = false;
                s.camera.zoom = 1.0;
            }
        } else if (3.2..4.2).contains(&t) {
            // Beat 4: break apart.
            s.shake = false;
            s.camera.zoom = 1.0;
            let p = t - 3.2;
            place(s, lerp(36.0, 28.0, p), lerp(44.0, 52.0, p));
            set_poses(s, PoseId::Guard, PoseId::Guard);
        } else if (4.2..5.5).contains(&t) {
            // Beat 5: three-hit combo.
            if t < 4.5 {
                set_poses(s, PoseId::Anticipation, PoseId::Anticipation);
            } else if t < 4.7 {
                place(s, 38.0, 42.0);
                set_poses(s, PoseId::Attack, PoseId::Guard);
                if t < 4.55 {
                    clash(s, Vec2::new(40.0, 10.0), 2, events);
                    s.shake = true;
                }
            } else if t < 4.9 {
                set_poses(s, PoseId::Crouch, PoseId::Attack);
                if t < 4.75 {
                    clash(s, Vec2::new(40.0, 14.0), 2, events);
                }
            } else if t < 5.1 {
                set_poses(s, PoseId::Attack, PoseId::Attack);
                if t < 4.95 {
                    clash(s, Vec2::new(40.0, 12.0), 2, events);
                    s.shake = true;
                }
            } else {
                set_poses(s, PoseId::Guard, PoseId::Guard);
                s.shake = false;
            }
        } else if (5.5..7.0).contains(&t) {
            // Beat 6: the Jedi vaults over a low sweep.
            if t < 6.5 {
                let jp = t - 5.5;
                s.antagonist.pose = PoseId::Dash;
                s.antagonist.pos.x = lerp(42.0, 30.0, jp);
                s.protagonist.pose = PoseId::Jump;
                s.protagonist.pos.y = 15.0 - (jp * std::f32::consts::PI).sin() * 9.0;
                s.protagonist.pos.x = lerp(38.0, 50.0, jp);
            } else {
                s.protagonist.pos = Vec2::new(50.0, 15.0);
                s.protagonist.facing_right = false;
                s.antagonist.pos.x = 30.0;
                s.antagonist.facing_right = true;
                set_poses(s, PoseId::Crouch, PoseId::Crouch);
            }
        } else if (7.0..8.0).contains(&t) {
            // Beat 7: sides swapped, strike again.
            if t < 7.3 {
                set_poses(s, PoseId::Anticipation, PoseId::Anticipation);
            } else {
                place(s, 42.0, 38.0);
                set_poses(s, PoseId::Attack, PoseId::Attack);
                if t < 7.35 {
                    clash(s, Vec2::new(40.0, 12.0), 5, events);
                    s.shake = true;
                    s.camera.zoom = 1.4;
                }
            }
        } else if (8.0..9.0).contains(&t) {
            // Beat 8: leap back to the starting sides.
            s.shake = false;
            s.camera.zoom = 1.0;
            let rp = t - 8.0;
            place(s, lerp(42.0, 25.0, rp), lerp(38.0, 55.0, rp));
            if rp > 0.5 {
                face_off(s);
            }
            set_poses(s, PoseId::Jump, PoseId::Jump);
        }

        s.track_duelists();
        if t > 9.0 {
            self.enter(s, Phase::WallDestruction, events);
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Wall destruction and the debris barrage
    // ═══════════════════════════════════════════════════════════

    fn wall_destruction(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if t < 1.5 {
            set_poses(s, PoseId::Guard, PoseId::Cast);
            face_off(s);
            if t > 0.2 {
                say(s, "SITH: BREAK!");
            }
            if self.rng.gen::<f32>() > 0.7 {
                let y = 5.0 + self.rng.gen::<f32>() * 10.0;
                s.particles.spawn_sparks(Vec2::new(78.0, y), 1);
            }
            if t > 0.5 {
                s.shake = true;
            }
        } else if t < 5.5 {
            s.subtitle.clear();
            s.shake = false;
            s.wall_damaged = true;

            if self.rng.gen::<f32>() > 0.8 {
                let from = Vec2::new(78.0, 2.0 + self.rng.gen::<f32>() * 10.0);
                let chest = Vec2::new(s.protagonist.pos.x, s.protagonist.pos.y - 2.0);
                let flight_time = s.particles.launch_debris(from, chest);
                s.particles.spawn_sparks(from, 3);
                events.push(SceneEvent::DebrisLaunched { from, flight_time });
            }
            defend(s);
        } else if t < 6.5 {
            s.shake = false;
            set_poses(s, PoseId::Idle, PoseId::Idle);
        } else {
            self.enter(s, Phase::ForceSequence, events);
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Force lightning
    // ═══════════════════════════════════════════════════════════

    fn force_sequence(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if t < 0.5 {
            set_poses(s, PoseId::Idle, PoseId::Cast);
        } else if t < 2.5 {
            set_poses(s, PoseId::Guard, PoseId::Cast);
            if self.rng.gen::<f32>() > 0.3 {
                let from = Vec2::new(s.antagonist.pos.x - 2.0, s.antagonist.pos.y - 3.0);
                let to = Vec2::new(s.protagonist.pos.x + 1.0, s.protagonist.pos.y - 3.0);
                s.particles.spawn_lightning(from, to);
                events.push(SceneEvent::LightningStruck { from, to });
            }
            s.protagonist.pos.x = 35.0 - 5.0 * (t - 0.5);
            if self.rng.gen::<f32>() > 0.5 {
                let at = Vec2::new(s.protagonist.pos.x + 2.0, s.protagonist.pos.y - 3.0);
                s.particles.spawn_sparks(at, 1);
            }
        } else if t < 3.5 {
            set_poses(s, PoseId::Stagger, PoseId::Cast);
            s.protagonist.pos.x = 25.0 - 15.0 * (t - 2.5);
        } else if t < 4.5 {
            set_poses(s, PoseId::Jump, PoseId::Idle);
            let jp = t - 3.5;
            s.protagonist.pos.x = 10.0 + 28.0 * jp;
            s.protagonist.pos.y = 15.0 - 8.0 * 4.0 * jp * (1.0 - jp);
        } else if t < 4.8 {
            s.protagonist.pos.y = 15.0;
            set_poses(s, PoseId::Crouch, PoseId::Anticipation);
        } else {
            self.enter(s, Phase::Blackout, events);
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Blackout and the speed blitz
    // ═══════════════════════════════════════════════════════════

    fn blackout(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;
        if (0.5..1.5).contains(&t) {
            s.darkness = true;
            s.antagonist.pose = PoseId::Cast;
        } else if t >= 1.5 {
            self.enter(s, Phase::SpeedBlitz, events);
        }
    }

    fn speed_blitz(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let step = (s.phase_time / BLITZ_INTERVAL) as u32;
        if step <= self.blitz_count {
            s.shake = false;
            return;
        }
        self.blitz_count = step;
        if self.blitz_count > BLITZ_CLASHES {
            self.enter(s, Phase::RestoreLights, events);
            return;
        }

        let cx = 40.0 + self.rng.gen::<f32>() * 30.0 - 15.0;
        let cy = 12.0 + self.rng.gen::<f32>() * 8.0 - 4.0;
        let jedi_left = self.rng.gen::<f32>() > 0.3;
        let side = if jedi_left { 1.0 } else { -1.0 };

        s.protagonist.pos = Vec2::new(cx - 2.0 * side, cy);
        s.antagonist.pos = Vec2::new(cx + 2.0 * side, cy);
        s.protagonist.facing_right = jedi_left;
        s.antagonist.facing_right = !jedi_left;

        let clash_type = if self.blitz_count == 4 || self.blitz_count == 9 {
            3
        } else {
            self.rng.gen_range(0..4)
        };
        let at = Vec2::new(cx, cy);
        match clash_type {
            0 if jedi_left => set_poses(s, PoseId::Attack, PoseId::Guard),
            0 => set_poses(s, PoseId::Guard, PoseId::Attack),
            1 if jedi_left => set_poses(s, PoseId::Crouch, PoseId::Anticipation),
            1 => set_poses(s, PoseId::Anticipation, PoseId::Crouch),
            2 => set_poses(s, PoseId::Anticipation, PoseId::Anticipation),
            _ => {
                s.protagonist.pos.x = cx - 1.5 * side;
                s.antagonist.pos.x = cx + 1.5 * side;
                set_poses(s, PoseId::Lock, PoseId::Lock);
                clash(s, at, 8, events);
            }
        }
        if clash_type != 3 {
            clash(s, at, 3, events);
        }
        s.shake = true;
    }

    fn restore_lights(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        s.darkness = false;
        s.shake = false;
        s.protagonist.pos = Vec2::new(20.0, 15.0);
        s.antagonist.pos = Vec2::new(60.0, 15.0);
        face_off(s);
        set_poses(s, PoseId::Guard, PoseId::Guard);
        self.enter(s, Phase::SaberAction, events);
    }

    // ═══════════════════════════════════════════════════════════
    // Acrobatic saber sequence
    // ═══════════════════════════════════════════════════════════

    fn saber_action(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if t < 0.2 {
            set_poses(s, PoseId::Crouch, PoseId::Idle);
        } else if t < 1.0 {
            set_poses(s, PoseId::Jump, PoseId::Idle);
            let p = (t - 0.2) / 0.8;
            s.protagonist.pos.x = 38.0 + 10.0 * p;
            s.protagonist.pos.y = 15.0 - 5.0 * 4.0 * p * (1.0 - p);
        } else if t < 1.5 {
            s.protagonist.pos = Vec2::new(48.0, 15.0);
            set_poses(s, PoseId::Attack, PoseId::Guard);
        } else if t < 2.0 {
            set_poses(s, PoseId::Anticipation, PoseId::Attack);
        } else if t < 3.0 {
            set_poses(s, PoseId::Stagger, PoseId::Lock);
            let p = t - 2.0;
            s.protagonist.pos.x = 48.0 - 30.0 * p;
            s.antagonist.pos.x = 60.0 - 10.0 * p;
        } else if t < 3.2 {
            set_poses(s, PoseId::Crouch, PoseId::Idle);
        } else if t < 4.5 {
            set_poses(s, PoseId::Jump, PoseId::Idle);
            let p = (t - 3.2) / 1.3;
            s.protagonist.pos.x = 18.0 + 50.0 * p;
            s.protagonist.pos.y = 15.0 - 12.0 * 4.0 * p * (1.0 - p);
            s.protagonist.facing_right = p <= 0.5;
        } else if t < 5.5 {
            s.protagonist.pos = Vec2::new(60.0, 8.0);
            s.antagonist.facing_right = true;
            set_poses(s, PoseId::Suspended, PoseId::Cast);
        } else if t < 6.0 {
            set_poses(s, PoseId::Suspended, PoseId::Attack);
            if t > 5.8 {
                clash(s, Vec2::new(60.0, 8.0), 2, events);
            }
        } else if t < 7.0 {
            s.protagonist.pos.y = 15.0;
            set_poses(s, PoseId::Dash, PoseId::Anticipation);
            s.protagonist.pos.x = 68.0 - 20.0 * (t - 6.0);
        } else if t < 7.5 {
            set_poses(s, PoseId::Attack, PoseId::Anticipation);
        } else if t < 8.0 {
            face_off(s);
            place(s, 38.0, 42.0);
            set_poses(s, PoseId::Idle, PoseId::Idle);
        } else {
            self.enter(s, Phase::Climax, events);
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Climax and ending
    // ═══════════════════════════════════════════════════════════

    fn climax(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        if t < 1.5 {
            s.time_scale = 1.0;
            place(s, 38.0, 42.0);
            set_poses(s, PoseId::Lock, PoseId::Lock);
            s.shake = true;
            s.camera.zoom = 1.2;
            if self.rng.gen::<f32>() > 0.6 {
                clash(s, Vec2::new(40.0, 11.0), 1, events);
            }
        } else if t < 3.2 {
            // Slow-motion orbit up and over the lock.
            s.time_scale = 0.3;
            s.camera.zoom = 1.3;
            s.shake = false;
            let sp = (t - 1.5) / 1.7;
            s.camera.pitch = (sp * std::f32::consts::PI).sin() * 1.4;
            s.subtitle = format!("CAM: {:.0}°", s.camera.pitch.to_degrees());
        } else if t < 6.2 {
            s.camera.pitch = 0.0;
            s.time_scale = 1.0;
            place(s, 39.0, 42.0);
            set_poses(s, PoseId::Dash, PoseId::Stagger);
            if t > 3.5 && t < 6.0 {
                say(s, "JEDI: It is finished.");
            } else {
                s.subtitle.clear();
            }
            s.shake = true;
            if t < 3.8 {
                clash(s, Vec2::new(41.0, 11.0), 8, events);
            }
            s.flash = t < 3.3;
        } else if t < 7.5 {
            s.subtitle.clear();
            s.flash = false;
            s.shake = false;
            s.camera.zoom = 1.0;
            s.protagonist.pose = PoseId::Guard;
            s.protagonist.pos.x = 34.0;
            s.antagonist.pose = PoseId::Kneel;
            s.antagonist.set_saber(false, 0);
        } else {
            self.enter(s, Phase::Resolution, events);
        }
    }

    fn resolution(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        let t = s.phase_time;

        s.flash = false;
        s.shake = false;
        s.camera.zoom = 1.0;
        s.time_scale = 1.0;
        set_poses(s, PoseId::Idle, PoseId::Kneel);
        s.antagonist.set_saber(false, 0);

        if t > 2.0 {
            s.protagonist.set_saber(false, 0);
            say(s, "May the Source be with you.");
        }
        if t > 4.0 {
            self.enter(s, Phase::FadeOut, events);
        }
    }

    fn fade_out(&mut self, s: &mut DuelState, events: &mut Vec<SceneEvent>) {
        // No sabers are lit, so the mask leaves only the closing line.
        s.darkness = true;
        if s.phase_time > 4.0 {
            self.enter(s, Phase::Exit, events);
        }
    }
}

// ── Helpers ──

fn set_poses(s: &mut DuelState, protagonist: PoseId, antagonist: PoseId) {
    s.protagonist.pose = protagonist;
    s.antagonist.pose = antagonist;
}

fn place(s: &mut DuelState, protagonist_x: f32, antagonist_x: f32) {
    s.protagonist.pos.x = protagonist_x;
    s.antagonist.pos.x = antagonist_x;
}

/// Protagonist faces right, antagonist left.
fn face_off(s: &mut DuelState) {
    s.protagonist.facing_right = true;
    s.antagonist.facing_right = false;
}

fn say(s: &mut DuelState, line: &str) {
    if s.subtitle != line {
        s.subtitle.clear();
        s.subtitle.push_str(line);
    }
}

fn clash(s: &mut DuelState, at: Vec2, sparks: usize, events: &mut Vec<SceneEvent>) {
    s.particles.spawn_sparks(at, sparks);
    events.push(SceneEvent::Impact { at, sparks });
}

/// Grow the blade for `since` seconds of ignition.
fn ignite(actor: &mut Actor, since: f32) {
    let length = 1 + (since.max(0.0) * IGNITE_RATE) as u8;
    actor.set_saber(true, length);
}

fn ensure_lit(actor: &mut Actor) {
    if !actor.saber_active || actor.saber_length < MAX_BLADE {
        actor.set_saber(true, MAX_BLADE);
    }
}

/// Pick the protagonist's defence against the nearest incoming chunk.
fn defend(s: &mut DuelState) {
    let me = s.protagonist.pos;
    let mut closest = f32::MAX;
    let mut threat = None;
    for chunk in s.particles.active_debris() {
        let dist = chunk.pos.x - me.x;
        if dist > -2.0 && dist < closest {
            closest = dist;
            threat = Some(chunk.pos);
        }
    }

    match threat {
        Some(at) if closest < 6.0 => {
            let swing = if at.y < me.y - 3.0 { PoseId::Attack } else { PoseId::Crouch };
            set_poses(s, swing, PoseId::Cast);
        }
        Some(_) if closest < 12.0 => set_poses(s, PoseId::Anticipation, PoseId::Cast),
        _ => set_poses(s, PoseId::Guard, PoseId::Cast),
    }
}
