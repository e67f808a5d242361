/// Pose table: immutable body-part layouts keyed by (pose, faction).
///
/// Each pose is nine part descriptors, each an (dx, dy, glyph) offset from
/// the actor's anchor (the feet). The whole table is built at compile time
/// from a shared base silhouette plus per-pose overrides, so renderers only
/// ever do a lookup.
///
/// `blade` is a direction, not a position: the tip sits at
/// `hand + blade * blade_length`. Its glyph is informational only; the
/// renderer picks the blade glyph from the on-screen slope.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BodyPart {
    pub dx: i32,
    pub dy: i32,
    pub glyph: char,
}

impl BodyPart {
    pub const fn new(dx: i32, dy: i32, glyph: char) -> Self {
        BodyPart { dx, dy, glyph }
    }

    /// Part with no glyph of its own (hand anchor, hidden limbs).
    pub const fn anchor(dx: i32, dy: i32) -> Self {
        BodyPart { dx, dy, glyph: ' ' }
    }

    pub fn is_hidden(&self) -> bool {
        self.glyph == ' '
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pose {
    pub head: BodyPart,
    pub torso_top: BodyPart,
    pub torso_bottom: BodyPart,
    pub leg_l: BodyPart,
    pub leg_r: BodyPart,
    pub arm_l: BodyPart,
    pub arm_r: BodyPart,
    pub hand: BodyPart,
    pub blade: BodyPart,
}

/// Which side an actor fights for. Drives glyph choice and colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Faction {
    Light,
    Dark,
}

pub const POSE_COUNT: usize = 15;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PoseId {
    Idle = 0,
    Attack = 1,
    Guard = 2,
    Lock = 3,
    Kneel = 4,
    Anticipation = 5,
    Cast = 6,
    Stagger = 7,
    Jump = 8,
    Suspended = 9,
    Dash = 10,
    Crouch = 11,
    ReachHilt = 12,
    WalkA = 13,
    WalkB = 14,
}

impl PoseId {
    pub const ALL: [PoseId; POSE_COUNT] = [
        PoseId::Idle,
        PoseId::Attack,
        PoseId::Guard,
        PoseId::Lock,
        PoseId::Kneel,
        PoseId::Anticipation,
        PoseId::Cast,
        PoseId::Stagger,
        PoseId::Jump,
        PoseId::Suspended,
        PoseId::Dash,
        PoseId::Crouch,
        PoseId::ReachHilt,
        PoseId::WalkA,
        PoseId::WalkB,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Poses in which the blade sweeps the space in front of the actor.
    pub fn is_attack(self) -> bool {
        matches!(self, PoseId::Attack | PoseId::Crouch)
    }

    /// Walk cycle frame for an elapsed time, two frames per cycle.
    pub fn walk_frame(t: f32, frames_per_second: f32) -> PoseId {
        if (t * frames_per_second) as i64 % 2 == 0 {
            PoseId::WalkA
        } else {
            PoseId::WalkB
        }
    }
}

/// Look up the layout for a pose as drawn by a given faction.
pub fn lookup(id: PoseId, faction: Faction) -> &'static Pose {
    &POSE_TABLE[faction_slot(faction)][id.index()]
}

// ── Table construction (compile time) ──

static POSE_TABLE: [[Pose; POSE_COUNT]; 2] = build_table();

const fn faction_slot(faction: Faction) -> usize {
    match faction {
        Faction::Light => 0,
        Faction::Dark => 1,
    }
}

const fn head_glyph(faction: Faction) -> char {
    match faction {
        Faction::Light => '●',
        Faction::Dark => '⍙',
    }
}

const fn base(faction: Faction) -> Pose {
    let (top, bottom) = match faction {
        Faction::Light => ('▓', '≡'),
        Faction::Dark => ('▒', '▓'),
    };
    Pose {
        head: BodyPart::new(0, -4, head_glyph(faction)),
        torso_top: BodyPart::new(0, -3, top),
        torso_bottom: BodyPart::new(0, -2, bottom),
        leg_l: BodyPart::new(-1, -1, '╱'),
        leg_r: BodyPart::new(1, -1, '╲'),
        arm_l: BodyPart::new(-1, -3, '╱'),
        arm_r: BodyPart::new(1, -3, '╲'),
        hand: BodyPart::anchor(1, -3),
        blade: BodyPart::new(0, -1, '│'),
    }
}

const fn build(id: PoseId, faction: Faction) -> Pose {
    let b = base(faction);
    let h = head_glyph(faction);
    match id {
        PoseId::Idle => match faction {
            Faction::Light => Pose { blade: BodyPart::new(1, -1, '╱'), ..b },
            Faction::Dark => Pose { blade: BodyPart::new(1, 1, '╲'), ..b },
        },
        PoseId::Attack => Pose {
            head: BodyPart::new(2, -4, h),
            torso_top: BodyPart::new(1, -3, '▓'),
            leg_l: BodyPart::new(-2, -1, '╱'),
            leg_r: BodyPart::new(2, -1, '╲'),
            arm_l: BodyPart::new(-1, -3, '╲'),
            arm_r: BodyPart::new(2, -4, '╱'),
            hand: BodyPart::anchor(2, -4),
            blade: BodyPart::new(1, -1, '╱'),
            ..b
        },
        PoseId::Guard => Pose {
            head: BodyPart::new(-1, -4, h),
            torso_top: BodyPart::new(-1, -3, '▓'),
            leg_l: BodyPart::new(-2, -1, '╱'),
            leg_r: BodyPart::new(1, -1, '╲'),
            arm_r: BodyPart::new(0, -3, '│'),
            hand: BodyPart::anchor(0, -3),
            blade: BodyPart::new(-1, -1, '╲'),
            ..b
        },
        PoseId::Lock => Pose {
            head: BodyPart::new(1, -4, h),
            torso_top: BodyPart::new(1, -3, '█'),
            leg_l: BodyPart::new(-2, -1, '╱'),
            leg_r: BodyPart::new(2, -1, '╲'),
            arm_r: BodyPart::new(1, -3, '─'),
            hand: BodyPart::anchor(1, -3),
            blade: BodyPart::new(1, 0, '─'),
            ..b
        },
        PoseId::Kneel => Pose {
            head: BodyPart::new(1, -2, h),
            torso_top: BodyPart::new(0, -1, '▄'),
            torso_bottom: BodyPart::anchor(0, 0),
            leg_l: BodyPart::anchor(0, -1),
            leg_r: BodyPart::new(2, -1, '▄'),
            arm_l: BodyPart::anchor(0, 0),
            arm_r: BodyPart::anchor(0, 0),
            ..b
        },
        PoseId::Anticipation => Pose {
            head: BodyPart::new(-1, -4, h),
            torso_top: BodyPart::new(-1, -3, '▓'),
            arm_r: BodyPart::new(-2, -4, '╲'),
            hand: BodyPart::anchor(-2, -4),
            blade: BodyPart::new(-1, -1, '╲'),
            ..b
        },
        PoseId::Cast => Pose {
            torso_top: BodyPart::new(0, -3, '▓'),
            arm_l: BodyPart::new(2, -3, '─'),
            arm_r: BodyPart::new(-1, -2, '╲'),
            hand: BodyPart::anchor(-1, -2),
            blade: BodyPart::new(1, 1, '╲'),
            ..b
        },
        PoseId::Stagger => Pose {
            head: BodyPart::new(-2, -4, h),
            torso_top: BodyPart::new(-1, -3, '╲'),
            leg_l: BodyPart::new(-2, -1, '╱'),
            leg_r: BodyPart::new(1, -1, '╱'),
            arm_l: BodyPart::new(-2, -3, '╱'),
            arm_r: BodyPart::new(0, -3, '╲'),
            hand: BodyPart::anchor(0, -3),
            blade: BodyPart::new(-1, -1, '╲'),
            ..b
        },
        PoseId::Jump => Pose {
            head: BodyPart::new(1, -4, h),
            torso_top: BodyPart::new(0, -3, '▓'),
            leg_l: BodyPart::new(-1, -2, '─'),
            leg_r: BodyPart::new(1, -2, '─'),
            hand: BodyPart::anchor(1, -3),
            blade: BodyPart::new(-1, -1, '╱'),
            ..b
        },
        PoseId::Suspended => Pose {
            torso_top: BodyPart::new(0, -3, '▓'),
            leg_l: BodyPart::new(-1, -1, '│'),
            leg_r: BodyPart::new(1, -1, '│'),
            arm_l: BodyPart::new(-2, -3, '╲'),
            arm_r: BodyPart::new(2, -3, '╱'),
            hand: BodyPart::anchor(2, -3),
            blade: BodyPart::new(0, -1, '│'),
            ..b
        },
        PoseId::Dash => Pose {
            head: BodyPart::new(3, -3, h),
            torso_top: BodyPart::new(2, -2, '─'),
            torso_bottom: BodyPart::new(0, -2, '─'),
            leg_l: BodyPart::new(-2, -2, '='),
            leg_r: BodyPart::new(-1, -2, '='),
            arm_l: BodyPart::new(0, -2, '─'),
            arm_r: BodyPart::new(3, -2, '─'),
            hand: BodyPart::anchor(3, -2),
            blade: BodyPart::new(1, 0, '─'),
            ..b
        },
        PoseId::Crouch => Pose {
            head: BodyPart::new(0, -2, h),
            torso_top: BodyPart::new(0, -1, '▓'),
            torso_bottom: BodyPart::anchor(0, 0),
            leg_l: BodyPart::new(-1, 0, '_'),
            leg_r: BodyPart::new(1, 0, '_'),
            arm_l: BodyPart::new(-1, -1, '╱'),
            arm_r: BodyPart::new(1, -1, '╲'),
            hand: BodyPart::anchor(1, -1),
            blade: BodyPart::new(1, -1, '╱'),
            ..b
        },
        PoseId::ReachHilt => Pose {
            arm_r: BodyPart::new(-1, -2, '╱'),
            hand: BodyPart::anchor(-1, -2),
            ..b
        },
        PoseId::WalkA => b,
        PoseId::WalkB => Pose {
            leg_l: BodyPart::new(1, -1, '╲'),
            leg_r: BodyPart::new(-1, -1, '╱'),
            ..b
        },
    }
}

const fn build_table() -> [[Pose; POSE_COUNT]; 2] {
    let mut table = [[base(Faction::Light); POSE_COUNT], [base(Faction::Dark); POSE_COUNT]];
    let mut i = 0;
    while i < POSE_COUNT {
        table[0][i] = build(PoseId::ALL[i], Faction::Light);
        table[1][i] = build(PoseId::ALL[i], Faction::Dark);
        i += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_discriminants() {
        for (i, id) in PoseId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn factions_differ_only_in_glyphs() {
        for id in PoseId::ALL {
            let light = lookup(id, Faction::Light);
            let dark = lookup(id, Faction::Dark);
            assert_eq!((light.head.dx, light.head.dy), (dark.head.dx, dark.head.dy));
            assert_eq!((light.hand.dx, light.hand.dy), (dark.hand.dx, dark.hand.dy));
            assert_ne!(light.head.glyph, dark.head.glyph);
        }
    }

    #[test]
    fn idle_blade_direction_depends_on_faction() {
        assert_eq!(lookup(PoseId::Idle, Faction::Light).blade.dy, -1);
        assert_eq!(lookup(PoseId::Idle, Faction::Dark).blade.dy, 1);
    }

    #[test]
    fn light_belt_and_dark_head() {
        let light = lookup(PoseId::Guard, Faction::Light);
        assert_eq!(light.torso_bottom.glyph, '≡');
        assert_eq!(lookup(PoseId::Attack, Faction::Dark).head.glyph, '⍙');
    }

    #[test]
    fn kneel_hides_limbs() {
        let p = lookup(PoseId::Kneel, Faction::Dark);
        assert!(p.arm_l.is_hidden());
        assert!(p.arm_r.is_hidden());
        assert!(p.leg_l.is_hidden());
        assert!(!p.leg_r.is_hidden());
    }

    #[test]
    fn walk_frames_mirror_legs() {
        let a = lookup(PoseId::WalkA, Faction::Light);
        let b = lookup(PoseId::WalkB, Faction::Light);
        assert_eq!(a.leg_l.dx, -b.leg_l.dx);
        assert_eq!(a.leg_r.dx, -b.leg_r.dx);
        assert_eq!(PoseId::walk_frame(0.0, 6.0), PoseId::WalkA);
        assert_eq!(PoseId::walk_frame(0.2, 6.0), PoseId::WalkB);
    }

    #[test]
    fn attack_poses() {
        assert!(PoseId::Attack.is_attack());
        assert!(PoseId::Crouch.is_attack());
        assert!(!PoseId::Guard.is_attack());
    }
}
