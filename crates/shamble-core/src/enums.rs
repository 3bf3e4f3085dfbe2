//! Enumeration types used throughout the AI core.

use serde::{Deserialize, Serialize};

/// What a target (committed or candidate) refers to.
///
/// Declaration order is the visual arbitration priority used by perception:
/// a player outranks a light, a light outranks food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    None,
    Waypoint,
    VisualPlayer,
    VisualLight,
    VisualFood,
    Audio,
}

/// Agent presets. See `shamble_ai::profiles`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    #[default]
    Shambler,
    Stalker,
    Crawler,
    Glutton,
}

/// Behavior state identifiers. Discriminants index the per-agent registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateId {
    Idle,
    Alerted,
    Patrol,
    Attack,
    Feeding,
    Pursuit,
}

impl StateId {
    pub const COUNT: usize = 6;

    pub const ALL: [StateId; StateId::COUNT] = [
        StateId::Idle,
        StateId::Alerted,
        StateId::Patrol,
        StateId::Attack,
        StateId::Feeding,
        StateId::Pursuit,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Ordinal written to the animator's `state` parameter (0 means "none").
    pub const fn ordinal(self) -> i32 {
        self as i32 + 1
    }
}

/// Which system currently owns the skeleton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoneControlMode {
    #[default]
    Animated,
    Ragdoll,
    RagdollToAnimated,
}

/// Trigger-volume event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPhase {
    Enter,
    Stay,
    Exit,
}

/// Damage routing region of a struck body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRegion {
    Head,
    UpperBody,
    LowerBody,
}

/// Optional caller override for which way a hit reaction throws the body.
/// `Auto` derives it from the hit position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitDirection {
    #[default]
    Auto,
    Left,
    Right,
}

/// Animated hit reactions. Discriminants are the animator `hit_type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitReaction {
    HeadLeft = 1,
    HeadCenter = 2,
    HeadRight = 3,
    UpperLeft = 4,
    UpperCenter = 5,
    UpperRight = 6,
}

/// Root-bone axis that points away from the belly, used to tell a body lying
/// face-up from one lying face-down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoneAlignment {
    XAxis,
    XAxisInverted,
    YAxis,
    YAxisInverted,
    #[default]
    ZAxis,
    ZAxisInverted,
}

/// Which stand-up animation a reanimating agent plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReanimateFrom {
    Front,
    Back,
}

/// Where a scream's sound emitter is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreamPosition {
    #[default]
    Entity,
    Threat,
}

/// Navigation path completeness, as reported by the locomotion service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    #[default]
    Complete,
    Partial,
    Invalid,
}
