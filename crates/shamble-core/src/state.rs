//! World snapshot: the complete observable AI state after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::AiEvent;
use crate::target::Target;
use crate::types::{AgentId, SimTime};

/// Everything a frontend or test needs to see after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub agents: Vec<AgentView>,
    pub sound_emitters: Vec<SoundView>,
    pub events: Vec<AiEvent>,
}

/// One agent as seen from outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vec3,
    /// Heading in degrees about the up axis (0 = +Z, positive toward +X).
    pub heading: f32,
    pub state: Option<StateId>,
    pub bone_control: BoneControlMode,
    pub target: Target,
    pub visual_threat: TargetKind,
    pub audio_threat: TargetKind,
    pub health: i32,
    pub satisfaction: f32,
    pub speed: f32,
    pub in_melee_range: bool,
}

/// An active sound emitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundView {
    pub position: Vec3,
    pub radius: f32,
}
