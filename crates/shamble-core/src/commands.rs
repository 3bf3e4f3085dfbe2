//! Commands sent into the simulation by combat, level and debug systems.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{AgentId, JointId};

/// All external mutations of the AI world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// A weapon struck an agent.
    Damage {
        agent: AgentId,
        position: Vec3,
        impulse: Vec3,
        amount: i32,
        /// Struck segment and its damage region, if the hit landed on one.
        body_part: Option<(JointId, BodyRegion)>,
        instigator: Option<Vec3>,
        #[serde(default)]
        direction_hint: HitDirection,
    },
    /// Restore health to a living agent.
    Heal { agent: AgentId, amount: i32 },
    /// Make an agent broadcast its position.
    Scream { agent: AgentId },
    /// Emit a sound at a point (gunshots, doors, thrown objects).
    EmitSound {
        position: Vec3,
        radius: f32,
        decay_secs: f32,
    },
    /// Move the player (player movement itself lives elsewhere).
    MovePlayer { position: Vec3 },
    /// Aim (or switch off with `None`) the player's flashlight.
    SetFlashlight { direction: Option<Vec3> },
    /// Toggle an agent's non-interruptible cinematic mode.
    SetCinematic { agent: AgentId, enabled: bool },
}
