//! Events emitted by agents for audio, animation and UI feedback.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::AgentId;

/// Something observable happened to an agent during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AiEvent {
    /// The behavior state machine switched states.
    StateChanged {
        agent: AgentId,
        from: Option<StateId>,
        to: StateId,
    },
    /// A non-ragdolling hit played an animated reaction.
    HitReaction { agent: AgentId, reaction: HitReaction },
    /// The agent lost control of its body.
    RagdollStarted { agent: AgentId, position: Vec3 },
    /// Physics handed the skeleton back; the stand-up blend began.
    ReanimationStarted { agent: AgentId, from: ReanimateFrom },
    /// The stand-up blend finished and the agent is animated again.
    Reanimated { agent: AgentId },
    /// Health reached zero.
    Died { agent: AgentId },
    /// The agent screamed, spawning a sound emitter.
    Screamed {
        agent: AgentId,
        position: Vec3,
        radius: f32,
    },
}
