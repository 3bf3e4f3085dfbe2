//! ECS components owned by the headless host.
//!
//! Agents themselves are stored as `shamble_ai::Agent` components; these are
//! the host-side extras attached next to them and the standalone stimuli.

use std::collections::BTreeMap;

use glam::Vec3;

use shamble_ai::sound::SoundEmitter;
use shamble_ai::Stimulus;
use shamble_core::types::{AgentId, ColliderId};

/// The sphere standing in for an agent's body in the physics scene.
#[derive(Debug, Clone, Copy)]
pub struct BodyCollider(pub ColliderId);

/// Stimuli overlapping an agent's sensor volume at the last perception pass.
#[derive(Debug, Clone, Default)]
pub struct SensorContacts {
    pub inside: BTreeMap<ColliderId, Stimulus>,
}

/// A sound emitter with its trigger identity.
#[derive(Debug, Clone)]
pub struct SoundSource {
    pub collider: ColliderId,
    pub emitter: SoundEmitter,
    /// Set once the emitter was told to fade out.
    pub released: bool,
    /// The agent that screamed, if any.
    pub origin: Option<AgentId>,
}

/// Something edible lying in the world.
#[derive(Debug, Clone, Copy)]
pub struct Food {
    pub collider: ColliderId,
    pub position: Vec3,
}

/// The single player the agents hunt.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub collider: ColliderId,
    pub position: Vec3,
    pub flashlight: Option<Flashlight>,
}

#[derive(Debug, Clone, Copy)]
pub struct Flashlight {
    pub collider: ColliderId,
    pub direction: Vec3,
}
