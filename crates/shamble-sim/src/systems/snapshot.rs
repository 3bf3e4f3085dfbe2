//! Snapshot system: queries the ECS world and builds a complete WorldSnapshot.
//!
//! This system is read-only and never modifies the world.

use glam::Vec3;
use hecs::World;

use shamble_ai::Agent;
use shamble_core::events::AiEvent;
use shamble_core::state::{AgentView, SoundView, WorldSnapshot};
use shamble_core::types::{forward_of, signed_angle_about_up, SimTime};

use crate::components::SoundSource;

/// Build a complete WorldSnapshot from the current world state.
pub fn build_snapshot(world: &World, time: &SimTime, events: Vec<AiEvent>) -> WorldSnapshot {
    WorldSnapshot {
        time: *time,
        agents: build_agents(world),
        sound_emitters: build_sounds(world),
        events,
    }
}

/// Build AgentView list, sorted by id.
fn build_agents(world: &World) -> Vec<AgentView> {
    let mut agents: Vec<AgentView> = world
        .query::<&Agent>()
        .iter()
        .map(|(_, agent)| {
            let mind = &agent.mind;
            AgentView {
                id: agent.id(),
                position: agent.body.position,
                heading: signed_angle_about_up(Vec3::Z, forward_of(agent.body.rotation)),
                state: agent.current_state(),
                bone_control: agent.bone_control(),
                target: *mind.target(),
                visual_threat: mind.visual_threat.kind,
                audio_threat: mind.audio_threat.kind,
                health: mind.characteristics.health,
                satisfaction: mind.characteristics.satisfaction,
                speed: mind.speed,
                in_melee_range: mind.in_melee_range,
            }
        })
        .collect();
    agents.sort_by_key(|view| view.id);
    agents
}

/// Audible emitters in spawn order.
fn build_sounds(world: &World) -> Vec<SoundView> {
    let mut sounds: Vec<_> = world
        .query::<&SoundSource>()
        .iter()
        .filter(|(_, source)| source.emitter.is_enabled())
        .map(|(_, source)| {
            (
                source.collider,
                SoundView {
                    position: source.emitter.position,
                    radius: source.emitter.radius(),
                },
            )
        })
        .collect();
    sounds.sort_by_key(|(collider, _)| *collider);
    sounds.into_iter().map(|(_, view)| view).collect()
}
