//! Sound system: spawns emitters and eases their radii.
//!
//! An emitter is heard at full radius for the tick it was spawned on, then
//! fades out over its decay time.

use glam::Vec3;
use hecs::{Entity, World};

use shamble_ai::sound::SoundEmitter;
use shamble_core::types::AgentId;

use crate::components::SoundSource;
use crate::physics::PhysicsScene;

/// Spawn a sound emitter at full `radius`.
pub fn spawn_emitter(
    world: &mut World,
    scene: &mut PhysicsScene,
    position: Vec3,
    radius: f32,
    decay_secs: f32,
    origin: Option<AgentId>,
) -> Entity {
    let mut emitter = SoundEmitter::new(position, decay_secs);
    emitter.set_radius(radius.max(0.0), false);
    tracing::debug!(?position, radius, decay_secs, "sound emitted");
    world.spawn((SoundSource {
        collider: scene.reserve(),
        emitter,
        released: false,
        origin,
    },))
}

pub fn run(world: &mut World, dt: f32) {
    for (_entity, source) in world.query_mut::<&mut SoundSource>() {
        source.emitter.tick(dt);
        if !source.released {
            source.emitter.set_radius(0.0, false);
            source.released = true;
        }
    }
}
