//! Cleanup system: removes sound emitters that have faded out.

use hecs::{Entity, World};

use crate::components::SoundSource;
use crate::physics::PhysicsScene;

/// Despawn released emitters whose radius reached zero.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, scene: &mut PhysicsScene, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, source) in world.query_mut::<&SoundSource>() {
        if source.released && !source.emitter.is_enabled() {
            scene.remove(source.collider);
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
