//! Ragdoll system: late-tick blend from the ragdoll pose back to animation.

use hecs::World;

use shamble_ai::services::PhysicsQuery;
use shamble_ai::Agent;

pub fn run(world: &mut World, physics: &dyn PhysicsQuery, dt: f32) {
    for (_entity, agent) in world.query_mut::<&mut Agent>() {
        agent.late_update(Some(physics), dt);
    }
}
