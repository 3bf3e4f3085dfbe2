//! Behavior system: runs each agent's current state, reanimation countdown
//! and intent bookkeeping.

use hecs::World;

use shamble_ai::services::PhysicsQuery;
use shamble_ai::Agent;

pub fn run(world: &mut World, physics: &dyn PhysicsQuery, dt: f32) {
    for (_entity, agent) in world.query_mut::<&mut Agent>() {
        agent.update(Some(physics), dt);
    }
}
