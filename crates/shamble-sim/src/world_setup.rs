//! Entity spawn factories for setting up the simulation world.
//!
//! Creates agents with their headless services and body colliders, and the
//! static stimuli (player, food, obstacles) they react to.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use shamble_ai::body::AgentBody;
use shamble_ai::mind::AgentMind;
use shamble_ai::profiles::get_profile;
use shamble_ai::services::PhysicsQuery;
use shamble_ai::{Agent, StateMachine};
use shamble_core::constants::*;
use shamble_core::types::AgentId;
use shamble_core::waypoint::{WaypointCursor, WaypointNetwork};

use crate::components::{BodyCollider, Food, Player, SensorContacts};
use crate::error::SimError;
use crate::headless::{FlatNavigator, ParameterAnimator, SkeletonRig};
use crate::physics::{layers, PhysicsScene, Shape};
use crate::scenario::{AgentSetup, ObstacleSetup};

/// Spawn one agent from its archetype profile and enter its initial state.
pub fn spawn_agent(
    world: &mut World,
    scene: &mut PhysicsScene,
    networks: &HashMap<String, Arc<WaypointNetwork>>,
    id: AgentId,
    setup: &AgentSetup,
    seed: u64,
) -> Result<Entity, SimError> {
    let profile = get_profile(setup.archetype);
    let tuning = setup.tuning.clone().unwrap_or_default();
    tuning.validate()?;

    let mut mind = AgentMind::new(id, profile.characteristics, tuning, seed ^ id.0);
    if let Some(name) = &setup.network {
        let network = networks
            .get(name)
            .ok_or_else(|| SimError::UnknownNetwork(name.clone()))?;
        mind.waypoints = Some(Arc::clone(network));
    }
    mind.waypoint_cursor = if profile.random_patrol {
        WaypointCursor::random()
    } else {
        WaypointCursor::sequential()
    };

    let position = setup.position;
    let rotation = Quat::from_rotation_y(setup.heading.to_radians());
    let body = AgentBody::new(position, rotation)
        .with_navigator(Box::new(FlatNavigator::new(position, position.y)))
        .with_animator(Box::new(ParameterAnimator::new()))
        .with_rig(Box::new(SkeletonRig::new(position, rotation)));

    let collider = scene.insert(
        Shape::Sphere {
            center: position + Vec3::Y * AGENT_HIP_HEIGHT,
            radius: AGENT_BODY_RADIUS,
        },
        layers::BODY,
        Some(id),
    );

    let mut agent = Agent::new(mind, body, StateMachine::with_states(profile.states));
    agent.start(Some(&*scene as &dyn PhysicsQuery));
    tracing::debug!(agent = id.0, archetype = ?setup.archetype, ?position, "agent spawned");

    Ok(world.spawn((agent, BodyCollider(collider), SensorContacts::default())))
}

/// Spawn the player with its body collider.
pub fn spawn_player(world: &mut World, scene: &mut PhysicsScene, position: Vec3) -> Entity {
    let collider = scene.insert(player_shape(position), layers::PLAYER, None);
    world.spawn((Player {
        collider,
        position,
        flashlight: None,
    },))
}

/// The sphere standing in for the player's body.
pub fn player_shape(position: Vec3) -> Shape {
    Shape::Sphere {
        center: player_center(position),
        radius: PLAYER_RADIUS,
    }
}

pub fn player_center(position: Vec3) -> Vec3 {
    position + Vec3::Y * PLAYER_CENTER_HEIGHT
}

pub fn spawn_food(world: &mut World, scene: &mut PhysicsScene, position: Vec3) -> Entity {
    let collider = scene.insert(
        Shape::Sphere {
            center: position,
            radius: FOOD_RADIUS,
        },
        layers::FOOD,
        None,
    );
    world.spawn((Food { collider, position },))
}

/// Obstacles live only in the physics scene.
pub fn spawn_obstacle(scene: &mut PhysicsScene, obstacle: &ObstacleSetup) {
    scene.insert(
        Shape::Aabb {
            min: obstacle.min.min(obstacle.max),
            max: obstacle.min.max(obstacle.max),
        },
        layers::OBSTACLE,
        None,
    );
}
