//! Simulation engine: the headless host for the AI agents.
//!
//! `SimulationEngine` owns the hecs ECS world and the collider scene,
//! processes commands, runs all systems in the host order and produces
//! `WorldSnapshot`s. Completely deterministic for a given seed.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use glam::Vec3;
use hecs::{Entity, World};

use shamble_ai::services::PhysicsQuery;
use shamble_ai::{Agent, DamageEvent};
use shamble_core::commands::SimCommand;
use shamble_core::constants::{DT, SCREAM_DECAY_SECS};
use shamble_core::error::ConfigError;
use shamble_core::events::AiEvent;
use shamble_core::state::WorldSnapshot;
use shamble_core::types::{AgentId, SimTime};
use shamble_core::waypoint::WaypointNetwork;

use crate::components::{Flashlight, Player};
use crate::error::SimError;
use crate::physics::PhysicsScene;
use crate::scenario::{AgentSetup, ObstacleSetup, Scenario};
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42, dt: DT }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    scene: PhysicsScene,
    time: SimTime,
    dt: f32,
    seed: u64,
    agents: HashMap<AgentId, Entity>,
    next_agent_id: u64,
    networks: HashMap<String, Arc<WaypointNetwork>>,
    player: Option<Entity>,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<AiEvent>,
}

impl SimulationEngine {
    /// Create an empty world with a flat ground plane at height zero.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            scene: PhysicsScene::with_ground(0.0),
            time: SimTime::default(),
            dt: config.dt,
            seed: config.seed,
            agents: HashMap::new(),
            next_agent_id: 0,
            networks: HashMap::new(),
            player: None,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Create an engine and populate it from a scenario.
    pub fn with_scenario(config: SimConfig, scenario: &Scenario) -> Result<Self, SimError> {
        let mut engine = Self::new(config);
        engine.load_scenario(scenario)?;
        Ok(engine)
    }

    /// Add everything a scenario describes to the current world.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> Result<(), SimError> {
        scenario.validate()?;
        for network in &scenario.networks {
            self.add_network(WaypointNetwork::new(network.name.clone(), network.waypoints.iter().copied()))?;
        }
        for obstacle in &scenario.obstacles {
            self.spawn_obstacle(obstacle);
        }
        for &food in &scenario.food {
            self.spawn_food(food);
        }
        if let Some(position) = scenario.player {
            self.move_player(position);
        }
        for agent in &scenario.agents {
            self.spawn_agent(agent)?;
        }
        tracing::info!(scenario = %scenario.name, agents = scenario.agents.len(), "scenario loaded");
        Ok(())
    }

    /// Register a waypoint network for agents spawned afterward.
    pub fn add_network(&mut self, network: WaypointNetwork) -> Result<(), SimError> {
        if network.is_empty() {
            return Err(ConfigError::EmptyWaypointNetwork(network.name).into());
        }
        self.networks.insert(network.name.clone(), Arc::new(network));
        Ok(())
    }

    /// Spawn an agent. Its RNG is seeded from the engine seed and its id.
    pub fn spawn_agent(&mut self, setup: &AgentSetup) -> Result<AgentId, SimError> {
        let id = AgentId(self.next_agent_id);
        let entity = world_setup::spawn_agent(
            &mut self.world,
            &mut self.scene,
            &self.networks,
            id,
            setup,
            self.seed,
        )?;
        self.next_agent_id += 1;
        self.agents.insert(id, entity);
        Ok(id)
    }

    pub fn spawn_food(&mut self, position: Vec3) {
        world_setup::spawn_food(&mut self.world, &mut self.scene, position);
    }

    pub fn spawn_obstacle(&mut self, obstacle: &ObstacleSetup) {
        world_setup::spawn_obstacle(&mut self.scene, obstacle);
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> WorldSnapshot {
        self.process_commands();
        self.run_systems();
        self.time.advance(self.dt);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, events)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &PhysicsScene {
        &self.scene
    }

    /// Look at one agent.
    pub fn agent(&self, id: AgentId) -> Result<hecs::Ref<'_, Agent>, SimError> {
        let entity = self.agents.get(&id).copied().ok_or(SimError::UnknownAgent(id))?;
        self.world.get::<&Agent>(entity).map_err(|_| SimError::UnknownAgent(id))
    }

    /// Apply a command immediately instead of queueing it.
    pub fn apply_command(&mut self, command: SimCommand) -> Result<(), SimError> {
        match command {
            SimCommand::Damage {
                agent,
                position,
                impulse,
                amount,
                body_part,
                instigator,
                direction_hint,
            } => {
                let mut hit = DamageEvent::new(position, impulse, amount).with_hint(direction_hint);
                if let Some((joint, region)) = body_part {
                    hit = hit.on(joint, region);
                }
                if let Some(instigator) = instigator {
                    hit = hit.from_instigator(instigator);
                }
                self.agent_mut(agent)?.take_damage(hit);
            }
            SimCommand::Heal { agent, amount } => {
                self.agent_mut(agent)?.heal(amount);
            }
            SimCommand::Scream { agent } => {
                let screaming = self.agent_mut(agent)?.scream();
                tracing::debug!(agent = agent.0, screaming, "scream requested");
            }
            SimCommand::EmitSound {
                position,
                radius,
                decay_secs,
            } => {
                systems::sound::spawn_emitter(&mut self.world, &mut self.scene, position, radius, decay_secs, None);
            }
            SimCommand::MovePlayer { position } => self.move_player(position),
            SimCommand::SetFlashlight { direction } => self.set_flashlight(direction),
            SimCommand::SetCinematic { agent, enabled } => {
                self.agent_mut(agent)?.mind.cinematic = enabled;
            }
        }
        Ok(())
    }

    fn agent_mut(&mut self, id: AgentId) -> Result<hecs::RefMut<'_, Agent>, SimError> {
        let entity = self.agents.get(&id).copied().ok_or(SimError::UnknownAgent(id))?;
        self.world.get::<&mut Agent>(entity).map_err(|_| SimError::UnknownAgent(id))
    }

    /// Move the player, spawning it on first use.
    fn move_player(&mut self, position: Vec3) {
        let Some(entity) = self.player else {
            self.player = Some(world_setup::spawn_player(&mut self.world, &mut self.scene, position));
            return;
        };
        if let Ok(mut player) = self.world.get::<&mut Player>(entity) {
            player.position = position;
            self.scene.set_shape(player.collider, world_setup::player_shape(position));
        }
    }

    fn set_flashlight(&mut self, direction: Option<Vec3>) {
        let Some(entity) = self.player else {
            tracing::warn!("flashlight toggled without a player");
            return;
        };
        let Ok(mut player) = self.world.get::<&mut Player>(entity) else {
            return;
        };
        let direction = direction.map(Vec3::normalize_or_zero).filter(|d| *d != Vec3::ZERO);
        player.flashlight = match (direction, player.flashlight) {
            (None, _) => None,
            (Some(direction), Some(light)) => Some(Flashlight { direction, ..light }),
            (Some(direction), None) => Some(Flashlight {
                collider: self.scene.reserve(),
                direction,
            }),
        };
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.apply_command(command) {
                tracing::warn!(%err, "command rejected");
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.dt;

        // 1. Sound: ease emitter radii
        systems::sound::run(&mut self.world, dt);

        // 2. Perception: threat clear, target trigger, sensor events
        systems::perception::run(&mut self.world, &self.scene as &dyn PhysicsQuery, dt);

        // 3. Behavior: state update, reanimation countdown, bookkeeping
        systems::behavior::run(&mut self.world, &self.scene as &dyn PhysicsQuery, dt);

        // 4. Movement: navigation, animation pose, IK
        systems::movement::run(&mut self.world, dt);

        // 5. Ragdoll: late blend back to animation
        systems::ragdoll::run(&mut self.world, &self.scene as &dyn PhysicsQuery, dt);

        // 6. Body colliders follow the agents
        systems::movement::sync_colliders(&mut self.world, &mut self.scene);

        // 7. Events: collect agent events, spawn scream emitters
        self.collect_events();

        // 8. Cleanup: faded emitters
        systems::cleanup::run(&mut self.world, &mut self.scene, &mut self.despawn_buffer);
    }

    fn collect_events(&mut self) {
        let start = self.events.len();
        for (_entity, agent) in self.world.query_mut::<&mut Agent>() {
            self.events.extend(agent.drain_events());
        }
        let screams: Vec<_> = self.events[start..]
            .iter()
            .filter_map(|event| match *event {
                AiEvent::Screamed {
                    agent,
                    position,
                    radius,
                } => Some((agent, position, radius)),
                _ => None,
            })
            .collect();
        for (agent, position, radius) in screams {
            systems::sound::spawn_emitter(
                &mut self.world,
                &mut self.scene,
                position,
                radius,
                SCREAM_DECAY_SECS,
                Some(agent),
            );
        }
    }

    /// Set up a bare engine around one agent (for tests).
    #[cfg(test)]
    pub fn single_agent(setup: AgentSetup) -> (Self, AgentId) {
        let mut engine = Self::new(SimConfig::default());
        let id = engine.spawn_agent(&setup).expect("valid agent");
        (engine, id)
    }
}
