//! Scenario definitions: level layouts loaded from JSON or built in.
//!
//! A scenario places the player, waypoint networks, agents, food and
//! obstacles. Built-in scenarios are hardcoded builders.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use shamble_core::config::{AiTuning, IdleTuning};
use shamble_core::enums::Archetype;
use shamble_core::error::ConfigError;

/// A complete level setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub player: Option<Vec3>,
    #[serde(default)]
    pub networks: Vec<NetworkSetup>,
    #[serde(default)]
    pub agents: Vec<AgentSetup>,
    #[serde(default)]
    pub food: Vec<Vec3>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSetup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSetup {
    pub name: String,
    pub waypoints: Vec<Vec3>,
}

/// One agent to spawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSetup {
    #[serde(default)]
    pub archetype: Archetype,
    pub position: Vec3,
    /// Degrees about the up axis, 0 facing +Z, positive toward +X.
    #[serde(default)]
    pub heading: f32,
    /// Name of the waypoint network to patrol.
    #[serde(default)]
    pub network: Option<String>,
    /// Tuning override; defaults when absent.
    #[serde(default)]
    pub tuning: Option<AiTuning>,
}

impl AgentSetup {
    pub fn new(archetype: Archetype, position: Vec3) -> Self {
        Self {
            archetype,
            position,
            ..Self::default()
        }
    }

    pub fn facing(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn patrolling(mut self, network: &str) -> Self {
        self.network = Some(network.to_string());
        self
    }

    pub fn tuned(mut self, tuning: AiTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }
}

/// Axis-aligned box blocking sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSetup {
    pub min: Vec3,
    pub max: Vec3,
}

impl Scenario {
    /// Parse and validate a scenario from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject empty waypoint networks and invalid tuning overrides.
    /// Unknown network references are reported when the scenario is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(network) = self.networks.iter().find(|n| n.waypoints.is_empty()) {
            return Err(ConfigError::EmptyWaypointNetwork(network.name.clone()));
        }
        for tuning in self.agents.iter().filter_map(|a| a.tuning.as_ref()) {
            tuning.validate()?;
        }
        Ok(())
    }
}

/// Look up a built-in scenario by name.
pub fn builtin(name: &str) -> Option<Scenario> {
    match name {
        "courtyard" => Some(build_courtyard()),
        "pantry" => Some(build_pantry()),
        _ => None,
    }
}

/// Idle pauses short enough to see patrols within a few seconds.
fn brisk() -> AiTuning {
    AiTuning {
        idle: IdleTuning {
            min_secs: 1.0,
            max_secs: 3.0,
        },
        ..AiTuning::default()
    }
}

/// Courtyard: two shamblers walking a square, a stalker on a random beat,
/// a crate in the middle. The player starts outside everyone's view.
fn build_courtyard() -> Scenario {
    let square = [
        Vec3::new(-8.0, 0.0, -8.0),
        Vec3::new(8.0, 0.0, -8.0),
        Vec3::new(8.0, 0.0, 8.0),
        Vec3::new(-8.0, 0.0, 8.0),
    ];
    let beat = [
        Vec3::new(0.0, 0.0, 14.0),
        Vec3::new(12.0, 0.0, 14.0),
        Vec3::new(12.0, 0.0, 2.0),
        Vec3::new(-12.0, 0.0, 2.0),
        Vec3::new(-12.0, 0.0, 14.0),
    ];
    Scenario {
        name: "courtyard".into(),
        player: Some(Vec3::new(0.0, 0.0, -20.0)),
        networks: vec![
            NetworkSetup {
                name: "square".into(),
                waypoints: square.to_vec(),
            },
            NetworkSetup {
                name: "beat".into(),
                waypoints: beat.to_vec(),
            },
        ],
        agents: vec![
            AgentSetup::new(Archetype::Shambler, square[0])
                .facing(90.0)
                .patrolling("square")
                .tuned(brisk()),
            AgentSetup::new(Archetype::Shambler, square[2])
                .facing(-90.0)
                .patrolling("square")
                .tuned(brisk()),
            AgentSetup::new(Archetype::Stalker, beat[0])
                .facing(180.0)
                .patrolling("beat")
                .tuned(brisk()),
        ],
        food: Vec::new(),
        obstacles: vec![ObstacleSetup {
            min: Vec3::new(-1.5, 0.0, -1.5),
            max: Vec3::new(1.5, 2.0, 1.5),
        }],
    }
}

/// Pantry: a hungry glutton and a crawler next to scraps of food.
fn build_pantry() -> Scenario {
    Scenario {
        name: "pantry".into(),
        player: None,
        networks: vec![NetworkSetup {
            name: "shelves".into(),
            waypoints: vec![Vec3::new(-4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)],
        }],
        agents: vec![
            AgentSetup::new(Archetype::Glutton, Vec3::new(-4.0, 0.0, 0.0))
                .facing(90.0)
                .patrolling("shelves")
                .tuned(brisk()),
            AgentSetup::new(Archetype::Crawler, Vec3::new(4.0, 0.0, 0.0))
                .facing(-90.0)
                .patrolling("shelves"),
        ],
        food: vec![Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.0, 0.3, 3.0)],
        obstacles: Vec::new(),
    }
}
